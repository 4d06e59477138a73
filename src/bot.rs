//! Process wiring.
//!
//! Loads configuration and secrets, connects the store, starts the status
//! service, builds the framework around the feature modules, and runs the
//! gateway client until shutdown.

use crate::commands::ModuleRegistry;
use crate::config::{Config, Credentials, COMMAND_PREFIX};
use crate::counters::Counters;
use crate::database::{RecordStore, SqliteStore};
use crate::error::{Result, ShellError};
use crate::handlers::{self, SocketCounter};
use crate::process::ProcessInfo;
use crate::types::{Data, Error};
use crate::uptime::Uptime;
use crate::{logging, stats_api, status};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::sync::Mutex;

/// First-ready sequence: connect the store, then register feature modules.
///
/// Modules are never registered without a connected store.
async fn startup(
    ctx: &serenity::Context,
    framework: &poise::Framework<Data, Error>,
    data: &Data,
) -> Result<()> {
    data.store.connect().await?;
    data.modules
        .register_all(ctx, &framework.options().commands)
        .await
}

/// Open and connect the record store.
///
/// The store is connected before the status service starts so lookups never
/// race the first Ready; the connect in [`startup`] is then a no-op.
async fn open_store(db_path: &str) -> Result<Arc<dyn RecordStore>> {
    let store = SqliteStore::new(db_path.to_string());
    store.connect().await?;
    Ok(Arc::new(store))
}

/// Prefix parsing: the fixed `pb!` prefix, with bot authors dropped before
/// any command is parsed.
fn prefix_options() -> poise::PrefixFrameworkOptions<Data, Error> {
    poise::PrefixFrameworkOptions {
        prefix: Some(COMMAND_PREFIX.to_string()),
        ignore_bots: true,
        ..Default::default()
    }
}

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let _log_guard = logging::init(&config.log_path)?;

    let result = run_with(config).await;
    if let Err(e) = &result {
        tracing::error!(fatal = e.is_fatal(), "Bot stopped: {}", e);
    }
    result
}

async fn run_with(config: Config) -> Result<()> {
    let credentials = Credentials::load(&config.credentials_path)?;
    let http_client = stats_api::build_client()?;

    let counters = Arc::new(Counters::new());
    let store = open_store(&config.db_path).await?;
    let modules = Arc::new(ModuleRegistry::standard());

    // Status service runs for the whole process and stops after the client.
    let listener = tokio::net::TcpListener::bind(config.status_bind_address).await?;
    let (stop_status, status_stopped) = tokio::sync::oneshot::channel::<()>();
    let status_task = tokio::spawn(status::serve(listener, store.clone(), async {
        let _ = status_stopped.await;
    }));

    let data = Data {
        credentials: credentials.clone(),
        config,
        counters: counters.clone(),
        uptime: Uptime::start(),
        store,
        http_client,
        modules: modules.clone(),
        process: ProcessInfo::new(),
    };

    let startup_error: Arc<Mutex<Option<ShellError>>> = Arc::new(Mutex::new(None));
    let setup_error = startup_error.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: modules.commands(),
            prefix_options: prefix_options(),
            pre_command: |context| Box::pin(handlers::on_command(context)),
            on_error: |error| Box::pin(handlers::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                if let Err(e) = startup(ctx, framework, &data).await {
                    let message = e.to_string();
                    *setup_error.lock().await = Some(e);
                    framework.shard_manager().shutdown_all().await;
                    return Err(Error::from(message));
                }
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(&credentials.client_token, intents)
        .framework(framework)
        .raw_event_handler(SocketCounter::new(counters))
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shard_manager.shutdown_all().await;
        }
    });

    let client_result = client.start().await;

    // Releases the framework data, including the outbound HTTP session.
    drop(client);
    tracing::info!("Client stopped, outbound session released");

    let _ = stop_status.send(());
    match status_task.await {
        Ok(Err(e)) => tracing::warn!("Status service failed: {}", e),
        Err(e) => tracing::warn!("Status service task failed: {}", e),
        Ok(Ok(())) => {}
    }

    if let Some(e) = startup_error.lock().await.take() {
        return Err(e);
    }
    client_result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::RecordTable;
    use crate::records::default_payload;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_status_lookups_work_before_first_ready() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("data").join("rpgbot.db");
        let store = open_store(db_path.to_str().unwrap()).await.unwrap();

        let response = status::router(store)
            .oneshot(Request::builder().uri("/users/1/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], default_payload(RecordTable::UserData).as_bytes());
    }

    #[test]
    fn test_prefix_options_drop_bot_messages() {
        let options = prefix_options();
        assert_eq!(options.prefix.as_deref(), Some("pb!"));
        assert!(options.ignore_bots);
        assert!(!options.case_insensitive_commands);
    }

    #[tokio::test]
    async fn test_open_store_unreachable_backend() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file.
        let result = open_store(temp_dir.path().to_str().unwrap()).await;
        assert!(matches!(result, Err(ShellError::Connection(_))));
    }
}

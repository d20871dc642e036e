#![forbid(unsafe_code)]

mod commands;
mod config;
mod error_handler;
mod models;
mod notifier;
mod replies;
mod repository;
mod server;
mod submission_policy;
#[cfg(test)]
mod testing;
mod utils;

use std::{process::exit, sync::Arc};

use config::{AppConfig, Settings, StoreSettings};
use models::TradingSchedule;
use notifier::{Notifier, SlackNotifier};
use repository::{SqliteRepository, SubmissionStore, TableRepository};
use time::OffsetDateTime;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct BotState {
    pub schedule: TradingSchedule,
    pub submission_repository: Arc<dyn SubmissionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: fn() -> OffsetDateTime,
}

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        warn!("Could not load config from .env file: {err}");
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    "market_guess_bot=info"
                        .parse()
                        .expect("Hard-coded default directive should be correct"),
                )
                .from_env_lossy(),
        )
        .init();

    let settings = match AppConfig::from_env() {
        Ok(config) => match config.resolve() {
            Ok(settings) => settings,
            Err(err) => {
                error!("Invalid app config: {err}");
                exit(255);
            }
        },
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    if let Err(err) = run(settings).await {
        error!("{err:#}");
        exit(255);
    }
}

async fn run(settings: Settings) -> Result<(), anyhow::Error> {
    let (submission_repository, sqlite) = setup_store(&settings.store).await?;

    let notifier = SlackNotifier::new(
        &settings.slack.api_base,
        &settings.slack.channel,
        &settings.slack.bearer_token,
    )?;

    let state = Arc::new(BotState {
        schedule: settings.schedule,
        submission_repository,
        notifier: Arc::new(notifier),
        clock: OffsetDateTime::now_utc,
    });

    let listener = TcpListener::bind(settings.listen_addr).await?;
    info!("Listening on {}", settings.listen_addr);

    let result = axum::serve(listener, server::create_router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = signal::ctrl_c().await {
                error!("Could not listen for Ctrl-C: {err}");
            }
            info!("Ctrl-C received, shutting down");
        })
        .await;

    if let Some(sqlite) = sqlite {
        sqlite.close().await;
    }

    Ok(result?)
}

/// Opens the configured store. The SQLite repository is also returned on its own
/// so its pool can be closed on shutdown.
#[tracing::instrument(skip_all)]
async fn setup_store(
    store: &StoreSettings,
) -> anyhow::Result<(Arc<dyn SubmissionStore>, Option<Arc<SqliteRepository>>)> {
    match store {
        StoreSettings::Table {
            endpoint,
            table,
            sas_token,
        } => {
            info!("Using table {table} at {endpoint}");
            let repository: Arc<dyn SubmissionStore> =
                Arc::new(TableRepository::new(endpoint, table, sas_token)?);
            Ok((repository, None))
        }

        StoreSettings::Sqlite { url } => {
            let sqlite = Arc::new(SqliteRepository::connect(url).await?);
            let repository: Arc<dyn SubmissionStore> = sqlite.clone();
            Ok((repository, Some(sqlite)))
        }
    }
}

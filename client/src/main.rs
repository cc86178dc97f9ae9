use std::sync::Arc;

use anyhow::Result;
use common::storage::FileStore;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use restructuring_client::api::ApiClient;
use restructuring_client::auth::{AuthSession, SessionConfig, SessionStatus};
use restructuring_client::config::AppConfig;
use restructuring_client::drafts::DraftStore;
use restructuring_client::logging::StructuredLogger;
use restructuring_client::models::{LoginCredentials, journal};
use restructuring_client::repositories::{
    InsuranceRepository, JournalRepository, PlanRepository, SystemRepository,
};
use restructuring_client::sync::DraftSynchronizer;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    let level = if config.debug_logger {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting {} ({})", config.app_name, config.app_env);
    info!("API base URL: {}", config.api_base_url);

    // Wire the client core
    let storage = Arc::new(FileStore::open(&config.storage_path));
    let drafts = DraftStore::new(storage);
    let api = ApiClient::new(config.api_base_url.clone());
    let logger = StructuredLogger::new(&config.api_base_url, &config.app_env, &config.app_name);

    let plans = PlanRepository::new(api.clone());
    let insurance = InsuranceRepository::new(api.clone());
    let journal_repo = JournalRepository::new(api.clone());
    let system = SystemRepository::new(api.clone());

    let synchronizer = DraftSynchronizer::new(
        plans.clone(),
        insurance.clone(),
        drafts.clone(),
        logger.clone(),
    );
    let session = AuthSession::new(
        api.clone(),
        drafts.clone(),
        synchronizer,
        logger.clone(),
        SessionConfig::from(&config),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("login") if args.len() == 3 => {
            let credentials = LoginCredentials {
                email: args[1].clone(),
                password: args[2].clone(),
            };
            let outcome = session.login(&credentials, None).await?;
            info!(
                "Innlogget som {} (bruker-id {}), videre til {}",
                outcome.user.email, outcome.response.user_id, outcome.redirect_to
            );
        }
        Some("logout") => {
            session.logout(None);
            info!("Logget ut.");
        }
        Some("status") => {
            let user = session.restore().await?;
            match (session.status(), user) {
                (SessionStatus::Authenticated, Some(user)) => {
                    info!("Innlogget som {} ({:?})", user.email, user.authorities);
                }
                (status, _) => info!("Ingen aktiv sesjon ({:?})", status),
            }
        }
        Some("plan") => {
            session.restore().await?;
            let plan = plans.my_plan().await?;
            info!(
                "Plan: persona={:?} fase={:?} behov={:?}",
                plan.persona, plan.phase, plan.needs
            );
            if let Some(diaries) = plan.diaries {
                for (phase, diary) in diaries {
                    info!("Notat [{}]: {}", phase, diary);
                }
            }
        }
        Some("journal") => {
            session.restore().await?;
            let entries = journal_repo.all_entries().await?;
            for (phase, entries) in journal::group_by_phase(entries) {
                info!("Fase {} ({} innlegg)", phase, entries.len());
                for entry in entries {
                    info!("  {}: {}", entry.created_at.as_deref().unwrap_or("-"), entry.content);
                }
            }
        }
        Some("health") => {
            let health = system.health().await?;
            info!("Backend-status: {}", health.status);
        }
        _ => {
            info!("Bruk: restructuring-client <login EMAIL PASSWORD | logout | status | plan | journal | health>");
        }
    }

    Ok(())
}

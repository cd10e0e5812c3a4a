#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use gymtracker_domain::{self as domain, ExerciseService};
use gymtracker_storage::SqliteStore;
use ::log::info;

pub mod config;
pub mod log;
pub mod timer;
pub mod workout;

pub use config::Config;
pub use timer::RestTimerDriver;
pub use workout::WorkoutController;

/// Install the logger described by the configuration.
pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    let repository = config
        .log_file
        .clone()
        .map(|path| -> Arc<Mutex<dyn log::Repository>> {
            Arc::new(Mutex::new(log::FileLog::new(path)))
        });
    log::init(repository).context("failed to initialize logger")
}

/// Opened database with the services operating on it.
pub struct App {
    pub config: Config,
    pub store: SqliteStore,
    pub service: domain::Service<SqliteStore>,
    pub workout: WorkoutController<SqliteStore>,
}

impl App {
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        let store = match &config.database {
            Some(path) => SqliteStore::open(path)
                .await
                .with_context(|| format!("failed to open database {}", path.display()))?,
            None => SqliteStore::in_memory()
                .await
                .context("failed to open in-memory database")?,
        };
        let service = domain::Service::new(store.clone());

        if config.seed_catalog {
            service
                .seed_default_exercises()
                .await
                .map_err(|err| anyhow!("failed to seed exercise catalog: {err}"))?;
        }

        let mut workout = WorkoutController::new(store.clone(), config.rest_seconds);
        if let domain::SessionState::Active(active) = workout
            .restore()
            .await
            .map_err(|err| anyhow!("failed to restore workout: {err}"))?
        {
            info!("continuing workout {}", active.workout.id);
        }

        Ok(Self {
            config,
            store,
            service,
            workout,
        })
    }

    pub async fn close(self) {
        self.store.close().await;
    }
}

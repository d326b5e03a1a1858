//! student-app — host process for the student domain.
//!
//! On start it loads configuration, installs logging, opens the configured
//! storage backend and runs the startup hooks (initial student seeding), then
//! stays up until Ctrl-C.
//! - Storage: SQLite (file, default) when the `sqlite` feature is enabled, or in-memory.
//! - Logs: pretty or JSON, filtered by `RUST_LOG`.
//!
//! Run:
//! ```bash
//! # pretty logs (default), sqlite at ./data/students.db
//! cargo run -p student-app
//!
//! # in-memory storage with JSON logs
//! STORAGE_PROVIDER=memory LOG_FORMAT=json cargo run -p student-app
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod config;
mod startup;

use domain::adapters::memory_repo::InMemoryStudentRepo;
use domain::{CoreError, NewStudent, Student, StudentRepository};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::startup::{Startup, StartupError};

// Local repo abstraction supporting memory or sqlite (feature-gated).
enum AnyRepo {
    Memory(InMemoryStudentRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite_adapter::SqliteStudentRepo),
}

impl AnyRepo {
    fn memory() -> Self {
        Self::Memory(InMemoryStudentRepo::new())
    }

    #[cfg(feature = "sqlite")]
    fn sqlite(path: &std::path::Path) -> Result<Self, CoreError> {
        // Ensure directory exists
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        Ok(Self::Sqlite(sqlite_adapter::SqliteStudentRepo::open(path)?))
    }

    fn backend(&self) -> &'static str {
        match self {
            AnyRepo::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            AnyRepo::Sqlite(_) => "sqlite",
        }
    }

    fn count(&self) -> Result<usize, CoreError> {
        match self {
            AnyRepo::Memory(r) => r.count(),
            #[cfg(feature = "sqlite")]
            AnyRepo::Sqlite(r) => r.count(),
        }
    }
}

impl StudentRepository for AnyRepo {
    fn save_all(&self, students: Vec<NewStudent>) -> Result<Vec<Student>, CoreError> {
        match self {
            AnyRepo::Memory(r) => r.save_all(students),
            #[cfg(feature = "sqlite")]
            AnyRepo::Sqlite(r) => r.save_all(students),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);
    info!(about = %domain::about(), "starting student-app");

    let repo = build_repo(&cfg);
    info!(backend = repo.backend(), "storage ready");

    if let Err(e) = run_startup(&repo) {
        error!(error = %e, "startup failed");
        std::process::exit(1);
    }

    match repo.count() {
        Ok(n) => info!(students = n, "startup complete"),
        Err(e) => warn!(error = %e, "startup complete; could not count students"),
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

/// Register and run the startup hooks against an already-built repository.
fn run_startup<R: StudentRepository + ?Sized>(repo: &R) -> Result<(), StartupError> {
    let mut startup = Startup::new();
    startup.register("seed_students", || domain::seed::seed_students(repo));
    startup.run()
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    }
}

// Construct a repository instance based on config and feature flags.
fn build_repo(cfg: &config::Config) -> AnyRepo {
    match cfg.storage_provider {
        #[cfg(feature = "sqlite")]
        config::StorageProvider::Sqlite => match AnyRepo::sqlite(&cfg.db_path) {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, path = %cfg.db_path.display(), "failed to open sqlite; falling back to memory");
                AnyRepo::memory()
            }
        },
        _ => AnyRepo::memory(),
    }
}

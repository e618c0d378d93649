//! CLI entry point for taskmaster.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::format::FmtSpan};

use taskmaster_app::{AppConfig, Backend, BackendKind};
use taskmaster_core::TaskFilter;

mod commands;
mod view;

/// Track tasks with due dates, filters and completion stats.
#[derive(Parser, Debug)]
#[command(name = "taskmaster", version, about = "taskmaster: a small task manager")]
struct Cli {
    /// Directory containing `.taskmaster/config.toml` (defaults to current).
    #[arg(long)]
    config_dir: Option<String>,

    /// Override the configured backend.
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Print the dashboard as JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Mock,
    Http,
}

impl From<BackendArg> for BackendKind {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Mock => Self::Mock,
            BackendArg::Http => Self::Http,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the task dashboard.
    List {
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },

    /// Show task counts and completion rate.
    Stats,

    /// Create a new task.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date as YYYY-MM-DD or RFC 3339 (defaults to tomorrow).
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        completed: bool,
    },

    /// Edit fields of an existing task.
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Flip the completion flag of a task.
    Toggle {
        #[arg(long)]
        id: String,
    },

    /// Delete a task.
    Rm {
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    let Cli {
        config_dir,
        backend,
        json,
        cmd,
    } = Cli::parse();

    install_tracing();

    let mut config = AppConfig::load(config_dir.as_deref().unwrap_or("."))?;
    if let Some(kind) = backend {
        config.backend.kind = kind.into();
    }
    let backend = Backend::from_config(&config)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(commands::run(cmd, backend, json))
}

fn install_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

/// WARN unless `directives` (the `RUST_LOG` value) says otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debug_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || tracing::enabled!(tracing::Level::DEBUG))
    }

    fn warn_enabled(filter: EnvFilter) -> bool {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || tracing::enabled!(tracing::Level::WARN))
    }

    #[test]
    fn rust_log_raises_verbosity() {
        assert!(debug_enabled(log_filter(Some("debug"))));
        assert!(debug_enabled(log_filter(Some("taskmaster=debug"))));
    }

    #[test]
    fn defaults_to_warn() {
        assert!(!debug_enabled(log_filter(None)));
        assert!(warn_enabled(log_filter(None)));
        assert!(warn_enabled(log_filter(Some(""))));
    }

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from([
            "taskmaster",
            "--backend",
            "mock",
            "add",
            "--title",
            "Improve docs",
            "--due",
            "2026-10-20",
            "--completed",
        ]);

        assert_eq!(cli.backend, Some(BackendArg::Mock));
        match cli.cmd {
            Command::Add {
                title,
                description,
                due,
                completed,
            } => {
                assert_eq!(title, "Improve docs");
                assert_eq!(description, "");
                assert_eq!(due.as_deref(), Some("2026-10-20"));
                assert!(completed);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_list_filter() {
        let cli = Cli::parse_from(["taskmaster", "list", "--filter", "pending"]);
        match cli.cmd {
            Command::List { filter } => assert_eq!(filter, TaskFilter::Pending),
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn list_defaults_to_all() {
        let cli = Cli::parse_from(["taskmaster", "list"]);
        match cli.cmd {
            Command::List { filter } => assert_eq!(filter, TaskFilter::All),
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["taskmaster", "list", "--filter", "someday"]).is_err());
    }

    #[test]
    fn parse_edit_with_partial_fields() {
        let cli = Cli::parse_from(["taskmaster", "edit", "--id", "3", "--completed", "true"]);
        match cli.cmd {
            Command::Edit {
                id,
                title,
                completed,
                ..
            } => {
                assert_eq!(id, "3");
                assert!(title.is_none());
                assert_eq!(completed, Some(true));
            }
            _ => panic!("expected edit command"),
        }
    }
}

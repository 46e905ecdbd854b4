mod check;
mod cli;
mod config;
mod input;
mod params;
mod render;

use tracing_subscriber::EnvFilter;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    let Some(global) = cmd.global() else {
        if let cli::Command::Help(topic) = cmd {
            cli::print_help(topic);
        }
        return Ok(());
    };

    let project = config::ProjectConfig::discover(global.config.as_deref())?;
    if global.verbose {
        init_tracing(project.file.log_filter())?;
    }
    if let Some(path) = &project.config_path {
        tracing::debug!(target: "pginline.cli", config = %path.display(), "loaded config");
    }

    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Render(args) => render::run(args, &project),
        cli::Command::Check(args) => check::run(args, &project),
    }
}

/// Log to stderr; `RUST_LOG` overrides the configured filter.
fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| anyhow::anyhow!("invalid log filter {filter:?}: {e}"))?,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

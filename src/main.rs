use std::path::PathBuf;

use anyhow::Context;
use blogql_server::{schema::schema_sdl, ServerConfig};
use blogql_settings::{load_settings_from_path, settings_path, BlogqlSettings};
use blogql_store::SharedStore;
use blogql_telemetry::{init_telemetry, TelemetryConfig};
use clap::Parser;

/// In-memory blog GraphQL server.
#[derive(Debug, Parser)]
#[command(name = "blogql", version, about)]
struct Cli {
    /// Settings file (defaults to $BLOGQL_CONFIG or ~/.blogql/settings.json).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Start with an empty store.
    #[arg(long)]
    no_seed: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Print the GraphQL schema and exit.
    #[arg(long)]
    print_schema: bool,
}

impl Cli {
    fn apply(&self, settings: &mut BlogqlSettings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if self.no_seed {
            settings.store.seed = false;
        }
        if self.log_json {
            settings.logging.json = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_schema {
        println!("{}", schema_sdl());
        return Ok(());
    }

    let path = cli.config.clone().unwrap_or_else(settings_path);
    let loaded = load_settings_from_path(&path)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;
    let mut settings = loaded.settings.clone();
    cli.apply(&mut settings);
    settings.validate().context("invalid command-line flags")?;

    init_telemetry(&TelemetryConfig::from_settings(&settings.logging)?)?;
    loaded.warn_rejected();
    tracing::info!(config = %path.display(), "starting blogql");

    let store = if settings.store.seed {
        SharedStore::seeded()?
    } else {
        SharedStore::default()
    };

    let handle = blogql_server::start(ServerConfig::from_settings(&settings.server), store)
        .await
        .context("failed to start server")?;
    tracing::info!(port = handle.port(), "blogql ready at /graphql");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;

    tracing::info!("shutting down");
    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::parse_from([
            "blogql",
            "--host",
            "127.0.0.1",
            "--port",
            "4100",
            "--no-seed",
            "--log-json",
        ]);
        let mut settings = BlogqlSettings::default();
        cli.apply(&mut settings);

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 4100);
        assert!(!settings.store.seed);
        assert!(settings.logging.json);
    }

    #[test]
    fn no_flags_keep_settings() {
        let cli = Cli::parse_from(["blogql"]);
        let mut settings = BlogqlSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings, BlogqlSettings::default());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

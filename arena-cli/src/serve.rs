//! Serve command - start the tournament server

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use arena_server::{run_server, ServerConfig};

#[derive(Args)]
pub struct ServeArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8010")]
    pub port: u16,

    /// Directory containing static files for the spectator UI
    #[arg(long, default_value = "arena/spectator")]
    pub static_dir: PathBuf,
}

/// Run serve command
pub fn run(args: ServeArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting Agent Arena server on port {}", config.port);

    start_server(config)
}

/// Configure server from command arguments
fn configure_server(args: &ServeArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

/// Validate that static directory exists
fn validate_static_dir(path: &PathBuf) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_server_defaults() {
        let args = ServeArgs {
            port: 8010,
            static_dir: PathBuf::from("test_static"),
        };

        let config = configure_server(&args).unwrap();
        assert_eq!(config.port, 8010);
        assert_eq!(config.static_dir, "test_static");
    }

    #[test]
    fn test_validate_static_dir_nonexistent() {
        // Should not error, just warn
        let result = validate_static_dir(&PathBuf::from("/nonexistent/path"));
        assert!(result.is_ok());
    }
}

use clap::{Parser, Subcommand};
use mempool_accelerator::{config::AcceleratorConfig, error::Error, PoolId};
use std::path::PathBuf;

/// Mempool services transaction accelerator client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of a TOML config file (keys: enabled, api-url, timeout-ms). Flags override its values
    #[arg(short = 'C', long = "configfile")]
    pub config_file: Option<PathBuf>,

    /// Enable the accelerator service integration
    #[arg(long)]
    pub enable: bool,

    /// Base URL of the mempool services backend
    #[arg(long)]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Logging level for all subsystems {off, error, warn, info, debug, trace}
    ///  -- You may also specify <subsystem>=<level>,<subsystem2>=<level>,... to set the log level for individual subsystems
    #[arg(long = "loglevel", default_value = "info")]
    pub log_level: String,

    /// Directory to log output
    #[arg(long = "logdir")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the currently active accelerations as JSON
    Current,

    /// Print a page of the acceleration history as JSON
    History {
        /// Page index
        #[arg(long)]
        page: Option<u32>,

        /// Only records with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Tell whether a block, or a pool, was helped by any active acceleration
    Check {
        /// Path of a block JSON file (extended block format, with extras.pool.id)
        #[arg(long, conflicts_with = "pool_id", required_unless_present = "pool_id")]
        block: Option<PathBuf>,

        /// Pool identifier
        #[arg(long)]
        pool_id: Option<PoolId>,
    },

    /// Poll the active accelerations and log a summary until interrupted
    Monitor {
        /// Polling interval (seconds)
        #[arg(long, default_value_t = 10)]
        interval: u64,
    },
}

impl Args {
    /// Builds the accelerator config from the config file, if any, overridden by flags
    pub fn accelerator_config(&self) -> Result<AcceleratorConfig, Error> {
        let mut config = match &self.config_file {
            Some(path) => AcceleratorConfig::load(path)?,
            None => AcceleratorConfig::default(),
        };
        config.enabled |= self.enable;
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api-url = \"http://file:8999\"").unwrap();
        writeln!(file, "timeout-ms = 3000").unwrap();
        let path = file.path().to_str().unwrap();

        let args = Args::try_parse_from(["accelerator", "-C", path, "current"]).unwrap();
        let config = args.accelerator_config().unwrap();
        assert_eq!(config, AcceleratorConfig { enabled: false, api_url: "http://file:8999".to_string(), timeout_ms: 3000 });

        let args = Args::try_parse_from(["accelerator", "-C", path, "--enable", "--timeout-ms", "100", "current"]).unwrap();
        let config = args.accelerator_config().unwrap();
        assert_eq!(config, AcceleratorConfig { enabled: true, api_url: "http://file:8999".to_string(), timeout_ms: 100 });
    }

    #[test]
    fn test_defaults_without_config_file() {
        let args = Args::try_parse_from(["accelerator", "history", "--page", "2", "--status", "completed"]).unwrap();
        assert_eq!(args.command, Command::History { page: Some(2), status: Some("completed".to_string()) });
        assert_eq!(args.accelerator_config().unwrap(), AcceleratorConfig::default());
    }

    #[test]
    fn test_check_requires_a_single_target() {
        assert!(Args::try_parse_from(["accelerator", "check"]).is_err());
        assert!(Args::try_parse_from(["accelerator", "check", "--pool-id", "1", "--block", "b.json"]).is_err());
        let args = Args::try_parse_from(["accelerator", "check", "--pool-id", "36"]).unwrap();
        assert_eq!(args.command, Command::Check { block: None, pool_id: Some(36) });
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args::try_parse_from(["accelerator", "-C", "/nonexistent/accelerator.toml", "current"]).unwrap();
        assert!(matches!(args.accelerator_config(), Err(Error::Io(_))));
    }
}

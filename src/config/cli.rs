use crate::config::ClientConfig;
use crate::utils::error::Result;
use crate::utils::render::OutputFormat;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tsq")]
#[command(about = "Timestream Query command line client")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Static endpoint used for discovery and as the fallback
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Send every request to this URL, bypassing discovery
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    #[arg(long, global = true)]
    pub no_endpoint_discovery: bool,

    #[arg(long, global = true)]
    pub worker_threads: Option<usize>,

    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// How the request is dispatched
    #[arg(long, value_enum, default_value_t = CallMode::Sync, global = true)]
    pub mode: CallMode,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Log as JSON lines instead of compact text
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CallMode {
    Sync,
    Future,
    Callback,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a query
    Query {
        query_string: String,
        #[arg(long)]
        max_rows: Option<i32>,
        #[arg(long)]
        next_token: Option<String>,
        /// Follow NextToken until the result is complete
        #[arg(long)]
        all_pages: bool,
    },
    CancelQuery {
        query_id: String,
    },
    /// Validate a query and describe its result columns
    PrepareQuery {
        query_string: String,
    },
    DescribeEndpoints,
    DescribeAccountSettings,
    ListScheduledQueries {
        #[arg(long)]
        max_results: Option<i32>,
        #[arg(long)]
        next_token: Option<String>,
    },
}

impl CliArgs {
    /// Defaults, then the config file, then the environment, then flags.
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let base = match &self.config {
            Some(path) => ClientConfig::from_file(path)?.apply_env()?,
            None => ClientConfig::from_env()?,
        };
        let config = self.apply_flags(base);
        config.validate()?;
        Ok(config)
    }

    fn apply_flags(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(url) = &self.endpoint_url {
            config.endpoint_override = Some(url.clone());
        }
        if self.no_endpoint_discovery {
            config.endpoint_discovery = false;
        }
        if let Some(worker_threads) = self.worker_threads {
            config.worker_threads = worker_threads;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_command() {
        let args = CliArgs::try_parse_from([
            "tsq",
            "--mode",
            "future",
            "--format",
            "csv",
            "query",
            "SELECT 1",
            "--max-rows",
            "10",
            "--all-pages",
        ])
        .unwrap();

        assert_eq!(args.mode, CallMode::Future);
        assert_eq!(args.format, OutputFormat::Csv);
        match args.command {
            Command::Query {
                query_string,
                max_rows,
                all_pages,
                ..
            } => {
                assert_eq!(query_string, "SELECT 1");
                assert_eq!(max_rows, Some(10));
                assert!(all_pages);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::try_parse_from([
            "tsq",
            "describe-endpoints",
            "--region",
            "eu-west-1",
            "--no-endpoint-discovery",
            "--endpoint-url",
            "http://localhost:9000",
            "--max-attempts",
            "2",
        ])
        .unwrap();

        let config = args.apply_flags(ClientConfig::default());
        assert_eq!(config.region, "eu-west-1");
        assert!(!config.endpoint_discovery);
        assert_eq!(config.endpoint_override.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.worker_threads, 4);
    }

    #[test]
    fn test_resolve_config_without_file_layers_env_then_flags() {
        let args = CliArgs::try_parse_from([
            "tsq",
            "describe-account-settings",
            "--region",
            "eu-west-1",
            "--endpoint-url",
            "http://localhost:9000",
            "--worker-threads",
            "3",
        ])
        .unwrap();

        let config = args.resolve_config().unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint_override.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.connect_timeout_ms, ClientConfig::default().connect_timeout_ms);
    }

    #[test]
    fn test_resolve_config_rejects_invalid_flags() {
        let args =
            CliArgs::try_parse_from(["tsq", "describe-endpoints", "--worker-threads", "0"]).unwrap();
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(CliArgs::try_parse_from(["tsq", "--mode", "parallel", "describe-endpoints"]).is_err());
    }
}

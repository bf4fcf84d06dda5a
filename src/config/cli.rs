use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the showcase binary.
#[derive(Debug, Parser)]
#[command(name = "showcase", version, about = "Portfolio and blog site server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "SHOWCASE_CONFIG_FILE", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the public HTTP site.
    Serve(Box<ServeArgs>),
    /// Fetch one collection and print the selected records as JSON.
    Dump(DumpArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct StoreOverrides {
    /// Talk to the local emulator instead of the hosted store.
    #[arg(
        long = "store-use-emulator",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub store_use_emulator: Option<bool>,

    /// Override the document store project id.
    #[arg(long = "store-project-id", value_name = "ID")]
    pub store_project_id: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LogOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub store: StoreOverrides,

    #[command(flatten)]
    pub log: LogOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct DumpArgs {
    #[command(flatten)]
    pub store: StoreOverrides,

    #[command(flatten)]
    pub log: LogOverrides,

    /// Collection to fetch, e.g. `blogs` or `projects`.
    #[arg(value_name = "COLLECTION")]
    pub collection: String,

    /// Comma separated tags; records carrying any of them are kept.
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// Case-insensitive text that the record name or title must contain.
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,
}

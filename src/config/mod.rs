//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

mod cli;

pub use cli::{
    CliArgs, Command, DumpArgs, LogOverrides, ServeArgs, ServeOverrides, StoreOverrides,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "showcase";
const ENV_PREFIX: &str = "SHOWCASE";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_PRODUCTION_URL: &str = "https://firestore.googleapis.com/v1/";
const DEFAULT_EMULATOR_URL: &str = "http://127.0.0.1:8080/v1/";
const DEFAULT_SITE_TITLE: &str = "Showcase";
const DEFAULT_SITE_DESCRIPTION: &str = "Projects, clients and writing.";
const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_EXCERPT_LENGTH: usize = 160;
const DEFAULT_HOME_PROJECT_LIMIT: usize = 6;
const DEFAULT_HOME_BLOG_LIMIT: usize = 3;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub site: SiteSettings,
    pub content: ContentSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Where collections are listed from. `endpoint` is already resolved from the
/// emulator switch.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub endpoint: Url,
    pub project_id: String,
    pub use_emulator: bool,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
    pub public_url: String,
    pub footer: String,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub excerpt_length: usize,
    pub home_project_limit: usize,
    pub home_blog_limit: usize,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            home_project_limit: DEFAULT_HOME_PROJECT_LIMIT,
            home_blog_limit: DEFAULT_HOME_BLOG_LIMIT,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Dump(args)) => {
            raw.apply_store_overrides(&args.store);
            raw.apply_log_overrides(&args.log);
        }
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    store: RawStoreSettings,
    site: RawSiteSettings,
    content: RawContentSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }

        self.apply_store_overrides(&overrides.store);
        self.apply_log_overrides(&overrides.log);
    }

    fn apply_store_overrides(&mut self, overrides: &StoreOverrides) {
        if let Some(use_emulator) = overrides.store_use_emulator {
            self.store.use_emulator = Some(use_emulator);
        }
        if let Some(project_id) = overrides.store_project_id.as_ref() {
            self.store.project_id = Some(project_id.clone());
        }
    }

    fn apply_log_overrides(&mut self, overrides: &LogOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            store,
            site,
            content,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            store: build_store_settings(store)?,
            site: build_site_settings(site)?,
            content: build_content_settings(content)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let project_id = non_empty(store.project_id)
        .ok_or_else(|| LoadError::invalid("store.project_id", "must not be empty"))?;
    if project_id.contains('/') {
        return Err(LoadError::invalid(
            "store.project_id",
            "must not contain `/`",
        ));
    }

    let use_emulator = store.use_emulator.unwrap_or(false);
    let (key, raw_url) = if use_emulator {
        (
            "store.emulator_url",
            non_empty(store.emulator_url).unwrap_or_else(|| DEFAULT_EMULATOR_URL.to_string()),
        )
    } else {
        (
            "store.production_url",
            non_empty(store.production_url)
                .unwrap_or_else(|| DEFAULT_PRODUCTION_URL.to_string()),
        )
    };
    let endpoint = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid(key, format!("invalid url `{raw_url}`: {err}")))?;

    Ok(StoreSettings {
        endpoint,
        project_id,
        use_emulator,
    })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let public_url =
        non_empty(site.public_url).unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string());
    Url::parse(&public_url).map_err(|err| {
        LoadError::invalid("site.public_url", format!("invalid url `{public_url}`: {err}"))
    })?;

    let title = non_empty(site.title).unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string());
    let footer = non_empty(site.footer).unwrap_or_else(|| format!("© {title}"));

    Ok(SiteSettings {
        description: non_empty(site.description)
            .unwrap_or_else(|| DEFAULT_SITE_DESCRIPTION.to_string()),
        public_url,
        footer,
        title,
    })
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    let excerpt_length = content.excerpt_length.unwrap_or(DEFAULT_EXCERPT_LENGTH);
    if excerpt_length == 0 {
        return Err(LoadError::invalid(
            "content.excerpt_length",
            "must be greater than zero",
        ));
    }

    Ok(ContentSettings {
        excerpt_length,
        home_project_limit: content
            .home_project_limit
            .unwrap_or(DEFAULT_HOME_PROJECT_LIMIT),
        home_blog_limit: content.home_blog_limit.unwrap_or(DEFAULT_HOME_BLOG_LIMIT),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    use_emulator: Option<bool>,
    project_id: Option<String>,
    production_url: Option<String>,
    emulator_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    title: Option<String>,
    description: Option<String>,
    public_url: Option<String>,
    footer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    excerpt_length: Option<usize>,
    home_project_limit: Option<usize>,
    home_blog_limit: Option<usize>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

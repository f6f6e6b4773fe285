pub mod pagination;

pub use crate::{
    config::pagination::{PaginationConfig, PaginationStyle},
    defaults,
};
pub use clap::{Args, Parser, ValueEnum};
use serde::Deserialize;
use std::{
    fs::File,
    io::Error,
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::{AsRefStr, EnumString};
use thiserror::Error;
use tracing::debug;

/// Error type returned by configuration operations.
#[derive(Error, Debug)]
pub enum ResourceApiConfigError {
    #[error("Error processing file: {0:?}")]
    ConfigFileError(#[from] Error),
    #[error("Error processing YAML file: {0:?}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("Invalid value for config key {0:?}: expected {1}")]
    InvalidValue(String, &'static str),
    #[error("Invalid value for env variable {0:?}: {1:?}")]
    InvalidEnvVar(String, String),
}

/// Result type returned by configuration operations.
pub type ResourceApiConfigResult<T> = core::result::Result<T, ResourceApiConfigError>;

/// Set of environment variables that override file and CLI settings.
#[derive(Debug, Clone, Copy, EnumString, AsRefStr)]
pub enum EnvVar {
    #[strum(serialize = "RESOURCE_API_PAGINATION_ENABLED")]
    PaginationEnabled,
    #[strum(serialize = "RESOURCE_API_PAGINATION_STYLE")]
    PaginationStyle,
    #[strum(serialize = "RESOURCE_API_ITEMS_PER_PAGE")]
    ItemsPerPage,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "Resource API",
    about = "Serialize resolved resources into GraphQL response shapes.",
    version
)]
pub struct ResourceApiArgs {
    /// Log level passed to the resource API tooling.
    #[clap(long, default_value = defaults::LOG_LEVEL, value_parser(["info", "debug", "error", "warn", "trace"]), help = "Log level passed to the resource API tooling.")]
    pub log_level: String,

    /// Resource API config file.
    #[clap(
        short,
        long,
        value_name = "FILE",
        help = "Resource API config file."
    )]
    pub config: Option<PathBuf>,

    /// Serialize collections without pagination.
    #[clap(long, help = "Serialize collections without pagination.")]
    pub disable_pagination: bool,

    /// Pagination style used for collections.
    #[clap(long, help = "Pagination style used for collections.", default_value = defaults::PAGINATION_STYLE, value_parser(["cursor", "page"]))]
    pub pagination_style: String,

    /// Default number of items per page.
    #[clap(long, help = "Default number of items per page.", default_value_t = defaults::ITEMS_PER_PAGE)]
    pub items_per_page: u64,

    /// Enable verbose logging.
    #[clap(short, long, help = "Enable verbose logging.")]
    pub verbose: bool,
}

impl Default for ResourceApiArgs {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            config: None,
            disable_pagination: !defaults::PAGINATION_ENABLED,
            pagination_style: defaults::PAGINATION_STYLE.to_string(),
            items_per_page: defaults::ITEMS_PER_PAGE,
            verbose: defaults::VERBOSE_LOGGING,
        }
    }
}

pub trait Env {
    fn inject_opt_env_vars(&mut self) -> ResourceApiConfigResult<()>;
}

/// Held by tests that read or write `RESOURCE_API_*` variables.
#[cfg(test)]
pub(crate) fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Resource API configuration.
#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct ResourceApiConfig {
    pub log_level: String,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl Default for ResourceApiConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            verbose: defaults::VERBOSE_LOGGING,
            pagination: PaginationConfig::default(),
        }
    }
}

impl TryFrom<ResourceApiArgs> for ResourceApiConfig {
    type Error = ResourceApiConfigError;

    fn try_from(args: ResourceApiArgs) -> ResourceApiConfigResult<Self> {
        if let Some(path) = args.config {
            return ResourceApiConfig::from_file(path);
        }

        let style = PaginationStyle::from_str(&args.pagination_style).map_err(|_| {
            ResourceApiConfigError::InvalidValue(
                "pagination_style".to_string(),
                "`cursor` or `page`",
            )
        })?;

        let mut config = ResourceApiConfig {
            log_level: args.log_level,
            verbose: args.verbose,
            pagination: PaginationConfig {
                enabled: !args.disable_pagination,
                style,
                items_per_page: args.items_per_page,
            },
        };

        config.inject_opt_env_vars()?;

        Ok(config)
    }
}

fn yaml_key(key: &str) -> serde_yaml::Value {
    serde_yaml::Value::String(key.into())
}

fn as_bool(value: &serde_yaml::Value, key: &str) -> ResourceApiConfigResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| ResourceApiConfigError::InvalidValue(key.to_string(), "a boolean"))
}

fn as_str<'a>(
    value: &'a serde_yaml::Value,
    key: &str,
) -> ResourceApiConfigResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ResourceApiConfigError::InvalidValue(key.to_string(), "a string"))
}

fn as_u64(value: &serde_yaml::Value, key: &str) -> ResourceApiConfigResult<u64> {
    value.as_u64().ok_or_else(|| {
        ResourceApiConfigError::InvalidValue(key.to_string(), "a non-negative integer")
    })
}

impl ResourceApiConfig {
    // When building the config via a file, if any section (e.g., pagination), or if any
    // individual setting in a section (e.g., pagination.style) is empty, replace it
    // with its respective default value.
    pub fn from_file(path: impl AsRef<Path>) -> ResourceApiConfigResult<Self> {
        debug!("Loading config from {:?}", path.as_ref());
        let file = File::open(path)?;

        let mut config = ResourceApiConfig::default();

        let content: serde_yaml::Value = serde_yaml::from_reader(file)?;

        if let Some(log_level) = content.get(yaml_key("log_level")) {
            config.log_level = as_str(log_level, "log_level")?.to_string();
        }

        if let Some(verbose) = content.get(yaml_key("verbose")) {
            config.verbose = as_bool(verbose, "verbose")?;
        }

        if let Some(section) = content.get(yaml_key("pagination")) {
            if let Some(enabled) = section.get(yaml_key("enabled")) {
                config.pagination.enabled = as_bool(enabled, "pagination.enabled")?;
            }

            if let Some(style) = section.get(yaml_key("style")) {
                let style = as_str(style, "pagination.style")?;
                config.pagination.style =
                    PaginationStyle::from_str(style).map_err(|_| {
                        ResourceApiConfigError::InvalidValue(
                            "pagination.style".to_string(),
                            "`cursor` or `page`",
                        )
                    })?;
            }

            if let Some(items_per_page) = section.get(yaml_key("items_per_page")) {
                config.pagination.items_per_page =
                    as_u64(items_per_page, "pagination.items_per_page")?;
            }
        }

        config.inject_opt_env_vars()?;

        Ok(config)
    }

    // Inject env vars into each section of the config
    pub fn inject_opt_env_vars(&mut self) -> ResourceApiConfigResult<()> {
        self.pagination.inject_opt_env_vars()?;

        Ok(())
    }
}

use crate::{
    config::{Env, EnvVar, ResourceApiConfigError, ResourceApiConfigResult},
    defaults,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, EnumString};

/// How paginated collections are rendered.
#[derive(
    Serialize, Deserialize, EnumString, AsRefStr, Clone, Copy, Debug, Eq, PartialEq,
)]
#[serde(rename_all = "lowercase")]
pub enum PaginationStyle {
    /// Relay-style connection: `totalCount`, `edges` and `pageInfo`.
    #[strum(serialize = "cursor", ascii_case_insensitive)]
    Cursor,

    /// `collection` plus a `paginationInfo` block.
    #[strum(serialize = "page", ascii_case_insensitive)]
    Page,
}

impl Default for PaginationStyle {
    fn default() -> Self {
        PaginationStyle::from_str(defaults::PAGINATION_STYLE)
            .unwrap_or(PaginationStyle::Cursor)
    }
}

/// Collection pagination configuration.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct PaginationConfig {
    /// Whether collections are paginated at all.
    pub enabled: bool,

    /// Envelope used for paginated collections.
    pub style: PaginationStyle,

    /// Page size used when a collection does not carry its own.
    pub items_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::PAGINATION_ENABLED,
            style: PaginationStyle::default(),
            items_per_page: defaults::ITEMS_PER_PAGE,
        }
    }
}

impl PaginationConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: PaginationStyle) -> Self {
        self.style = style;
        self
    }
}

fn read_env_var(var: EnvVar) -> Option<(EnvVar, String)> {
    std::env::var(var.as_ref()).ok().map(|v| (var, v))
}

impl Env for PaginationConfig {
    /// Override pagination settings from `RESOURCE_API_*` environment variables.
    fn inject_opt_env_vars(&mut self) -> ResourceApiConfigResult<()> {
        if let Some((var, value)) = read_env_var(EnvVar::PaginationEnabled) {
            self.enabled = bool::from_str(&value).map_err(|_| {
                ResourceApiConfigError::InvalidEnvVar(var.as_ref().to_string(), value)
            })?;
        }

        if let Some((var, value)) = read_env_var(EnvVar::PaginationStyle) {
            self.style = PaginationStyle::from_str(&value).map_err(|_| {
                ResourceApiConfigError::InvalidEnvVar(var.as_ref().to_string(), value)
            })?;
        }

        if let Some((var, value)) = read_env_var(EnvVar::ItemsPerPage) {
            self.items_per_page = u64::from_str(&value).map_err(|_| {
                ResourceApiConfigError::InvalidEnvVar(var.as_ref().to_string(), value)
            })?;
        }

        Ok(())
    }
}

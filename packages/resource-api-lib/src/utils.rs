use crate::config::ResourceApiConfig;
use std::{env, str::FromStr};
use tracing_subscriber::filter::EnvFilter;

const RUST_LOG: &str = "RUST_LOG";
const HUMAN_LOGGING: &str = "HUMAN_LOGGING";

/// Initialize the logging context for the resource API tooling.
///
/// `RUST_LOG` takes precedence over the configured log level. Setting
/// `HUMAN_LOGGING=false` switches the output to JSON lines.
pub fn init_logging(config: &ResourceApiConfig) -> anyhow::Result<()> {
    let level = match config.verbose {
        true => "debug".to_string(),
        false => config.log_level.clone(),
    };

    let filter = match env::var_os(RUST_LOG) {
        Some(_) => EnvFilter::try_from_default_env()
            .map_err(|e| anyhow::anyhow!("Invalid `RUST_LOG` provided: {e}"))?,
        None => EnvFilter::try_new(&level)
            .map_err(|e| anyhow::anyhow!("Invalid log level '{level}': {e}"))?,
    };

    let human_logging = match env::var(HUMAN_LOGGING) {
        Ok(s) => bool::from_str(&s).map_err(|_| {
            anyhow::anyhow!(
                "Expected `true` or `false` to be provided for `HUMAN_LOGGING`"
            )
        })?,
        Err(_) => true,
    };

    let sub = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    if human_logging {
        sub.with_ansi(true)
            .with_level(true)
            .with_line_number(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Could not install subscriber: {e}"))?;
    } else {
        sub.with_ansi(false)
            .with_level(true)
            .with_line_number(true)
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Could not install subscriber: {e}"))?;
    }

    Ok(())
}

use crate::settings::Log;
use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

const BOOTSTRAP_FILTER: &str = "info";

pub struct Logger {
    reload_handle: reload::Handle<EnvFilter, Registry>,
}

impl Logger {
    /// Installs the global subscriber at `info` until the configured filter is known.
    pub fn new_bootstrap() -> Self {
        let (filter, reload_handle) = reload::Layer::new(EnvFilter::new(BOOTSTRAP_FILTER));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();

        Self { reload_handle }
    }

    /// Swaps in the filter from `[log]`. A non-empty `RUST_LOG` takes precedence.
    pub fn apply(&self, log: &Log) -> Result<()> {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = filter_for(log, env.as_deref())?;
        self.reload_handle.reload(filter).map_err(|e| anyhow!(e))
    }
}

fn filter_for(log: &Log, env: Option<&str>) -> Result<EnvFilter> {
    let directives = match env.map(str::trim) {
        Some(env) if !env.is_empty() => env,
        _ => log.filter.as_str(),
    };
    EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {directives:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(filter: &str) -> Log {
        Log {
            filter: filter.to_string(),
        }
    }

    #[test]
    fn settings_filter_applies_without_env() {
        let filter = filter_for(&log("debug"), None).unwrap();
        assert_eq!(filter.to_string(), "debug");

        let filter = filter_for(&log("debug"), Some("  ")).unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn env_filter_wins_over_settings() {
        let filter = filter_for(&log("debug"), Some("warn")).unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn malformed_filter_is_an_error() {
        let err = filter_for(&log("userdesk=loud"), None).unwrap_err();
        assert!(err.to_string().contains("userdesk=loud"));
    }
}

use env_logger::{Builder, WriteStyle};
use log::LevelFilter;
use x2ui_core::{ClientConfig, UiError, UiResult};

use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLoggerConfig {
    pub level: LevelFilter,
    pub colors: bool,
    pub include_module: bool,
}

impl ConsoleLoggerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let level = get("X2UI_LOG")
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let colors = get("X2UI_LOG_COLORS").map(|v| v != "0").unwrap_or(true);
        let include_module = get("X2UI_LOG_MODULE").map(|v| v != "0").unwrap_or(true);

        Self {
            level,
            colors,
            include_module,
        }
    }

    /// Takes the level from the loaded client config; an unparsable level keeps the current one.
    pub fn with_client_config(mut self, cfg: &ClientConfig) -> Self {
        match cfg.log_level.trim().parse::<LevelFilter>() {
            Ok(level) => self.level = level,
            Err(_) => log::warn!("logging: ignoring unknown level '{}'", cfg.log_level),
        }
        self
    }
}

impl Default for ConsoleLoggerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Process-wide console logger.
pub struct ConsoleLogger {
    config: ConsoleLoggerConfig,
    initialized: bool,
}

impl ConsoleLogger {
    #[inline]
    pub fn new(config: ConsoleLoggerConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &ConsoleLoggerConfig {
        &self.config
    }

    /// Installs the logger. Calling it again on the same instance is a no-op.
    pub fn init(&mut self) -> UiResult<()> {
        if self.initialized {
            return Ok(());
        }

        let mut builder = Builder::new();
        builder.filter_level(self.config.level);
        builder.write_style(if self.config.colors {
            WriteStyle::Auto
        } else {
            WriteStyle::Never
        });

        let include_module = self.config.include_module;
        builder.format(move |buf, record| {
            let style = buf.default_level_style(record.level());
            if include_module {
                writeln!(
                    buf,
                    "[{style}{:<5}{style:#}] {:<25} {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            } else {
                writeln!(buf, "[{style}{:<5}{style:#}] {}", record.level(), record.args())
            }
        });

        builder
            .try_init()
            .map_err(|e| UiError::Other(format!("logger init failed: {e}")))?;

        self.initialized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn env_switches_are_read() {
        let cfg = ConsoleLoggerConfig::from_lookup(lookup(&[
            ("X2UI_LOG", "debug"),
            ("X2UI_LOG_COLORS", "0"),
        ]));
        assert_eq!(cfg.level, LevelFilter::Debug);
        assert!(!cfg.colors);
        assert!(cfg.include_module);

        let fallback = ConsoleLoggerConfig::from_lookup(lookup(&[("X2UI_LOG", "loud")]));
        assert_eq!(fallback.level, LevelFilter::Info);
    }

    #[test]
    fn client_config_level_wins_when_valid() {
        let base = ConsoleLoggerConfig::from_lookup(lookup(&[]));
        let mut client = ClientConfig::default();
        client.log_level = "trace".to_owned();
        assert_eq!(base.clone().with_client_config(&client).level, LevelFilter::Trace);

        client.log_level = "chatty".to_owned();
        assert_eq!(base.with_client_config(&client).level, LevelFilter::Info);
    }
}

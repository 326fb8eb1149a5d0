use crate::client::Settings;
use std::time::Duration;

/// Configuration for [`InstrumentedClient`](super::InstrumentedClient).
///
/// By default there is no timeout, no default settings, and SQL logging is
/// on at DEBUG with statements truncated to 200 bytes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-call timeout. `None` means no timeout (default).
    pub query_timeout: Option<Duration>,
    /// Settings sent with every SELECT; per-query settings override them.
    pub default_settings: Settings,
    /// Whether executed statements are logged.
    pub logging_enabled: bool,
    /// Tracing event level for executed statements.
    #[cfg(feature = "tracing")]
    pub log_level: tracing::Level,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            query_timeout: None,
            default_settings: Settings::default(),
            logging_enabled: true,
            #[cfg(feature = "tracing")]
            log_level: tracing::Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-call timeout.
    ///
    /// Calls exceeding it are dropped and return [`QbError::Timeout`](crate::QbError::Timeout).
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Replace the default settings.
    pub fn with_default_settings(mut self, settings: Settings) -> Self {
        self.default_settings = settings;
        self
    }

    /// Add one default setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.default_settings.set(key, value);
        self
    }

    #[cfg(feature = "tracing")]
    pub fn with_log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log statements in full.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn enable_logging(mut self) -> Self {
        self.logging_enabled = true;
        self
    }

    pub fn disable_logging(mut self) -> Self {
        self.logging_enabled = false;
        self
    }
}

use serde::{Deserialize, Serialize};

/// Filter levels for the fmt subscriber. `RUST_LOG` replaces both.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Base level for every target.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Level for the resolver trace target. At `info` or below, `trace on`
    /// output is shown whatever the base level is.
    #[serde(default = "default_trace_level")]
    pub trace_level: String,
}

impl LoggingConfig {
    /// `EnvFilter` directives: the base level, then the override for
    /// `trace_target`.
    pub fn directives(&self, trace_target: &str) -> String {
        format!("{},{}={}", self.level, trace_target, self.trace_level)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            trace_level: default_trace_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_trace_level() -> String {
    "info".to_string()
}

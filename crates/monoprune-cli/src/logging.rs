use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Verbosity variable shared with the workspace's Python tooling.
pub const LOG_LEVEL_ENV: &str = "NX_PYTHON_LOG_LEVEL";

/// Logging configuration, resolved once at startup.
///
/// `RUST_LOG` directives win when set; otherwise the level comes from
/// [`LOG_LEVEL_ENV`], which accepts Python level names (`DEBUG`, `INFO`,
/// `WARNING`, `ERROR`, `CRITICAL`) or their numeric values (10 to 50).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    /// Raw value of [`LOG_LEVEL_ENV`] when it could not be mapped to a level
    pub unrecognized: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            unrecognized: None,
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        let raw = std::env::var_os(LOG_LEVEL_ENV).map(|v| v.to_string_lossy().into_owned());
        Self::from_value(raw.as_deref())
    }

    pub fn from_value(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(value) => match parse_level(value) {
                Some(level) => Self {
                    level,
                    unrecognized: None,
                },
                None => Self {
                    unrecognized: Some(value.to_owned()),
                    ..Self::default()
                },
            },
        }
    }

    /// Installs the global `tracing` subscriber. Logs go to stderr so stdout
    /// stays free for the run summary.
    pub fn init(&self) {
        let filter = EnvFilter::builder()
            .with_default_directive(self.level.into())
            .from_env_lossy();

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .init();

        if let Some(value) = &self.unrecognized {
            tracing::warn!(
                value = %value,
                "unrecognized {LOG_LEVEL_ENV}, falling back to info"
            );
        }
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_uppercase().as_str() {
        "NOTSET" | "TRACE" | "0" => Some(LevelFilter::TRACE),
        "DEBUG" | "10" => Some(LevelFilter::DEBUG),
        "INFO" | "20" => Some(LevelFilter::INFO),
        "WARNING" | "WARN" | "30" => Some(LevelFilter::WARN),
        "ERROR" | "CRITICAL" | "FATAL" | "40" | "50" => Some(LevelFilter::ERROR),
        "OFF" => Some(LevelFilter::OFF),
        _ => None,
    }
}

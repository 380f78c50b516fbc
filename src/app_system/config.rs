use thiserror::Error;

/// Runtime settings for [`crate::app_system::OrderSystem`].
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Capacity of each actor's request channel.
    pub channel_buffer: usize,
    /// Filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidChannelBuffer { key: &'static str, value: String },
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 100,
            log_filter: "info".to_string(),
        }
    }
}

impl SystemConfig {
    pub const CHANNEL_BUFFER_VAR: &'static str = "ORDER_CHANNEL_BUFFER";
    pub const LOG_FILTER_VAR: &'static str = "ORDER_LOG";

    /// Defaults overridden by `ORDER_CHANNEL_BUFFER` and `ORDER_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::CHANNEL_BUFFER_VAR) {
            config.channel_buffer = match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::InvalidChannelBuffer {
                        key: Self::CHANNEL_BUFFER_VAR,
                        value,
                    })
                }
            };
        }

        if let Some(filter) = lookup(Self::LOG_FILTER_VAR).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}

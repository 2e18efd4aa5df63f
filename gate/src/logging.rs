use crate::config::LoggingConfig;

/// Installs env_logger. RUST_LOG wins over the configured level. Returns
/// false if a logger was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(config.level.as_str()))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        let config = LoggingConfig {
            level: "info".to_string(),
        };
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}

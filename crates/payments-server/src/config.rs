use std::env;

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind to
    pub bind_host: String,
    /// TCP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read overrides from the environment. Unset variables keep the defaults
    /// (`0.0.0.0:8080`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_host = lookup("BIND_HOST")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let port = match lookup("PORT").filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { bind_host, port })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_bind_all_interfaces_on_8080() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_overrides() {
        let config =
            ServerConfig::from_lookup(lookup(&[("BIND_HOST", "127.0.0.1"), ("PORT", "9090")]))
                .unwrap();
        assert_eq!(config.bind_host, "127.0.0.1");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config =
            ServerConfig::from_lookup(lookup(&[("BIND_HOST", ""), ("PORT", "")])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "80800")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref p) if p == "80800"));
        assert_eq!(err.to_string(), "invalid PORT: 80800");
    }
}

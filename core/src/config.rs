use crate::error::ConfigError;
use crate::gate::GateScope;

pub const DEFAULT_BASE_PATH: &str = "/config-dns/v2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Path prefix of the zone management API, without a trailing slash
    pub base_path: String,

    /// Granularity of the write gate built by `ZoneClient::new`
    pub gate_scope: GateScope,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            gate_scope: GateScope::Global,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `ZONEDNS_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_path) = lookup("ZONEDNS_BASE_PATH") {
            config.base_path = normalize_base_path(&base_path)?;
        }

        if let Some(scope) = lookup("ZONEDNS_GATE_SCOPE") {
            config.gate_scope = scope.parse()?;
        }

        Ok(config)
    }

    pub fn with_base_path(mut self, base_path: &str) -> Result<Self, ConfigError> {
        self.base_path = normalize_base_path(base_path)?;
        Ok(self)
    }

    pub fn with_gate_scope(mut self, scope: GateScope) -> Self {
        self.gate_scope = scope;
        self
    }
}

fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('/') {
        return Err(ConfigError::InvalidBasePath(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_path, "/config-dns/v2");
        assert_eq!(config.gate_scope, GateScope::Global);
    }

    #[test]
    fn reads_overrides() {
        let config = ClientConfig::from_vars(vars(&[
            ("ZONEDNS_BASE_PATH", "/dns/v3/"),
            ("ZONEDNS_GATE_SCOPE", "zone"),
        ]))
        .unwrap();
        assert_eq!(config.base_path, "/dns/v3");
        assert_eq!(config.gate_scope, GateScope::PerZone);
    }

    #[test]
    fn rejects_relative_base_path() {
        let err = ClientConfig::from_vars(vars(&[("ZONEDNS_BASE_PATH", "config-dns")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBasePath("config-dns".to_string()));
    }

    #[test]
    fn rejects_unknown_scope() {
        let err = ClientConfig::from_vars(vars(&[("ZONEDNS_GATE_SCOPE", "region")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGateScope(_)));
    }
}

use serde::{Deserialize, Serialize};

pub const DEFAULT_PLUGIN_NAME: &str = "passkey-bridge";

/// Settings for a [CeremonyCoordinator][crate::coordinator::CeremonyCoordinator].
///
/// ```json
/// {"pluginName": "passkey-bridge", "defaultRpId": "example.com", "logPayloads": false}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// The name commands may be qualified with, as in
    /// `plugin:<plugin_name>|create_credential`.
    pub plugin_name: String,
    /// Relying party id used when options carry none.
    pub default_rp_id: Option<String>,
    /// Log option and credential payloads at `debug`. They carry user
    /// handles and credential ids.
    pub log_payloads: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            plugin_name: DEFAULT_PLUGIN_NAME.to_string(),
            default_rp_id: None,
            log_payloads: false,
        }
    }
}

impl BridgeConfig {
    pub fn with_plugin_name(mut self, plugin_name: impl Into<String>) -> Self {
        self.plugin_name = plugin_name.into();
        self
    }

    pub fn with_default_rp_id(mut self, rp_id: impl Into<String>) -> Self {
        self.default_rp_id = Some(rp_id.into());
        self
    }

    pub fn with_log_payloads(mut self, log_payloads: bool) -> Self {
        self.log_payloads = log_payloads;
        self
    }

    /// `rp_id` if given, otherwise the configured default.
    pub(crate) fn resolve_rp_id(&self, rp_id: Option<String>) -> Option<String> {
        rp_id
            .filter(|id| !id.is_empty())
            .or_else(|| self.default_rp_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let c: BridgeConfig = serde_json::from_str(r#"{"defaultRpId": "example.com"}"#).unwrap();
        assert_eq!(c.plugin_name, DEFAULT_PLUGIN_NAME);
        assert_eq!(c.default_rp_id.as_deref(), Some("example.com"));
        assert!(!c.log_payloads);

        let c: BridgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, BridgeConfig::default());
    }

    #[test]
    fn rp_id_fallback() {
        let c = BridgeConfig::default();
        assert_eq!(c.resolve_rp_id(None), None);
        assert_eq!(
            c.resolve_rp_id(Some("a.example".to_string())).as_deref(),
            Some("a.example")
        );

        let c = c.with_default_rp_id("example.com");
        assert_eq!(c.resolve_rp_id(None).as_deref(), Some("example.com"));
        assert_eq!(
            c.resolve_rp_id(Some(String::new())).as_deref(),
            Some("example.com")
        );
        assert_eq!(
            c.resolve_rp_id(Some("a.example".to_string())).as_deref(),
            Some("a.example")
        );
    }
}

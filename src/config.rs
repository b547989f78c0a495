/// Storage key layout for persisted trainer state.
///
/// Missing fields fall back to the defaults, so a partial config file only
/// needs to name the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Key of the last-viewed position record
    pub position_key: String,
    /// Prefix of per-algorithm override keys; the entry name is appended
    pub override_prefix: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            position_key: "algs.index".to_string(),
            override_prefix: "algs.exp.".to_string(),
        }
    }
}

impl TrainerConfig {
    /// Parse a TOML string into `TrainerConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Storage key holding the override for the algorithm `name`.
    pub fn override_key(&self, name: &str) -> String {
        format!("{}{}", self.override_prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let config = TrainerConfig::default();
        assert_eq!(config.position_key, "algs.index");
        assert_eq!(config.override_key("A"), "algs.exp.A");
    }

    #[test]
    fn test_custom_prefix() {
        let config = TrainerConfig {
            override_prefix: "oll/".into(),
            ..Default::default()
        };
        assert_eq!(config.override_key("Sune"), "oll/Sune");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_partial_toml() {
        let config = TrainerConfig::from_toml_str("position_key = \"pll.index\"").unwrap();
        assert_eq!(config.position_key, "pll.index");
        assert_eq!(config.override_prefix, "algs.exp.");
    }
}

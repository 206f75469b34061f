//! Parameter defaults and named presets.
//!
//! A configuration supplies parameters that apply to every request plus
//! named bundles a request can pull in with `p=name1,name2`:
//!
//! ```json
//! {
//!   "defaults": { "bg": "white" },
//!   "presets": {
//!     "avatar": { "shape": "circle", "strim": "" }
//!   }
//! }
//! ```
//!
//! Precedence, lowest first: defaults, presets in the order named, request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::ParamMap;

/// Request parameter naming the presets to apply.
pub const PRESET_KEY: &str = "p";

/// Error types for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Defaults and presets layered under every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub defaults: ParamMap,
    pub presets: BTreeMap<String, ParamMap>,
}

impl PipelineConfig {
    /// Load a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Layer the defaults and the requested presets under `request`.
    ///
    /// Unknown preset names are ignored. The preset key itself is kept in the
    /// result.
    pub fn resolve_params(&self, request: &ParamMap) -> ParamMap {
        let mut params = self.defaults.clone();
        let presets = request
            .get(PRESET_KEY)
            .map(|names| names.split(',').map(str::trim).collect::<Vec<_>>())
            .unwrap_or_default();
        for preset in presets.iter().filter_map(|name| self.presets.get(*name)) {
            params.extend(preset.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        params.extend(request.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::param_map;

    const CONFIG: &str = r#"{
        "defaults": { "bg": "white", "or": "auto" },
        "presets": {
            "avatar": { "shape": "circle", "strim": "" },
            "red": { "bg": "red" }
        }
    }"#;

    #[test]
    fn test_from_json() {
        let config = PipelineConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.defaults.get("bg").map(String::as_str), Some("white"));
        assert_eq!(config.presets.len(), 2);
    }

    #[test]
    fn test_missing_sections_default() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PipelineConfig::from_json("{\"defaults\": [1, 2]}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_defaults_apply() {
        let config = PipelineConfig::from_json(CONFIG).unwrap();
        let params = config.resolve_params(&ParamMap::new());
        assert_eq!(params, param_map([("bg", "white"), ("or", "auto")]));
    }

    #[test]
    fn test_preset_precedence() {
        let config = PipelineConfig::from_json(CONFIG).unwrap();
        let params = config.resolve_params(&param_map([("p", "avatar, red, nope")]));
        assert_eq!(params.get("bg").map(String::as_str), Some("red"));
        assert_eq!(params.get("shape").map(String::as_str), Some("circle"));
        assert!(params.contains_key("strim"));
    }

    #[test]
    fn test_request_wins() {
        let config = PipelineConfig::from_json(CONFIG).unwrap();
        let params = config.resolve_params(&param_map([("p", "red"), ("bg", "blue")]));
        assert_eq!(params.get("bg").map(String::as_str), Some("blue"));
    }
}

//! JSON settings file with per method parameters.
//!
//! ```json
//! {
//!   "method": "dct",
//!   "fallback": true,
//!   "methods": {
//!     "dct": { "step": 12.0, "coefficient": [3, 4] },
//!     "audio-dct": { "channel": { "audio": 1 } }
//!   }
//! }
//! ```
//!
//! Every field that is missing falls back to [`EmbeddingParams::for_variant`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::{EmbeddingParams, Variant};
use crate::result::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// method used when none is given explicitly
    pub method: Variant,
    /// retry the candidate steps when unveiling yields nothing plausible
    pub fallback: bool,
    /// partial [`EmbeddingParams`] per method
    pub methods: BTreeMap<Variant, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            method: Variant::BlockDct,
            fallback: true,
            methods: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// defaults of `variant` with the configured overrides applied on top
    pub fn params_for(&self, variant: Variant) -> Result<EmbeddingParams> {
        let mut params = serde_json::to_value(EmbeddingParams::for_variant(variant))?;
        if let (Value::Object(target), Some(Value::Object(overrides))) =
            (&mut params, self.methods.get(&variant))
        {
            for (key, value) in overrides.iter().filter(|(key, _)| *key != "variant") {
                target.insert(key.clone(), value.clone());
            }
        }

        Ok(serde_json::from_value(params)?)
    }

    /// parameters of the default method
    pub fn params(&self) -> Result<EmbeddingParams> {
        self.params_for(self.method)
    }
}

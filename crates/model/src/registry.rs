//! Registry entries tying the `"xylent"` tag to this crate's types.

use crate::config::XYLentConfig;
use crate::errors::{Error, Result};
use crate::variant::{ResourceLocator, Variant};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const MODEL_TYPE: &str = "xylent";
pub const CONFIG_NAME: &str = "config.json";

pub const PRETRAINED_CONFIG_ARCHIVE_MAP: &[(Variant, ResourceLocator)] = &[
    (Variant::Base, ResourceLocator::Pending),
    (Variant::Large, ResourceLocator::Pending),
];

pub fn pretrained_config_locator(variant: Variant) -> ResourceLocator {
    PRETRAINED_CONFIG_ARCHIVE_MAP
        .iter()
        .find(|(candidate, _)| *candidate == variant)
        .map(|(_, locator)| *locator)
        .unwrap_or(ResourceLocator::Pending)
}

/// Model families known to this workspace, keyed by their model-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    XYLent,
}

impl ModelFamily {
    pub const fn model_type(self) -> &'static str {
        match self {
            ModelFamily::XYLent => MODEL_TYPE,
        }
    }

    pub fn variants(self) -> &'static [Variant] {
        match self {
            ModelFamily::XYLent => &Variant::ALL,
        }
    }

    pub fn default_config(self) -> XYLentConfig {
        match self {
            ModelFamily::XYLent => XYLentConfig::default(),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_type())
    }
}

impl FromStr for ModelFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve_model_type(s)
    }
}

pub fn resolve_model_type(tag: &str) -> Result<ModelFamily> {
    match tag.trim() {
        MODEL_TYPE => Ok(ModelFamily::XYLent),
        other => Err(Error::UnknownModelType(other.to_owned())),
    }
}

/// Builds a configuration from a persisted document, dispatching on its
/// `model_type` key. Documents without the key are read as XYLent.
pub fn load_config(document: Value) -> Result<XYLentConfig> {
    let family = match document.get("model_type") {
        None | Some(Value::Null) => ModelFamily::XYLent,
        Some(Value::String(tag)) => resolve_model_type(tag)?,
        Some(other) => {
            return Err(Error::ConfigFormat(format!(
                "model_type must be a string, found {other}"
            )))
        }
    };
    log::debug!("resolved model type '{family}'");
    match family {
        ModelFamily::XYLent => XYLentConfig::from_json_value(document),
    }
}

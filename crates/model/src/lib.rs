//! Configuration metadata for the XYLent encoder family.
//!
//! [`XYLentConfig`] carries the architecture hyperparameters with their
//! defaults and persists them as a flat `config.json` document tagged with
//! the `"xylent"` model type. [`Variant`] enumerates the published sizes and
//! [`registry`] maps both onto the locations their pretrained artifacts will
//! be served from.

pub mod config;
pub mod errors;
pub mod registry;
pub mod variant;

pub use config::{parse_override_value, XYLentConfig, XYLentConfigOverrides};
pub use errors::{Error, Result};
pub use registry::{load_config, resolve_model_type, ModelFamily, CONFIG_NAME, MODEL_TYPE};
pub use variant::{ResourceLocator, Variant};

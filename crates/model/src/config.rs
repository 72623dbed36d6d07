use crate::errors::{Error, Result};
use crate::registry::{self, CONFIG_NAME, MODEL_TYPE};
use crate::variant::{ResourceLocator, Variant};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_VOCAB_SIZE: usize = 500_002;
pub const DEFAULT_HIDDEN_SIZE: usize = 768;
pub const DEFAULT_NUM_HIDDEN_LAYERS: usize = 12;
pub const DEFAULT_NUM_ATTENTION_HEADS: usize = 12;
pub const DEFAULT_INTERMEDIATE_SIZE: usize = 3072;
pub const DEFAULT_HIDDEN_ACT: &str = "gelu";
pub const DEFAULT_HIDDEN_DROPOUT_PROB: f64 = 0.1;
pub const DEFAULT_ATTENTION_PROBS_DROPOUT_PROB: f64 = 0.1;
pub const DEFAULT_MAX_POSITION_EMBEDDINGS: usize = 514;
pub const DEFAULT_PAD_TOKEN_ID: u32 = 1;
pub const DEFAULT_TYPE_VOCAB_SIZE: usize = 1;
pub const DEFAULT_INITIALIZER_RANGE: f64 = 0.02;
pub const DEFAULT_LAYER_NORM_EPS: f64 = 1e-5;
pub const DEFAULT_EXPAND_QK_DIM: usize = 64;
pub const DEFAULT_REL_POS_BINS: usize = 32;
pub const DEFAULT_MAX_REL_POS: usize = 128;

/// Architecture hyperparameters of a XYLent encoder.
///
/// Every field is optional on input: keys missing from a persisted document
/// take their default, and keys this record does not know are kept in
/// [`XYLentConfig::extra`] so they survive a save/load cycle. No range or
/// cross-field checks happen here; those belong to whatever builds the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XYLentConfig {
    pub vocab_size: usize,
    pub hidden_size: usize,
    pub num_hidden_layers: usize,
    pub num_attention_heads: usize,
    /// Width of the feed-forward layer.
    pub intermediate_size: usize,
    /// Activation name, e.g. `gelu`, `relu`, `swish` or `gelu_new`.
    pub hidden_act: String,
    pub hidden_dropout_prob: f64,
    pub attention_probs_dropout_prob: f64,
    pub max_position_embeddings: usize,
    pub pad_token_id: u32,
    pub type_vocab_size: usize,
    /// Standard deviation of the truncated normal weight initializer.
    pub initializer_range: f64,
    pub layer_norm_eps: f64,
    pub expand_qk_dim: usize,
    /// Number of buckets used by the relative position bias.
    pub rel_pos_bins: usize,
    pub max_rel_pos: usize,
    pub use_key_bias: bool,
    pub ignore_gru_gate: bool,
    pub initialize_token_type_embeddings: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for XYLentConfig {
    fn default() -> Self {
        Self {
            vocab_size: DEFAULT_VOCAB_SIZE,
            hidden_size: DEFAULT_HIDDEN_SIZE,
            num_hidden_layers: DEFAULT_NUM_HIDDEN_LAYERS,
            num_attention_heads: DEFAULT_NUM_ATTENTION_HEADS,
            intermediate_size: DEFAULT_INTERMEDIATE_SIZE,
            hidden_act: DEFAULT_HIDDEN_ACT.to_owned(),
            hidden_dropout_prob: DEFAULT_HIDDEN_DROPOUT_PROB,
            attention_probs_dropout_prob: DEFAULT_ATTENTION_PROBS_DROPOUT_PROB,
            max_position_embeddings: DEFAULT_MAX_POSITION_EMBEDDINGS,
            pad_token_id: DEFAULT_PAD_TOKEN_ID,
            type_vocab_size: DEFAULT_TYPE_VOCAB_SIZE,
            initializer_range: DEFAULT_INITIALIZER_RANGE,
            layer_norm_eps: DEFAULT_LAYER_NORM_EPS,
            expand_qk_dim: DEFAULT_EXPAND_QK_DIM,
            rel_pos_bins: DEFAULT_REL_POS_BINS,
            max_rel_pos: DEFAULT_MAX_REL_POS,
            use_key_bias: false,
            ignore_gru_gate: false,
            initialize_token_type_embeddings: true,
            extra: BTreeMap::new(),
        }
    }
}

/// Named overrides applied on top of the defaults. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XYLentConfigOverrides {
    pub vocab_size: Option<usize>,
    pub hidden_size: Option<usize>,
    pub num_hidden_layers: Option<usize>,
    pub num_attention_heads: Option<usize>,
    pub intermediate_size: Option<usize>,
    pub hidden_act: Option<String>,
    pub hidden_dropout_prob: Option<f64>,
    pub attention_probs_dropout_prob: Option<f64>,
    pub max_position_embeddings: Option<usize>,
    pub pad_token_id: Option<u32>,
    pub type_vocab_size: Option<usize>,
    pub initializer_range: Option<f64>,
    pub layer_norm_eps: Option<f64>,
    pub expand_qk_dim: Option<usize>,
    pub rel_pos_bins: Option<usize>,
    pub max_rel_pos: Option<usize>,
    pub use_key_bias: Option<bool>,
    pub ignore_gru_gate: Option<bool>,
    pub initialize_token_type_embeddings: Option<bool>,
}

const MODEL_TYPE_KEY: &str = "model_type";

impl XYLentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overrides(overrides: XYLentConfigOverrides) -> Self {
        Self::default().with_overrides(overrides)
    }

    pub fn with_overrides(mut self, overrides: XYLentConfigOverrides) -> Self {
        if let Some(value) = overrides.vocab_size {
            self.vocab_size = value;
        }
        if let Some(value) = overrides.hidden_size {
            self.hidden_size = value;
        }
        if let Some(value) = overrides.num_hidden_layers {
            self.num_hidden_layers = value;
        }
        if let Some(value) = overrides.num_attention_heads {
            self.num_attention_heads = value;
        }
        if let Some(value) = overrides.intermediate_size {
            self.intermediate_size = value;
        }
        if let Some(value) = overrides.hidden_act {
            self.hidden_act = value;
        }
        if let Some(value) = overrides.hidden_dropout_prob {
            self.hidden_dropout_prob = value;
        }
        if let Some(value) = overrides.attention_probs_dropout_prob {
            self.attention_probs_dropout_prob = value;
        }
        if let Some(value) = overrides.max_position_embeddings {
            self.max_position_embeddings = value;
        }
        if let Some(value) = overrides.pad_token_id {
            self.pad_token_id = value;
        }
        if let Some(value) = overrides.type_vocab_size {
            self.type_vocab_size = value;
        }
        if let Some(value) = overrides.initializer_range {
            self.initializer_range = value;
        }
        if let Some(value) = overrides.layer_norm_eps {
            self.layer_norm_eps = value;
        }
        if let Some(value) = overrides.expand_qk_dim {
            self.expand_qk_dim = value;
        }
        if let Some(value) = overrides.rel_pos_bins {
            self.rel_pos_bins = value;
        }
        if let Some(value) = overrides.max_rel_pos {
            self.max_rel_pos = value;
        }
        if let Some(value) = overrides.use_key_bias {
            self.use_key_bias = value;
        }
        if let Some(value) = overrides.ignore_gru_gate {
            self.ignore_gru_gate = value;
        }
        if let Some(value) = overrides.initialize_token_type_embeddings {
            self.initialize_token_type_embeddings = value;
        }
        self
    }

    /// Registry tag written into every persisted document.
    pub fn model_type(&self) -> &'static str {
        MODEL_TYPE
    }

    /// Assigns a single key. Known fields must receive a value of the right
    /// shape; anything else lands in [`XYLentConfig::extra`].
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidOverride("override key must not be empty".into()));
        }
        if key == MODEL_TYPE_KEY {
            return Err(Error::InvalidOverride(format!(
                "'{MODEL_TYPE_KEY}' is fixed to '{MODEL_TYPE}'"
            )));
        }

        let mut document = self.to_json_map()?;
        document.insert(key.to_owned(), value);
        *self = Self::from_json_map(document)
            .map_err(|err| Error::InvalidOverride(format!("{key}: {err}")))?;
        Ok(())
    }

    /// Applies `key=value` assignments separated by commas, e.g.
    /// `"hidden_size=1024,use_key_bias=true"`. Every key must already be part
    /// of the serialized configuration.
    pub fn update_from_string(&mut self, update: &str) -> Result<()> {
        let known = self.to_json_map()?;
        for assignment in update.split(',').filter(|part| !part.trim().is_empty()) {
            let (key, raw) = assignment.split_once('=').ok_or_else(|| {
                Error::InvalidOverride(format!(
                    "'{}' must be in the form key=value",
                    assignment.trim()
                ))
            })?;
            let key = key.trim();
            if !known.contains_key(key) {
                return Err(Error::InvalidOverride(format!(
                    "key '{key}' is not part of this configuration"
                )));
            }
            self.set(key, parse_override_value(raw))?;
        }
        Ok(())
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(contents)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_json_map(map),
            other => Err(Error::ConfigFormat(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Loads a configuration file, choosing the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            Some("toml") | Some("tml") | None => {
                log::debug!("loading configuration from {}", path.display());
                let contents = fs::read_to_string(path)?;
                let value: Value = toml::from_str(&contents)?;
                Self::from_json_value(value)
            }
            Some(other) => Err(Error::ConfigFormat(format!(
                "unsupported configuration extension '{other}'"
            ))),
        }
    }

    /// Resolves a local directory, a local file, or a registered variant name.
    pub fn from_pretrained(name_or_path: &str) -> Result<Self> {
        let path = Path::new(name_or_path);
        if path.is_dir() {
            return Self::from_json_file(path.join(CONFIG_NAME));
        }
        if path.is_file() {
            return Self::from_path(path);
        }

        let variant: Variant = name_or_path.parse()?;
        Self::from_locator(variant, registry::pretrained_config_locator(variant))
    }

    /// Loads the published configuration of `variant`. Nothing is fetched:
    /// a pending locator and a remote one both report why no local copy
    /// exists.
    pub fn from_locator(variant: Variant, locator: ResourceLocator) -> Result<Self> {
        match locator {
            ResourceLocator::Pending => Err(Error::PendingResource {
                variant: variant.name().to_owned(),
                resource: CONFIG_NAME.to_owned(),
            }),
            ResourceLocator::Remote(url) => Err(Error::RemoteUnavailable {
                variant: variant.name().to_owned(),
                resource: CONFIG_NAME.to_owned(),
                url: url.to_owned(),
            }),
        }
    }

    pub fn to_json_value(&self) -> Result<Value> {
        Ok(Value::Object(self.to_json_map()?))
    }

    /// Keys whose value differs from a default configuration. `model_type`
    /// is always present.
    pub fn to_diff_map(&self) -> Result<Map<String, Value>> {
        let defaults = Self::default().to_json_map()?;
        let mut diff: Map<String, Value> = self
            .to_json_map()?
            .into_iter()
            .filter(|(key, value)| defaults.get(key) != Some(value))
            .collect();
        diff.insert(MODEL_TYPE_KEY.to_owned(), Value::String(MODEL_TYPE.to_owned()));
        Ok(diff)
    }

    pub fn to_json_string(&self, use_diff: bool) -> Result<String> {
        let document = if use_diff {
            self.to_diff_map()?
        } else {
            self.to_json_map()?
        };
        let mut rendered = serde_json::to_string_pretty(&Value::Object(document))?;
        rendered.push('\n');
        Ok(rendered)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>, use_diff: bool) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.to_json_string(use_diff)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Writes `config.json` into `dir`, creating the directory if needed.
    pub fn save_pretrained(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if dir.is_file() {
            return Err(Error::ConfigFormat(format!(
                "provided path {} should be a directory, not a file",
                dir.display()
            )));
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(CONFIG_NAME);
        self.to_json_file(&path, true)?;
        log::info!("configuration saved in {}", path.display());
        Ok(path)
    }

    fn to_json_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(mut map) => {
                map.insert(MODEL_TYPE_KEY.to_owned(), Value::String(MODEL_TYPE.to_owned()));
                Ok(map)
            }
            other => Err(Error::ConfigFormat(format!(
                "configuration serialized to {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_json_map(mut map: Map<String, Value>) -> Result<Self> {
        match map.remove(MODEL_TYPE_KEY) {
            Some(Value::String(tag)) if tag == MODEL_TYPE => {}
            Some(other) => log::warn!(
                "loading a '{}' configuration into a '{MODEL_TYPE}' configuration; this is not supported for all configurations of models and can yield errors",
                other.as_str().unwrap_or("<non-string>")
            ),
            None => {}
        }
        let config = serde_json::from_value(Value::Object(map))?;
        Ok(config)
    }
}

/// Infers a JSON value from a raw command-line style assignment.
pub fn parse_override_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if trimmed.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(int_val) = trimmed.parse::<i64>() {
        return Value::Number(Number::from(int_val));
    }
    if let Ok(float_val) = trimmed.parse::<f64>() {
        if let Some(number) = Number::from_f64(float_val) {
            return Value::Number(number);
        }
    }
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(json_val) = serde_json::from_str::<Value>(trimmed) {
            return json_val;
        }
    }
    Value::String(trimmed.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Special tokens of the sentencepiece vocabulary, fairseq layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialTokens {
    pub bos: String,
    pub eos: String,
    pub sep: String,
    pub cls: String,
    pub unk: String,
    pub pad: String,
    pub mask: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            bos: "<s>".to_owned(),
            eos: "</s>".to_owned(),
            sep: "</s>".to_owned(),
            cls: "<s>".to_owned(),
            unk: "<unk>".to_owned(),
            pad: "<pad>".to_owned(),
            mask: "<mask>".to_owned(),
        }
    }
}

impl SpecialTokens {
    /// Distinct special tokens in vocabulary order.
    pub fn distinct(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = Vec::with_capacity(7);
        for token in [
            &self.bos, &self.pad, &self.eos, &self.unk, &self.cls, &self.sep, &self.mask,
        ] {
            if !tokens.contains(&token.as_str()) {
                tokens.push(token.as_str());
            }
        }
        tokens
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    pub special_tokens: SpecialTokens,
    /// Install the `<s> A </s>` / `<s> A </s></s> B </s>` template.
    pub add_special_tokens: bool,
    /// Overrides the variant's max input size when set.
    pub model_max_length: Option<usize>,
    pub padding: bool,
    /// Directory holding one sub-directory per downloaded variant.
    pub cache_dir: Option<PathBuf>,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            special_tokens: SpecialTokens::default(),
            add_special_tokens: true,
            model_max_length: None,
            padding: true,
            cache_dir: None,
        }
    }
}

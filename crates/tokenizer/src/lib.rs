//! Pretrained tokenizer loading for the XYLent model family.
//!
//! A tokenizer family is described by a [`TokenizerDescriptor`]: which
//! vocabulary files live in a model directory, where each [`Variant`]'s files
//! are published, and the maximum input length each variant accepts.
//! [`PretrainedTokenizer`] combines a descriptor with a
//! [`tokenizers::Tokenizer`] loaded from `tokenizer.json`; the segmentation
//! itself is entirely the `tokenizers` crate's.
//!
//! # Loading
//!
//! [`xylent::from_dir`] loads from a local directory. [`xylent::from_pretrained`]
//! also accepts a variant name and looks for `cache_dir/<variant>`; variants
//! with no local copy fail with the locator status of their files, since no
//! location has been published for them yet.
//!
//! # Special tokens
//!
//! Single sequences are wrapped as `<s> A </s>`, pairs as
//! `<s> A </s> </s> B </s>`, with a single token type. `<pad>` must map to the
//! model's `pad_token_id`, see [`PretrainedTokenizer::check_against_config`].

pub mod artifacts;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod xylent;

mod postprocessor;
mod pretrained;
mod validate;

pub use config::{SpecialTokens, TokenizerOptions};
pub use descriptor::{FileLocators, TokenizerDescriptor, VocabFile};
pub use errors::{Error, Result};
pub use pretrained::PretrainedTokenizer;
pub use xylent::XYLENT;
pub use xylent_model::{ResourceLocator, Variant};

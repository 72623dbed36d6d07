//! The XYLent tokenizer: the XLM-RoBERTa sentencepiece pipeline with a
//! vocabulary grown from 250002 to 500002 entries.

use crate::config::TokenizerOptions;
use crate::descriptor::{FileLocators, TokenizerDescriptor, VocabFile};
use crate::errors::Result;
use crate::pretrained::PretrainedTokenizer;
use std::path::Path;
use xylent_model::{ResourceLocator, Variant, MODEL_TYPE};

pub const VOCAB_FILES_NAMES: &[VocabFile] = &[
    VocabFile {
        key: "vocab_file",
        file_name: "sentencepiece.bpe.model",
        required: false,
    },
    VocabFile {
        key: "tokenizer_file",
        file_name: "tokenizer.json",
        required: true,
    },
];

pub const PRETRAINED_VOCAB_FILES_MAP: &[FileLocators] = &[
    FileLocators {
        key: "vocab_file",
        locators: &[
            (Variant::Base, ResourceLocator::Pending),
            (Variant::Large, ResourceLocator::Pending),
        ],
    },
    FileLocators {
        key: "tokenizer_file",
        locators: &[
            (Variant::Base, ResourceLocator::Pending),
            (Variant::Large, ResourceLocator::Pending),
        ],
    },
];

pub const PRETRAINED_POSITIONAL_EMBEDDINGS_SIZES: &[(Variant, usize)] =
    &[(Variant::Base, 514), (Variant::Large, 514)];

pub static XYLENT: TokenizerDescriptor = TokenizerDescriptor {
    family: MODEL_TYPE,
    vocab_files: VOCAB_FILES_NAMES,
    pretrained_vocab_files: PRETRAINED_VOCAB_FILES_MAP,
    max_model_input_sizes: PRETRAINED_POSITIONAL_EMBEDDINGS_SIZES,
};

pub fn from_dir(
    dir: impl AsRef<Path>,
    variant: Option<Variant>,
    options: TokenizerOptions,
) -> Result<PretrainedTokenizer> {
    PretrainedTokenizer::from_dir(&XYLENT, dir, variant, options)
}

pub fn from_pretrained(name_or_path: &str, options: TokenizerOptions) -> Result<PretrainedTokenizer> {
    PretrainedTokenizer::from_pretrained(&XYLENT, name_or_path, options)
}

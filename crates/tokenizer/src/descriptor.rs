//! Static tables describing where a tokenizer family keeps its vocabulary.

use crate::errors::{Error, Result};
use std::collections::HashSet;
use xylent_model::{ResourceLocator, Variant};

/// A vocabulary file the tokenizer looks for in a local directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabFile {
    pub key: &'static str,
    pub file_name: &'static str,
    pub required: bool,
}

/// Remote locations of one vocabulary file, one entry per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLocators {
    pub key: &'static str,
    pub locators: &'static [(Variant, ResourceLocator)],
}

/// Everything that distinguishes one pretrained tokenizer family from another.
/// The tokenization itself is shared; see [`crate::PretrainedTokenizer`].
#[derive(Debug, Clone, Copy)]
pub struct TokenizerDescriptor {
    pub family: &'static str,
    pub vocab_files: &'static [VocabFile],
    pub pretrained_vocab_files: &'static [FileLocators],
    pub max_model_input_sizes: &'static [(Variant, usize)],
}

impl TokenizerDescriptor {
    pub fn vocab_file(&self, key: &str) -> Option<&'static VocabFile> {
        self.vocab_files.iter().find(|file| file.key == key)
    }

    pub fn vocab_file_name(&self, key: &str) -> Option<&'static str> {
        self.vocab_file(key).map(|file| file.file_name)
    }

    pub fn locator(&self, key: &str, variant: Variant) -> Option<ResourceLocator> {
        self.pretrained_vocab_files
            .iter()
            .find(|table| table.key == key)?
            .locators
            .iter()
            .find(|(candidate, _)| *candidate == variant)
            .map(|(_, locator)| *locator)
    }

    pub fn max_model_input_size(&self, variant: Variant) -> Option<usize> {
        self.max_model_input_sizes
            .iter()
            .find(|(candidate, _)| *candidate == variant)
            .map(|(_, size)| *size)
    }

    /// Variants with a declared maximum input size, in declaration order.
    pub fn variants(&self) -> impl Iterator<Item = Variant> + '_ {
        self.max_model_input_sizes.iter().map(|(variant, _)| *variant)
    }

    pub fn validate(&self) -> Result<()> {
        let mut file_keys = HashSet::new();
        for file in self.vocab_files {
            if file.file_name.is_empty() {
                return Err(Error::Descriptor(format!(
                    "{}: vocab file '{}' has an empty file name",
                    self.family, file.key
                )));
            }
            if !file_keys.insert(file.key) {
                return Err(Error::Descriptor(format!(
                    "{}: vocab file key '{}' is declared more than once",
                    self.family, file.key
                )));
            }
        }

        let mut sized = HashSet::new();
        for (variant, size) in self.max_model_input_sizes {
            if *size == 0 {
                return Err(Error::Descriptor(format!(
                    "{}: max input size for '{variant}' must be greater than zero",
                    self.family
                )));
            }
            if !sized.insert(*variant) {
                return Err(Error::Descriptor(format!(
                    "{}: max input size for '{variant}' is declared more than once",
                    self.family
                )));
            }
        }

        // Key checks run over every table before any per-table check, so a key
        // split across two tables is reported as such and not as a gap.
        let mut mapped_keys = HashSet::new();
        for table in self.pretrained_vocab_files {
            if !file_keys.contains(table.key) {
                return Err(Error::Descriptor(format!(
                    "{}: locators given for undeclared vocab file '{}'",
                    self.family, table.key
                )));
            }
            if !mapped_keys.insert(table.key) {
                return Err(Error::Descriptor(format!(
                    "{}: locator table for '{}' is declared more than once; merge the variants into one table",
                    self.family, table.key
                )));
            }
        }

        for table in self.pretrained_vocab_files {
            let mut seen = HashSet::new();
            for (variant, _) in table.locators {
                if !seen.insert(*variant) {
                    return Err(Error::Descriptor(format!(
                        "{}: '{}' lists variant '{variant}' more than once",
                        self.family, table.key
                    )));
                }
            }
            if let Some(missing) = sized.iter().find(|variant| !seen.contains(*variant)) {
                return Err(Error::Descriptor(format!(
                    "{}: '{}' has no locator for variant '{missing}'",
                    self.family, table.key
                )));
            }
        }

        Ok(())
    }
}

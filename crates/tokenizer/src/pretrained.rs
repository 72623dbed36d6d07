use crate::artifacts::{
    copy_files, load_tokenizer_from_json, resolve_vocab_files, sha256_of_files, unix_timestamp,
    write_manifest, ArtifactManifest, ResolvedFiles, MANIFEST_NAME, TOKENIZER_FILE_KEY,
};
use crate::config::TokenizerOptions;
use crate::descriptor::TokenizerDescriptor;
use crate::errors::{Error, Result};
use crate::postprocessor::build_template;
use crate::validate::{
    check_against_config, validate_max_length, validate_options, validate_tokenizer,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::{Encoding, PaddingParams, Tokenizer, TruncationParams};
use xylent_model::{ResourceLocator, Variant, XYLentConfig};

/// A sentencepiece-vocabulary tokenizer whose family-specific knowledge lives
/// entirely in a [`TokenizerDescriptor`].
///
/// Segmentation, special-token handling and (de)serialization are delegated
/// to [`tokenizers::Tokenizer`], loaded from the family's `tokenizer.json`.
/// The descriptor decides which files are looked up, where each variant's
/// files are published and how long an input each variant accepts.
pub struct PretrainedTokenizer {
    descriptor: &'static TokenizerDescriptor,
    inner: Tokenizer,
    options: TokenizerOptions,
    variant: Option<Variant>,
    files: ResolvedFiles,
    special_ids: HashMap<String, u32>,
    cls_id: u32,
    sep_id: u32,
    model_max_length: Option<usize>,
}

impl PretrainedTokenizer {
    /// Loads the vocabulary files found in `dir`. `variant` selects the
    /// maximum input size; without it inputs are only bounded by
    /// `options.model_max_length`.
    pub fn from_dir(
        descriptor: &'static TokenizerDescriptor,
        dir: impl AsRef<Path>,
        variant: Option<Variant>,
        options: TokenizerOptions,
    ) -> Result<Self> {
        descriptor.validate()?;
        validate_options(&options)?;

        let files = resolve_vocab_files(descriptor, dir.as_ref())?;
        let json_path = files.path(TOKENIZER_FILE_KEY).ok_or_else(|| {
            Error::Artifact(format!(
                "{} does not provide a '{TOKENIZER_FILE_KEY}' in {}",
                descriptor.family,
                files.dir.display()
            ))
        })?;
        let mut inner = load_tokenizer_from_json(json_path)?;

        let special_ids = validate_tokenizer(&inner, &options)?;
        let cls_id = special_id(&special_ids, &options.special_tokens.cls)?;
        let sep_id = special_id(&special_ids, &options.special_tokens.sep)?;
        let pad_id = special_id(&special_ids, &options.special_tokens.pad)?;

        if options.add_special_tokens {
            inner.with_post_processor(build_template(&options.special_tokens, &special_ids)?);
        }

        let variant_limit = variant.and_then(|v| descriptor.max_model_input_size(v));
        let model_max_length = match (variant_limit, options.model_max_length) {
            (Some(limit), Some(requested)) => Some(limit.min(requested)),
            (limit, requested) => limit.or(requested),
        };
        if let Some(max_length) = model_max_length {
            validate_max_length(max_length, options.add_special_tokens)?;
            inner.with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))?;
        }

        if options.padding {
            inner.with_padding(Some(PaddingParams {
                pad_id,
                pad_token: options.special_tokens.pad.clone(),
                ..Default::default()
            }));
        }

        ensure_send_sync(&inner);
        log::debug!(
            "loaded {} tokenizer from {} (variant: {}, max length: {:?}, vocab: {})",
            descriptor.family,
            files.dir.display(),
            variant.map(Variant::name).unwrap_or("<none>"),
            model_max_length,
            inner.get_vocab_size(true)
        );

        Ok(Self {
            descriptor,
            inner,
            options,
            variant,
            files,
            special_ids,
            cls_id,
            sep_id,
            model_max_length,
        })
    }

    /// Loads from a local directory, or from `cache_dir/<variant>` when given
    /// a variant name. Variants without a local copy report where their files
    /// would come from.
    pub fn from_pretrained(
        descriptor: &'static TokenizerDescriptor,
        name_or_path: &str,
        options: TokenizerOptions,
    ) -> Result<Self> {
        let path = Path::new(name_or_path);
        if path.is_dir() {
            return Self::from_dir(descriptor, path, None, options);
        }

        let variant = name_or_path
            .parse::<Variant>()
            .ok()
            .filter(|candidate| descriptor.variants().any(|known| known == *candidate))
            .ok_or_else(|| Error::UnknownVariant(name_or_path.to_owned()))?;

        if let Some(cache_dir) = options.cache_dir.as_ref() {
            let cached = cache_dir.join(variant.name());
            if cached.is_dir() {
                return Self::from_dir(descriptor, cached, Some(variant), options);
            }
            log::debug!("no cached copy of {variant} under {}", cache_dir.display());
        }

        match descriptor.locator(TOKENIZER_FILE_KEY, variant) {
            Some(ResourceLocator::Remote(url)) => Err(Error::RemoteUnavailable {
                variant: variant.name().to_owned(),
                file: TOKENIZER_FILE_KEY.to_owned(),
                url: url.to_owned(),
            }),
            Some(ResourceLocator::Pending) | None => Err(Error::PendingResource {
                variant: variant.name().to_owned(),
                file: TOKENIZER_FILE_KEY.to_owned(),
            }),
        }
    }

    pub fn descriptor(&self) -> &'static TokenizerDescriptor {
        self.descriptor
    }

    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    pub fn model_max_length(&self) -> Option<usize> {
        self.model_max_length
    }

    pub fn files(&self) -> &ResolvedFiles {
        &self.files
    }

    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }

    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }

    pub fn id_to_token(&self, id: u32) -> Option<String> {
        self.inner.id_to_token(id)
    }

    pub fn special_token_id(&self, token: &str) -> Option<u32> {
        self.special_ids.get(token).copied()
    }

    pub fn pad_token_id(&self) -> Option<u32> {
        self.special_token_id(&self.options.special_tokens.pad)
    }

    pub fn encode(&self, text: &str) -> Result<Encoding> {
        Ok(self.inner.encode(text, self.options.add_special_tokens)?)
    }

    pub fn encode_pair(&self, first: &str, second: &str) -> Result<Encoding> {
        Ok(self
            .inner
            .encode((first, second), self.options.add_special_tokens)?)
    }

    /// Encodes several texts at once; with padding enabled every encoding is
    /// padded to the longest one.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Encoding>> {
        Ok(self
            .inner
            .encode_batch(texts.to_vec(), self.options.add_special_tokens)?)
    }

    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        Ok(self.inner.decode(ids, skip_special_tokens)?)
    }

    pub fn build_inputs_with_special_tokens(&self, first: &[u32], second: Option<&[u32]>) -> Vec<u32> {
        let mut ids = Vec::with_capacity(first.len() + second.map_or(0, |s| s.len() + 3) + 2);
        ids.push(self.cls_id);
        ids.extend_from_slice(first);
        ids.push(self.sep_id);
        if let Some(second) = second {
            ids.push(self.sep_id);
            ids.extend_from_slice(second);
            ids.push(self.sep_id);
        }
        ids
    }

    /// 1 marks a special token, 0 a sequence token.
    pub fn special_tokens_mask(
        &self,
        first: &[u32],
        second: Option<&[u32]>,
        already_has_special_tokens: bool,
    ) -> Vec<u32> {
        if already_has_special_tokens {
            return first
                .iter()
                .chain(second.unwrap_or_default())
                .map(|id| u32::from(self.special_ids.values().any(|special| special == id)))
                .collect();
        }

        let mut mask = Vec::with_capacity(first.len() + second.map_or(0, |s| s.len() + 3) + 2);
        mask.push(1);
        mask.extend(std::iter::repeat(0).take(first.len()));
        mask.push(1);
        if let Some(second) = second {
            mask.push(1);
            mask.extend(std::iter::repeat(0).take(second.len()));
            mask.push(1);
        }
        mask
    }

    /// The vocabulary has a single segment type, so every position is 0.
    pub fn create_token_type_ids_from_sequences(
        &self,
        first: &[u32],
        second: Option<&[u32]>,
    ) -> Vec<u32> {
        vec![0; self.build_inputs_with_special_tokens(first, second).len()]
    }

    /// Copies the vocabulary files into `dir` next to a manifest recording
    /// their digest. Returns the copied file paths.
    pub fn save_vocabulary(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let written = copy_files(&self.files, dir)?;

        let paths: Vec<&Path> = written.iter().map(PathBuf::as_path).collect();
        let manifest = ArtifactManifest {
            family: self.descriptor.family.to_owned(),
            files: self
                .files
                .files
                .iter()
                .map(|(file, _)| file.file_name.to_owned())
                .collect(),
            sha256: sha256_of_files(&paths)?,
            created_at: unix_timestamp(),
            vocab_size: self.vocab_size(),
        };
        write_manifest(&dir.join(MANIFEST_NAME), &manifest)?;
        log::info!(
            "saved {} vocabulary files to {}",
            written.len(),
            dir.display()
        );

        Ok(written)
    }

    /// Checks the tokenizer agrees with the model it will feed.
    pub fn check_against_config(&self, config: &XYLentConfig) -> Result<()> {
        check_against_config(&self.inner, &self.options, config)
    }
}

fn special_id(special_ids: &HashMap<String, u32>, token: &str) -> Result<u32> {
    special_ids
        .get(token)
        .copied()
        .ok_or_else(|| Error::Validation(format!("special token '{token}' has no id")))
}

fn ensure_send_sync<T: Send + Sync>(_: &T) {}

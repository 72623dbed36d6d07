use crate::config::TokenizerOptions;
use crate::errors::{Error, Result};
use crate::postprocessor::PAIR_SPECIAL_TOKENS;
use std::collections::HashMap;
use tokenizers::Tokenizer;
use xylent_model::XYLentConfig;

pub fn validate_options(options: &TokenizerOptions) -> Result<()> {
    let tokens = &options.special_tokens;
    for (name, token) in [
        ("bos", &tokens.bos),
        ("eos", &tokens.eos),
        ("sep", &tokens.sep),
        ("cls", &tokens.cls),
        ("unk", &tokens.unk),
        ("pad", &tokens.pad),
        ("mask", &tokens.mask),
    ] {
        if token.trim().is_empty() {
            return Err(Error::Validation(format!(
                "special token '{name}' must not be empty"
            )));
        }
    }

    if options.model_max_length == Some(0) {
        return Err(Error::Validation(
            "model_max_length must be greater than zero".into(),
        ));
    }

    Ok(())
}

/// Truncation subtracts the template's special tokens from the limit, so the
/// limit has to leave room for the longest template.
pub fn validate_max_length(max_length: usize, add_special_tokens: bool) -> Result<()> {
    if add_special_tokens && max_length < PAIR_SPECIAL_TOKENS {
        return Err(Error::Validation(format!(
            "model_max_length {max_length} leaves no room for the {PAIR_SPECIAL_TOKENS} special tokens of a sequence pair"
        )));
    }
    Ok(())
}

/// Resolves the id of every distinct special token, failing on the first one
/// missing from the vocabulary.
pub fn validate_tokenizer(
    tok: &Tokenizer,
    options: &TokenizerOptions,
) -> Result<HashMap<String, u32>> {
    let mut special_ids = HashMap::new();
    for token in options.special_tokens.distinct() {
        let id = tok.token_to_id(token).ok_or_else(|| {
            Error::Validation(format!(
                "expected special token '{token}' to be present in tokenizer vocab"
            ))
        })?;
        special_ids.insert(token.to_owned(), id);
    }
    Ok(special_ids)
}

pub fn check_against_config(
    tok: &Tokenizer,
    options: &TokenizerOptions,
    config: &XYLentConfig,
) -> Result<()> {
    let pad = options.special_tokens.pad.as_str();
    match tok.token_to_id(pad) {
        Some(id) if id == config.pad_token_id => {}
        Some(id) => {
            return Err(Error::Validation(format!(
                "tokenizer maps '{pad}' to {id} but the model expects pad_token_id {}",
                config.pad_token_id
            )))
        }
        None => {
            return Err(Error::Validation(format!(
                "tokenizer has no '{pad}' token"
            )))
        }
    }

    let actual_size = tok.get_vocab_size(true);
    if actual_size > config.vocab_size {
        return Err(Error::Validation(format!(
            "tokenizer vocab size {actual_size} exceeds model vocab_size {}",
            config.vocab_size
        )));
    }

    Ok(())
}

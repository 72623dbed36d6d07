use crate::config::SpecialTokens;
use crate::errors::{Error, Result};
use std::collections::HashMap;
use tokenizers::processors::template::TemplateProcessing;

/// Special tokens the pair template wraps around two sequences.
pub const PAIR_SPECIAL_TOKENS: usize = 4;

/// `<s> A </s>` for single sequences, `<s> A </s> </s> B </s>` for pairs.
/// Every piece keeps type id 0.
pub fn build_template(
    tokens: &SpecialTokens,
    special_ids: &HashMap<String, u32>,
) -> Result<TemplateProcessing> {
    for token in [&tokens.cls, &tokens.sep] {
        if !special_ids.contains_key(token.as_str()) {
            return Err(Error::Validation(format!(
                "template requires special token '{token}' in the vocabulary"
            )));
        }
    }

    let mut builder = TemplateProcessing::builder();
    builder
        .try_single(single_sequence_template(tokens))
        .map_err(Error::Validation)?;
    builder
        .try_pair(pair_sequence_template(tokens))
        .map_err(Error::Validation)?;

    let template_tokens = [&tokens.cls, &tokens.sep]
        .into_iter()
        .filter_map(|token| special_ids.get(token.as_str()).map(|id| (token.clone(), *id)))
        .collect::<Vec<_>>();
    builder.special_tokens(template_tokens);

    builder
        .build()
        .map_err(|err| Error::Validation(err.to_string()))
}

fn single_sequence_template(tokens: &SpecialTokens) -> Vec<String> {
    vec![
        format!("{}:0", tokens.cls),
        "$A:0".to_owned(),
        format!("{}:0", tokens.sep),
    ]
}

fn pair_sequence_template(tokens: &SpecialTokens) -> Vec<String> {
    vec![
        format!("{}:0", tokens.cls),
        "$A:0".to_owned(),
        format!("{}:0", tokens.sep),
        format!("{}:0", tokens.sep),
        "$B:0".to_owned(),
        format!("{}:0", tokens.sep),
    ]
}

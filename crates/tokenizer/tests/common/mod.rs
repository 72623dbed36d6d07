use serde_json::{json, Map, Value};
use std::fs;
use std::io;
use std::path::Path;

pub const VOCAB: [&str; 11] = [
    "<s>", "<pad>", "</s>", "<unk>", "hello", "world", "the", "quick", "brown", "fox", "<mask>",
];

pub fn id_of(token: &str) -> u32 {
    VOCAB
        .iter()
        .position(|candidate| *candidate == token)
        .unwrap_or_else(|| panic!("{token} is not in the fixture vocabulary")) as u32
}

/// Writes a whitespace word-level `tokenizer.json` laid out like the
/// fairseq sentencepiece vocabulary, plus a placeholder sentencepiece model.
pub fn write_fixture(dir: &Path) -> io::Result<()> {
    write_fixture_with(dir, &VOCAB)
}

pub fn write_fixture_with(dir: &Path, vocab: &[&str]) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    let mut entries = Map::new();
    let mut added = Vec::new();
    for (id, token) in vocab.iter().enumerate() {
        entries.insert((*token).to_owned(), json!(id));
        if token.starts_with('<') {
            added.push(json!({
                "id": id,
                "content": token,
                "single_word": false,
                "lstrip": false,
                "rstrip": false,
                "normalized": false,
                "special": true
            }));
        }
    }

    let document = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added,
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": Value::Object(entries),
            "unk_token": "<unk>"
        }
    });

    fs::write(
        dir.join("tokenizer.json"),
        serde_json::to_string_pretty(&document)?,
    )?;
    fs::write(dir.join("sentencepiece.bpe.model"), b"spm-placeholder")?;
    Ok(())
}

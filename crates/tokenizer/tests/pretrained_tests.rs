mod common;

use anyhow::Result;
use common::{id_of, write_fixture, write_fixture_with};
use tempfile::tempdir;
use xylent_model::{XYLentConfig, XYLentConfigOverrides};
use xylent_tokenizer::artifacts::{read_manifest, MANIFEST_NAME};
use xylent_tokenizer::{
    xylent, Error, FileLocators, PretrainedTokenizer, ResourceLocator, SpecialTokens,
    TokenizerDescriptor, TokenizerOptions, Variant, VocabFile,
};

#[test]
fn single_sequence_is_wrapped_in_cls_and_sep() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    let tok = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())?;

    let encoding = tok.encode("hello world")?;
    assert_eq!(
        encoding.get_ids(),
        &[id_of("<s>"), id_of("hello"), id_of("world"), id_of("</s>")]
    );
    assert_eq!(encoding.get_type_ids(), &[0, 0, 0, 0]);
    assert_eq!(tok.model_max_length(), None);
    Ok(())
}

#[test]
fn pair_uses_double_separator() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    let tok = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())?;

    let encoding = tok.encode_pair("hello", "world")?;
    let expected = tok.build_inputs_with_special_tokens(&[id_of("hello")], Some(&[id_of("world")][..]));
    assert_eq!(encoding.get_ids(), expected.as_slice());
    assert_eq!(
        expected,
        vec![0, id_of("hello"), 2, 2, id_of("world"), 2]
    );
    assert!(encoding.get_type_ids().iter().all(|type_id| *type_id == 0));
    Ok(())
}

#[test]
fn unknown_words_map_to_unk_and_decode_skips_specials() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    let tok = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())?;

    let encoding = tok.encode("hello zebra")?;
    assert_eq!(encoding.get_ids()[2], id_of("<unk>"));

    let decoded = tok.decode(&[0, id_of("the"), id_of("fox"), 2], true)?;
    assert_eq!(decoded, "the fox");
    Ok(())
}

#[test]
fn variant_sets_max_length_and_option_can_lower_it() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;

    let base = xylent::from_dir(tmp.path(), Some(Variant::Base), TokenizerOptions::default())?;
    assert_eq!(base.model_max_length(), Some(514));
    assert_eq!(base.variant(), Some(Variant::Base));

    let options = TokenizerOptions {
        model_max_length: Some(4),
        ..Default::default()
    };
    let short = xylent::from_dir(tmp.path(), Some(Variant::Large), options)?;
    assert_eq!(short.model_max_length(), Some(4));

    let encoding = short.encode("the quick brown fox hello")?;
    assert_eq!(
        encoding.get_ids(),
        &[id_of("<s>"), id_of("the"), id_of("quick"), id_of("</s>")]
    );
    Ok(())
}

#[test]
fn max_length_must_leave_room_for_pair_specials() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;

    for too_short in [1, 3] {
        let options = TokenizerOptions {
            model_max_length: Some(too_short),
            ..Default::default()
        };
        let err = xylent::from_dir(tmp.path(), Some(Variant::Base), options)
            .err()
            .expect("limit below the pair template must not load");
        assert!(
            matches!(&err, Error::Validation(msg) if msg.contains("model_max_length")),
            "unexpected error {err:?}"
        );
    }

    let options = TokenizerOptions {
        model_max_length: Some(4),
        ..Default::default()
    };
    let tok = xylent::from_dir(tmp.path(), None, options)?;
    assert_eq!(tok.encode_pair("hello", "world")?.get_ids().len(), 4);

    let without_specials = TokenizerOptions {
        add_special_tokens: false,
        model_max_length: Some(1),
        ..Default::default()
    };
    let tok = xylent::from_dir(tmp.path(), None, without_specials)?;
    assert_eq!(tok.encode("hello world")?.get_ids(), &[id_of("hello")]);
    Ok(())
}

#[test]
fn empty_special_token_is_rejected() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    let options = TokenizerOptions {
        special_tokens: SpecialTokens {
            mask: " ".to_owned(),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = xylent::from_dir(tmp.path(), None, options)
        .err()
        .expect("blank mask token must not load");
    assert!(
        matches!(&err, Error::Validation(msg) if msg.contains("'mask'")),
        "unexpected error {err:?}"
    );
    Ok(())
}

#[test]
fn batches_are_padded_with_pad_token() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    let tok = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())?;
    assert_eq!(tok.pad_token_id(), Some(1));

    let encodings = tok.encode_batch(&["hello", "the quick brown fox"])?;
    assert_eq!(encodings.len(), 2);
    assert_eq!(encodings[0].get_ids().len(), 6);
    assert_eq!(encodings[1].get_ids().len(), 6);
    assert_eq!(&encodings[0].get_ids()[3..], &[1, 1, 1]);
    assert_eq!(encodings[0].get_attention_mask(), &[1, 1, 1, 0, 0, 0]);
    Ok(())
}

#[test]
fn special_token_masks_and_type_ids() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    let tok = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())?;
    let first = [id_of("hello"), id_of("world")];
    let second = [id_of("fox")];

    assert_eq!(tok.special_tokens_mask(&first, None, false), vec![1, 0, 0, 1]);
    assert_eq!(
        tok.special_tokens_mask(&first, Some(&second[..]), false),
        vec![1, 0, 0, 1, 1, 0, 1]
    );

    let with_specials = tok.build_inputs_with_special_tokens(&first, None);
    assert_eq!(tok.special_tokens_mask(&with_specials, None, true), vec![1, 0, 0, 1]);

    assert_eq!(
        tok.create_token_type_ids_from_sequences(&first, Some(&second[..])),
        vec![0; 7]
    );
    Ok(())
}

#[test]
fn save_vocabulary_copies_files_and_writes_manifest() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    write_fixture(src.path())?;
    let tok = xylent::from_dir(src.path(), None, TokenizerOptions::default())?;

    let written = tok.save_vocabulary(dest.path().join("saved"))?;
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|path| path.is_file()));

    let manifest = read_manifest(&dest.path().join("saved").join(MANIFEST_NAME))?;
    assert_eq!(manifest.family, "xylent");
    assert_eq!(
        manifest.files,
        vec!["sentencepiece.bpe.model".to_owned(), "tokenizer.json".to_owned()]
    );
    assert_eq!(manifest.sha256.len(), 64);
    assert!(manifest.created_at.starts_with("unix:"));
    assert_eq!(manifest.vocab_size, 11);

    let reloaded = xylent::from_dir(dest.path().join("saved"), None, TokenizerOptions::default())?;
    assert_eq!(
        reloaded.encode("hello world")?.get_ids(),
        tok.encode("hello world")?.get_ids()
    );
    Ok(())
}

#[test]
fn sentencepiece_model_is_optional() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    std::fs::remove_file(tmp.path().join("sentencepiece.bpe.model"))?;

    let tok = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())?;
    assert!(tok.files().path("vocab_file").is_none());
    assert!(tok.files().path("tokenizer_file").is_some());
    Ok(())
}

#[test]
fn missing_tokenizer_json_is_an_artifact_error() -> Result<()> {
    let tmp = tempdir()?;
    let err = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())
        .err()
        .expect("empty directory must not load");
    assert!(matches!(err, Error::Artifact(_)), "unexpected error {err:?}");
    Ok(())
}

#[test]
fn missing_special_token_fails_validation() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture_with(
        tmp.path(),
        &["<s>", "<pad>", "</s>", "<unk>", "hello", "world"],
    )?;

    let err = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())
        .err()
        .expect("vocabulary without <mask> must not load");
    assert!(
        matches!(&err, Error::Validation(msg) if msg.contains("<mask>")),
        "unexpected error {err:?}"
    );
    Ok(())
}

#[test]
fn tokenizer_agrees_with_default_config() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;
    let tok = xylent::from_dir(tmp.path(), None, TokenizerOptions::default())?;

    tok.check_against_config(&XYLentConfig::default())?;

    let wrong_pad = XYLentConfig::from_overrides(XYLentConfigOverrides {
        pad_token_id: Some(0),
        ..Default::default()
    });
    assert!(matches!(
        tok.check_against_config(&wrong_pad),
        Err(Error::Validation(_))
    ));

    let tiny_vocab = XYLentConfig::from_overrides(XYLentConfigOverrides {
        vocab_size: Some(5),
        ..Default::default()
    });
    assert!(matches!(
        tok.check_against_config(&tiny_vocab),
        Err(Error::Validation(_))
    ));
    Ok(())
}

#[test]
fn variant_names_without_local_copy_are_pending() {
    for variant in Variant::ALL {
        let err = xylent::from_pretrained(variant.name(), TokenizerOptions::default())
            .err()
            .expect("no published location");
        assert!(
            matches!(&err, Error::PendingResource { variant: name, .. } if name == variant.name()),
            "unexpected error {err:?}"
        );
    }

    let err = xylent::from_pretrained("xylent-xxl", TokenizerOptions::default())
        .err()
        .expect("unknown variant");
    assert!(matches!(err, Error::UnknownVariant(_)));
}

#[test]
fn cached_variant_loads_with_its_max_length() -> Result<()> {
    let cache = tempdir()?;
    write_fixture(&cache.path().join("xylent-large"))?;
    let options = TokenizerOptions {
        cache_dir: Some(cache.path().to_path_buf()),
        ..Default::default()
    };

    let tok = xylent::from_pretrained("xylent-large", options.clone())?;
    assert_eq!(tok.variant(), Some(Variant::Large));
    assert_eq!(tok.model_max_length(), Some(514));

    let err = xylent::from_pretrained("xylent-base", options)
        .err()
        .expect("base is not cached");
    assert!(matches!(err, Error::PendingResource { .. }));
    Ok(())
}

#[test]
fn local_directory_path_loads_without_variant() -> Result<()> {
    let tmp = tempdir()?;
    write_fixture(tmp.path())?;

    let tok = xylent::from_pretrained(&tmp.path().to_string_lossy(), TokenizerOptions::default())?;
    assert_eq!(tok.variant(), None);
    assert_eq!(tok.vocab_size(), 11);
    assert_eq!(tok.token_to_id("<mask>"), Some(10));
    assert_eq!(tok.id_to_token(4).as_deref(), Some("hello"));
    Ok(())
}

static PUBLISHED_FILES: &[VocabFile] = &[VocabFile {
    key: "tokenizer_file",
    file_name: "tokenizer.json",
    required: true,
}];

static PUBLISHED_LOCATORS: &[FileLocators] = &[FileLocators {
    key: "tokenizer_file",
    locators: &[
        (
            Variant::Base,
            ResourceLocator::Remote("https://models.example.org/xylent-base/tokenizer.json"),
        ),
        (Variant::Large, ResourceLocator::Pending),
    ],
}];

static PUBLISHED: TokenizerDescriptor = TokenizerDescriptor {
    family: "published",
    vocab_files: PUBLISHED_FILES,
    pretrained_vocab_files: PUBLISHED_LOCATORS,
    max_model_input_sizes: &[(Variant::Base, 514), (Variant::Large, 514)],
};

#[test]
fn remote_locator_reports_its_url() -> Result<()> {
    PUBLISHED.validate()?;

    let err = PretrainedTokenizer::from_pretrained(&PUBLISHED, "xylent-base", TokenizerOptions::default())
        .err()
        .expect("remote files are never fetched");
    match err {
        Error::RemoteUnavailable { variant, file, url } => {
            assert_eq!(variant, "xylent-base");
            assert_eq!(file, "tokenizer_file");
            assert_eq!(url, "https://models.example.org/xylent-base/tokenizer.json");
        }
        other => panic!("unexpected error {other:?}"),
    }

    let err = PretrainedTokenizer::from_pretrained(&PUBLISHED, "xylent-large", TokenizerOptions::default())
        .err()
        .expect("large has no published location");
    assert!(matches!(err, Error::PendingResource { .. }));
    Ok(())
}

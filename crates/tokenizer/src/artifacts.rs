use crate::descriptor::{TokenizerDescriptor, VocabFile};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokenizers::Tokenizer;

pub const TOKENIZER_FILE_KEY: &str = "tokenizer_file";
pub const MANIFEST_NAME: &str = "tokenizer_manifest.json";

const TOKENIZER_JSON_ERR: &str = "tokenizer json not found at";
const MANIFEST_ERR: &str = "manifest not found at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub family: String,
    pub files: Vec<String>,
    pub sha256: String,
    pub created_at: String,
    pub vocab_size: usize,
}

/// Vocabulary files located in one directory.
#[derive(Debug, Clone)]
pub struct ResolvedFiles {
    pub dir: PathBuf,
    pub files: Vec<(&'static VocabFile, PathBuf)>,
}

impl ResolvedFiles {
    pub fn path(&self, key: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(file, _)| file.key == key)
            .map(|(_, path)| path.as_path())
    }
}

pub fn resolve_vocab_files(
    descriptor: &TokenizerDescriptor,
    dir: &Path,
) -> Result<ResolvedFiles> {
    if !dir.is_dir() {
        return Err(Error::Artifact(format!(
            "artifact directory not found at {}",
            dir.display()
        )));
    }

    let mut files = Vec::with_capacity(descriptor.vocab_files.len());
    for file in descriptor.vocab_files {
        let path = dir.join(file.file_name);
        if path.is_file() {
            files.push((file, path));
        } else if file.required {
            return Err(Error::Artifact(format!(
                "{} '{}' not found at {}",
                descriptor.family,
                file.key,
                path.display()
            )));
        } else {
            log::debug!(
                "optional vocab file '{}' not present in {}",
                file.key,
                dir.display()
            );
        }
    }

    Ok(ResolvedFiles {
        dir: dir.to_path_buf(),
        files,
    })
}

pub fn load_tokenizer_from_json(path: &Path) -> Result<Tokenizer> {
    ensure_file(path, TOKENIZER_JSON_ERR)?;
    Tokenizer::from_file(path).map_err(Error::from)
}

pub fn sha256_of_files(paths: &[&Path]) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8 * 1024];

    for path in paths {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Copies every resolved file into `dest`, keeping file names.
pub fn copy_files(files: &ResolvedFiles, dest: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest)?;
    let mut written = Vec::with_capacity(files.files.len());
    for (file, source) in &files.files {
        let target = dest.join(file.file_name);
        if source.canonicalize().ok() != target.canonicalize().ok() {
            fs::copy(source, &target)?;
        }
        written.push(target);
    }
    Ok(written)
}

pub fn write_manifest(manifest_path: &Path, manifest: &ArtifactManifest) -> Result<()> {
    if let Some(parent) = manifest_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(manifest_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_manifest(manifest_path: &Path) -> Result<ArtifactManifest> {
    ensure_file(manifest_path, MANIFEST_ERR)?;
    let file = File::open(manifest_path)?;
    let reader = BufReader::new(file);
    let manifest = serde_json::from_reader(reader)?;
    Ok(manifest)
}

pub(crate) fn unix_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    format!("unix:{secs}")
}

fn ensure_file(path: &Path, context: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::Artifact(format!("{context} {}", path.display())))
    }
}

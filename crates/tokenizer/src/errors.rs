use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] tokenizers::Error),

    #[error("model configuration error: {0}")]
    Model(#[from] xylent_model::Error),

    #[error("invalid descriptor: {0}")]
    Descriptor(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    #[error("{file} for variant '{variant}' has no published location yet")]
    PendingResource { variant: String, file: String },

    #[error("{file} for variant '{variant}' is hosted at {url}; fetch it into a local directory first")]
    RemoteUnavailable {
        variant: String,
        file: String,
        url: String,
    },
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("unsupported configuration format: {0}")]
    ConfigFormat(String),

    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    #[error("unknown model type '{0}'")]
    UnknownModelType(String),

    #[error("{resource} for variant '{variant}' has no published location yet")]
    PendingResource { variant: String, resource: String },

    #[error("{resource} for variant '{variant}' is hosted at {url}; fetch it into a local directory first")]
    RemoteUnavailable {
        variant: String,
        resource: String,
        url: String,
    },

    #[error("invalid override: {0}")]
    InvalidOverride(String),
}

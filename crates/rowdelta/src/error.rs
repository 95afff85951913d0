use thiserror::Error;

use rowdelta_diff::DiffError;
use rowdelta_sections::SectionError;

#[derive(Debug, Error)]
pub enum RowdeltaError {
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("cannot encode configuration: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("diff error: {0}")]
    Diff(#[from] DiffError),

    #[error("section error: {0}")]
    Section(#[from] SectionError),
}

pub type RowdeltaResult<T> = Result<T, RowdeltaError>;

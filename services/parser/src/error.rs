//! Error taxonomy for a conversion run.
//!
//! Only fatal conditions live here. Row-level problems (short rows, bad dates,
//! unknown names) are resolved to defaults or counted as skipped and never
//! become errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("input file {} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot detect text encoding of {}", .0.display())]
    UndetectableEncoding(PathBuf),

    #[error("no records survived processing")]
    NoRecords,

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

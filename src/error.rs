use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the substitution engine.
///
/// Table-source failures abort table construction entirely; no
/// partially-merged table is ever observable. Buffer errors are precondition
/// violations and fire before any pixel is written.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read color table source {path:?}")]
    TableIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse color table source {path:?}")]
    TableParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid color triplet {entry:?} in table source {path:?}")]
    InvalidColorEntry { path: PathBuf, entry: String },

    #[error("pixel buffer of {len} bytes does not match a {width}x{height} RGBA frame")]
    MalformedBuffer { len: usize, width: u32, height: u32 },
}

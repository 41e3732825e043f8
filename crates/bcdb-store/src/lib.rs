//! File-backed catalog storage: the merge store, atomic JSON persistence,
//! and the periodic checkpointer.

pub mod checkpoint;
pub mod merge;
pub mod persist;

use thiserror::Error;

pub use checkpoint::Checkpointer;
pub use merge::MergeStore;
pub use persist::{load_document, save_document};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file {path} is not a valid catalog document: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),
}

//! Error type shared by the library and the CLI driver

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No .mmd files found in {}", .0.display())]
    NoInput(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid token: {0}")]
    Decode(String),

    #[error("Failed to fetch {url} after {attempts} attempt(s): {source}")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: ureq::Error,
    },
}

impl Error {
    /// Process exit status for this error: 2 for usage errors, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::NotADirectory(_) => 2,
            _ => 1,
        }
    }
}

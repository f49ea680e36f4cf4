use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Recoverable conditions (a bad numeric field, an unknown
/// player name in a snapshot) never surface here; they zero-fill or skip at
/// the point of use and log a warning instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read match log {path}: {source}")]
    LogRead { path: PathBuf, source: io::Error },

    #[error("line {line}: expected at least {expected} comma-separated fields, found {found}")]
    MalformedLine {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("log ended after {lines} lines, before a full identity block")]
    TruncatedLog { lines: usize },

    #[error("identity block must name {expected} distinct players, found {found}")]
    IdentityBlock { expected: usize, found: usize },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("could not write leaderboard artifact {path}: {source}")]
    ArtifactWrite { path: PathBuf, source: io::Error },

    #[error("could not read leaderboard artifact {path}: {source}")]
    ArtifactRead { path: PathBuf, source: io::Error },

    #[error("malformed leaderboard artifact {path}: {source}")]
    ArtifactFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

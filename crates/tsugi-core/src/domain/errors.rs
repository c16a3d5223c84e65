//! Errors - エラー型と分類
//!
//! # 分類
//! - **ValidationError**: 入力検証（ローカルで完結、ネットワークに届かない）
//! - **SyncError::Network**: リモート到達不能（オフラインフォールバックの契機）
//! - **SyncError::Remote**: 非 2xx 応答（メッセージ付きで表面化、debounce 経路では reload）
//! - **SyncError::Cache**: ローカル blob の I/O 失敗（表面化のみ、致命ではない）

use thiserror::Error;

/// Maximum accepted name length, in characters after trimming.
pub const MAX_NAME_LEN: usize = 100;

/// Rejected user input. Resolved at the input boundary; never propagates
/// past it and never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("todo name must not be empty")]
    Empty,

    #[error("todo name must be at most {MAX_NAME_LEN} characters (got {0})")]
    TooLong(usize),

    #[error("a todo named {0:?} already exists")]
    Duplicate(String),
}

/// Failure at the remote or cache boundary, normalized to a single type
/// carrying a human-readable message.
///
/// No variant is fatal to the process: the worst case is silent divergence
/// between the local and remote copies until the next successful reload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Transport-level failure: the remote is unreachable.
    #[error("network unreachable: {0}")]
    Network(String),

    /// The remote answered with a non-2xx status. The message is the JSON
    /// body's `detail` field when present, otherwise the HTTP status line.
    #[error("remote error: {0}")]
    Remote(String),

    /// The local blob store failed to load or save.
    #[error("cache error: {0}")]
    Cache(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            ValidationError::Empty.to_string(),
            "todo name must not be empty"
        );
        assert_eq!(
            ValidationError::TooLong(120).to_string(),
            "todo name must be at most 100 characters (got 120)"
        );
        assert!(ValidationError::Duplicate("milk".into()).to_string().contains("milk"));
        assert_eq!(
            SyncError::Network("connection refused".into()).to_string(),
            "network unreachable: connection refused"
        );
    }
}

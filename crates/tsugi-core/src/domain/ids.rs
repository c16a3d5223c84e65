//! Domain identifier (strongly-typed ID).
//!
//! # ID の由来は2系統
//! - **リモート採番**: サーバーが整数 ID を割り当てる（POST /todos/ の応答）
//! - **ローカル採番**: オフライン時は epoch ミリ秒由来の単調増加値
//!
//! どちらも wire 上は整数なので、newtype は `i64` を包む。
//! 生成ロジック自体は `ports::IdGenerator` に置く。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a todo record.
///
/// Opaque to callers: assigned once at creation (by the remote store or the
/// local generator) and never reassigned afterwards. Serialized as a plain
/// integer to match the remote API.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Wire form (what PUT/DELETE paths interpolate).
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TodoId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ログ用プレフィックス。wire には出ない。
        write!(f, "todo-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix() {
        let id = TodoId::new(42);
        assert_eq!(id.to_string(), "todo-42");
    }

    #[test]
    fn serializes_as_bare_integer() {
        // Serialize/Deserialize のラウンドトリップテスト
        let id = TodoId::new(1717171717);
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, "1717171717");

        let deserialized: TodoId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn millisecond_derived_ids_are_sortable() {
        // ローカル採番はミリ秒由来なので、生成順序でソート可能
        let id1 = TodoId::new(1_700_000_000_000);
        let id2 = TodoId::new(1_700_000_000_001);
        assert!(id1 < id2);
    }

    #[test]
    fn newtype_does_not_add_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<TodoId>(), size_of::<i64>());
    }
}

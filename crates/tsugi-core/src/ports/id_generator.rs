//! IdGenerator port - ローカル採番の抽象化
//!
//! オンライン時の ID はサーバーが採番する。この port が要るのは
//! オフライン（ローカルフォールバック）経路だけ: キャッシュにしか無い
//! レコードにも一意な ID が必要になる。
//!
//! # 実装
//! - **MillisIdGenerator**: epoch ミリ秒由来（本番用）。同一ミリ秒内でも
//!   単調増加になるよう、直前に払い出した値を覚えておく。

use std::sync::Mutex;

use crate::domain::TodoId;
use crate::ports::Clock;

/// IdGenerator はローカルレコード用の一意な ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（debounce タスクと同じ Arc を共有する）
pub trait IdGenerator: Send + Sync {
    /// Todo ID を生成。呼ぶたびに厳密に増加する。
    fn next_todo_id(&self) -> TodoId;
}

/// MillisIdGenerator はミリ秒タイムスタンプベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ID を生成します。
/// これにより、テスト時に FixedClock を使って決定的な ID を生成できます。
pub struct MillisIdGenerator<C> {
    clock: C,
    last: Mutex<i64>,
}

impl<C: Clock> MillisIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: Mutex::new(0),
        }
    }
}

impl<C: Clock> IdGenerator for MillisIdGenerator<C> {
    fn next_todo_id(&self) -> TodoId {
        let now = self.clock.now().timestamp_millis();
        let mut last = self.last.lock().expect("id generator lock poisoned");
        // 同一ミリ秒（または逆行した時計）でも一意性を保つ
        let next = now.max(*last + 1);
        *last = next;
        TodoId::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn generates_unique_increasing_ids() {
        let id_gen = MillisIdGenerator::new(SystemClock);

        let id1 = id_gen.next_todo_id();
        let id2 = id_gen.next_todo_id();
        let id3 = id_gen.next_todo_id();

        assert!(id1 < id2);
        assert!(id2 < id3);
    }

    #[test]
    fn fixed_clock_still_yields_unique_ids() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = MillisIdGenerator::new(FixedClock::new(at));

        // 時計が止まっていても採番は進む
        let id1 = id_gen.next_todo_id();
        let id2 = id_gen.next_todo_id();

        assert_eq!(id1.as_i64(), at.timestamp_millis());
        assert_eq!(id2.as_i64(), at.timestamp_millis() + 1);
    }
}

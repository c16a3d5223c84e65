//! Debouncer: keyed, cancellable scheduled tasks.
//!
//! タイマー頼みの暗黙 debounce ではなく、明示的な「キー付きスケジュール」
//! として表現する。同じキーへの再スケジュールは、待機中のタスクを
//! abort して置き換える（ウィンドウ内の連続編集が 1 回の発火に潰れる）。
//!
//! Design:
//! - A scheduled task sleeps for the window, then removes its own map entry
//!   and runs its work. Supersession only aborts tasks still sleeping;
//!   work that has started is never cancelled.
//! - The work future captures whatever it needs; the coordinator has it
//!   re-read the list so the fired call carries state at fire time, not at
//!   schedule time.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::domain::TodoId;

/// Default debounce window, matching the original 500 ms.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

struct Pending {
    generation: u64,
    /// Taken (not removed) by `flush`, so the generation stays visible to
    /// the task's own wake-up check.
    handle: Option<JoinHandle<()>>,
}

/// Keyed one-shot scheduler. Scheduling for a key replaces any pending
/// (not yet fired) task for that key.
pub struct Debouncer {
    window: Duration,
    next_generation: Mutex<u64>,
    pending: Arc<Mutex<HashMap<TodoId, Pending>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            next_generation: Mutex::new(0),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of keys with a scheduled (or already finished, not yet
    /// flushed) task. Observability only.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().expect("debouncer lock poisoned").len()
    }

    /// Schedule `work` to run once the window elapses. A pending task for
    /// the same key is aborted and replaced; the window restarts.
    pub fn schedule<F>(&self, key: TodoId, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = {
            let mut next = self.next_generation.lock().expect("debouncer lock poisoned");
            *next += 1;
            *next
        };

        let window = self.window;
        let pending = Arc::clone(&self.pending);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;

            // 発火直前に自分のエントリを消す。ここを過ぎたら supersede 不可。
            {
                let mut map = pending.lock().expect("debouncer lock poisoned");
                match map.get(&key) {
                    Some(entry) if entry.generation == generation => {
                        map.remove(&key);
                    }
                    // A newer schedule slipped in between our wake-up and
                    // this lock; it carries the later state, so stand down.
                    _ => return,
                }
            }

            work.await;
        });

        let mut map = self.pending.lock().expect("debouncer lock poisoned");
        if let Some(prev) = map.insert(
            key,
            Pending {
                generation,
                handle: Some(handle),
            },
        ) && let Some(prev_handle) = prev.handle
        {
            prev_handle.abort();
        }
    }

    /// Drop the pending task for `key`, if any. Work that already started
    /// is not affected.
    pub fn cancel(&self, key: TodoId) {
        let mut map = self.pending.lock().expect("debouncer lock poisoned");
        if let Some(prev) = map.remove(&key)
            && let Some(handle) = prev.handle
        {
            handle.abort();
        }
    }

    /// Wait for every pending task to fire and finish (shutdown path).
    /// Entries stay in the map so each task's wake-up check still passes;
    /// the tasks remove their own entries as they fire.
    pub async fn flush(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut map = self.pending.lock().expect("debouncer lock poisoned");
            map.values_mut().filter_map(|p| p.handle.take()).collect()
        };
        for handle in handles {
            // Aborted tasks report a cancellation JoinError; that's expected.
            let _ = handle.await;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_the_window() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = counter();

        let f = Arc::clone(&fired);
        debouncer.schedule(TodoId::new(1), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "window not elapsed yet");

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(debouncer.pending_len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_reschedules_collapse_to_one_firing() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = counter();
        let last = Arc::new(Mutex::new(String::new()));

        for text in ["a", "ab", "abc"] {
            let f = Arc::clone(&fired);
            let l = Arc::clone(&last);
            debouncer.schedule(TodoId::new(1), async move {
                f.fetch_add(1, Ordering::SeqCst);
                *l.lock().unwrap() = text.to_string();
            });
        }

        debouncer.flush().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent_streams() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = counter();

        for id in [1, 2] {
            let f = Arc::clone(&fired);
            debouncer.schedule(TodoId::new(id), async move {
                f.fetch_add(1, Ordering::SeqCst);
            });
        }

        debouncer.flush().await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = counter();

        let f = Arc::clone(&fired);
        debouncer.schedule(TodoId::new(1), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel(TodoId::new(1));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_restarts_the_window() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let fired = counter();

        let f = Arc::clone(&fired);
        debouncer.schedule(TodoId::new(1), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        // 400ms 後に再スケジュール → 元の 500ms 期限では発火しない
        tokio::time::sleep(Duration::from_millis(400)).await;
        let f = Arc::clone(&fired);
        debouncer.schedule(TodoId::new(1), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}

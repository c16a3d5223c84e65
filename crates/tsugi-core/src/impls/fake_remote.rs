//! FakeRemoteApi - 本番と同じ trait 経路に乗る in-memory のリモート二重体
//!
//! HTTP を立てずに Coordinator の同期経路を検証するための実装。
//! サーバー同様に整数 ID を採番し、呼び出しを記録し、到達不能や
//! 単発失敗を注入できる。

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Filter, SyncError, TodoDraft, TodoId, TodoRecord};
use crate::ports::RemoteApi;

/// A recorded call, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    List,
    Create(TodoDraft),
    Update(TodoId, TodoDraft),
    Delete(TodoId),
    Probe,
}

struct FakeState {
    todos: Vec<TodoRecord>,
    next_id: i64,
    reachable: bool,
    fail_next: Option<SyncError>,
    calls: Vec<FakeCall>,
}

pub struct FakeRemoteApi {
    state: Mutex<FakeState>,
}

impl FakeRemoteApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                todos: Vec::new(),
                next_id: 1,
                reachable: true,
                fail_next: None,
                calls: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake remote lock poisoned")
    }

    /// 到達可能性の切り替え（false で transport エラー相当）。
    pub fn set_reachable(&self, reachable: bool) {
        self.lock().reachable = reachable;
    }

    /// 次の list/create/update/delete を 1 回だけ失敗させる。probe は対象外。
    pub fn fail_next(&self, error: SyncError) {
        self.lock().fail_next = Some(error);
    }

    /// サーバー側に直接レコードを作る（採番込み）。
    pub fn seed(&self, todos: &[(&str, bool)]) {
        let mut state = self.lock();
        for (name, completed) in todos {
            let id = TodoId::new(state.next_id);
            state.next_id += 1;
            let mut record = TodoRecord::new(id, name.to_string(), None);
            record.completed = *completed;
            state.todos.push(record);
        }
    }

    /// サーバー側リストのスナップショット。
    pub fn todos(&self) -> Vec<TodoRecord> {
        self.lock().todos.clone()
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    pub fn create_calls(&self) -> Vec<TodoDraft> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FakeCall::Create(draft) => Some(draft.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn update_calls(&self) -> Vec<(TodoId, TodoDraft)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FakeCall::Update(id, draft) => Some((*id, draft.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn delete_calls(&self) -> Vec<TodoId> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FakeCall::Delete(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn gate(state: &mut FakeState) -> Result<(), SyncError> {
        if !state.reachable {
            return Err(SyncError::Network("connection refused".to_string()));
        }
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        Ok(())
    }
}

impl Default for FakeRemoteApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteApi for FakeRemoteApi {
    async fn list(&self, filter: Option<Filter>) -> Result<Vec<TodoRecord>, SyncError> {
        let mut state = self.lock();
        state.calls.push(FakeCall::List);
        Self::gate(&mut state)?;
        Ok(state
            .todos
            .iter()
            .filter(|t| filter.is_none_or(|f| f.matches(t)))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &TodoDraft) -> Result<TodoRecord, SyncError> {
        let mut state = self.lock();
        state.calls.push(FakeCall::Create(draft.clone()));
        Self::gate(&mut state)?;

        let id = TodoId::new(state.next_id);
        state.next_id += 1;
        let mut record = TodoRecord::new(id, draft.name.clone(), None);
        record.completed = draft.completed;
        state.todos.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: TodoId, draft: &TodoDraft) -> Result<TodoRecord, SyncError> {
        let mut state = self.lock();
        state.calls.push(FakeCall::Update(id, draft.clone()));
        Self::gate(&mut state)?;

        let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) else {
            return Err(SyncError::Remote("Todo not found".to_string()));
        };
        todo.name = draft.name.clone();
        todo.completed = draft.completed;
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), SyncError> {
        let mut state = self.lock();
        state.calls.push(FakeCall::Delete(id));
        Self::gate(&mut state)?;

        let Some(pos) = state.todos.iter().position(|t| t.id == id) else {
            return Err(SyncError::Remote("Todo not found".to_string()));
        };
        state.todos.remove(pos);
        Ok(())
    }

    async fn probe(&self) -> Result<(), SyncError> {
        let mut state = self.lock();
        state.calls.push(FakeCall::Probe);
        if state.reachable {
            Ok(())
        } else {
            Err(SyncError::Network("connection refused".to_string()))
        }
    }
}

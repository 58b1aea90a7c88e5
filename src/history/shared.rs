use std::sync::{Arc, Mutex, MutexGuard};

use super::{EntryId, HistoryEntry, HistoryStore, HistoryView, IngestOutcome};
use crate::settings::Preferences;

/// 历史记录的共享句柄
///
/// 轮询任务与用户输入来自不同线程，所有读写都经过同一把锁串行化。
/// 每个方法只在自身执行期间持锁。
#[derive(Debug, Clone)]
pub struct SharedHistory {
    inner: Arc<Mutex<HistoryStore>>,
}

impl SharedHistory {
    pub fn new(preferences: &Preferences) -> Self {
        Self::from_store(HistoryStore::new(preferences))
    }

    pub fn from_store(store: HistoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryStore> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("历史记录锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    pub fn ingest(&self, text: impl Into<String>) -> IngestOutcome {
        self.lock().ingest(text)
    }

    pub fn current_view(&self) -> HistoryView {
        self.lock().current_view()
    }

    pub fn apply_preference_change(&self, new_max: usize) {
        self.lock().apply_preference_change(new_max);
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// 从当前快照中按 id 取出记录的副本，锁在返回前释放
    pub fn entry_by_id(&self, id: EntryId) -> Option<HistoryEntry> {
        self.current_view().find(id).cloned()
    }

    /// 按 1 起始的快捷槽位取出记录的副本
    pub fn entry_at_slot(&self, slot: usize) -> Option<HistoryEntry> {
        self.current_view().fast_access(slot).cloned()
    }
}

use std::ops::Deref;
use std::sync::Arc;

use super::{EntryId, HistoryEntry};
use crate::settings::Preferences;

/// 快捷键可直达的槽位数（⌘1 … ⌘9）
pub const FAST_ACCESS_SLOTS: usize = 9;

/// `ingest` 的处理结果，调用方可以忽略，主要用于日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// 新记录已插入表头
    Added,
    /// 文本为空，被拒绝
    Empty,
    /// 历史中已有相同文本，被拒绝
    Duplicate,
}

/// 历史记录的不可变快照，最近的在前
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    entries: Arc<Vec<HistoryEntry>>,
}

impl HistoryView {
    pub fn find(&self, id: EntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// 按 1 起始的快捷槽位取记录，槽位只有 1..=9
    pub fn fast_access(&self, slot: usize) -> Option<&HistoryEntry> {
        if slot == 0 || slot > FAST_ACCESS_SLOTS {
            return None;
        }
        self.entries.get(slot - 1)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(HistoryEntry::text).collect()
    }
}

impl Deref for HistoryView {
    type Target = [HistoryEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

/// 剪贴板历史状态机
#[derive(Debug)]
pub struct HistoryStore {
    entries: Arc<Vec<HistoryEntry>>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(preferences: &Preferences) -> Self {
        Self::with_capacity(preferences.maximum_history_items)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Vec::new()),
            capacity: sanitize_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 捕获一段新文本
    ///
    /// 空文本或与任意已有记录相同的文本都会被忽略（不会把旧记录提到表头）。
    /// 插入后若超出容量，从尾部淘汰。
    pub fn ingest(&mut self, text: impl Into<String>) -> IngestOutcome {
        let text = text.into();
        if text.is_empty() {
            return IngestOutcome::Empty;
        }
        if self.entries.iter().any(|entry| entry.text == text) {
            log::trace!("历史中已存在相同文本，忽略");
            return IngestOutcome::Duplicate;
        }

        let entry = HistoryEntry::capture(text);
        log::debug!("📥 新增历史记录 {}（{} 字符）", entry.id, entry.text.chars().count());

        let entries = Arc::make_mut(&mut self.entries);
        entries.insert(0, entry);
        self.evict_overflow();
        IngestOutcome::Added
    }

    /// 当前历史的快照，之后的任何写入都不会影响它
    pub fn current_view(&self) -> HistoryView {
        HistoryView {
            entries: Arc::clone(&self.entries),
        }
    }

    /// 应用新的容量上限，超出部分立即从尾部淘汰
    pub fn apply_preference_change(&mut self, new_max: usize) {
        let new_max = sanitize_capacity(new_max);
        if new_max != self.capacity {
            log::debug!("历史容量 {} -> {}", self.capacity, new_max);
        }
        self.capacity = new_max;
        self.evict_overflow();
    }

    fn evict_overflow(&mut self) {
        if self.entries.len() <= self.capacity {
            return;
        }
        let entries = Arc::make_mut(&mut self.entries);
        let evicted = entries.len() - self.capacity;
        entries.truncate(self.capacity);
        log::debug!("🗑️ 淘汰 {} 条最旧记录", evicted);
    }
}

fn sanitize_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        log::warn!("历史容量不能为 0，按 1 处理");
        return 1;
    }
    capacity
}

//! 选择路由模块
//!
//! # 设计思路
//!
//! 用户有两种方式选中历史记录：
//! - **快捷键** ⌘1 … ⌘9：按可见列表中的 1 起始位置选择
//! - **点击**：按记录 id 选择（展示层手里可能是旧快照）
//!
//! 两条路径都落到同一个"恢复"动作：写回剪贴板，然后关闭展示。
//! 无效的位置或 id 静默忽略，不向用户报错。
//!
//! # 实现思路
//!
//! - 先在历史锁内取出记录副本并立即释放锁，再执行剪贴板 I/O。
//! - 写回失败只记录日志，展示保持打开，方便用户重试。

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clipboard::ClipboardWriter;
use crate::history::{EntryId, HistoryEntry, SharedHistory};
use crate::presentation::Presentation;

pub struct SelectionRouter {
    history: SharedHistory,
    writer: Mutex<ClipboardWriter>,
    presentation: Arc<dyn Presentation>,
}

impl SelectionRouter {
    pub fn new(
        history: SharedHistory,
        writer: ClipboardWriter,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        Self {
            history,
            writer: Mutex::new(writer),
            presentation,
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ClipboardWriter> {
        match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("剪贴板写入锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    /// 按快捷槽位选择，`slot` 从 1 开始，最大 9
    ///
    /// 返回被恢复的记录；越界或写回失败时返回 `None`。
    pub fn select_by_index(&self, slot: usize) -> Option<HistoryEntry> {
        let Some(entry) = self.history.entry_at_slot(slot) else {
            log::debug!("快捷槽位 {} 没有对应记录，忽略", slot);
            return None;
        };
        self.restore(entry)
    }

    /// 按记录 id 选择；记录已被淘汰时静默忽略
    pub fn select_by_click(&self, id: EntryId) -> Option<HistoryEntry> {
        let Some(entry) = self.history.entry_by_id(id) else {
            log::debug!("记录 {} 已不在历史中，忽略点击", id);
            return None;
        };
        self.restore(entry)
    }

    fn restore(&self, entry: HistoryEntry) -> Option<HistoryEntry> {
        if let Err(err) = self.lock_writer().write(entry.text()) {
            log::warn!("恢复历史记录 {} 失败: {}", entry.id(), err);
            return None;
        }
        log::info!("📋 已恢复历史记录 {}", entry.id());
        self.presentation.dismiss();
        Some(entry)
    }
}

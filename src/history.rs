//! 剪贴板历史模块
//!
//! # 设计思路
//!
//! 历史记录是整个工具唯一带不变量的状态：
//! - **去重**：任意两条记录的文本都不相同（全表范围，而非仅比较表头）
//! - **有界**：记录数永远不超过当前容量
//! - **有序**：新记录总是插到表头，之后不会再被重排
//!
//! 记录只会因成功捕获而产生，只会因尾部淘汰而消失。
//!
//! # 实现思路
//!
//! - `HistoryStore` 独占并修改记录列表，对外只给出不可变快照 `HistoryView`。
//! - 列表存放在 `Arc<Vec<_>>` 中，写时复制：已经交出去的快照永远不会被后续写入改动。
//! - `SharedHistory` 是单写者守卫，每个操作只在自身期间持锁，
//!   绝不跨越剪贴板 I/O。

mod shared;
mod store;

pub use shared::SharedHistory;
pub use store::{FAST_ACCESS_SLOTS, HistoryStore, HistoryView, IngestOutcome};

use chrono::{DateTime, Local};
use uuid::Uuid;

/// 历史记录的不透明唯一标识，创建时分配，永不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// 一条剪贴板历史记录
///
/// 文本在创建后不可变；两条记录按 `id` 判等。
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    id: EntryId,
    text: String,
    created_at: DateTime<Local>,
}

impl HistoryEntry {
    fn capture(text: String) -> Self {
        Self {
            id: EntryId::fresh(),
            text,
            created_at: Local::now(),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

impl PartialEq for HistoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HistoryEntry {}

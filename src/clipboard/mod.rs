//! 剪贴板管理模块
//!
//! # 设计思路
//!
//! 统一管理与系统剪贴板打交道的两个方向：
//! - **读取**：`ClipboardWatcher` 以固定节奏轮询剪贴板，用变化令牌识别新的复制事件
//! - **写回**：`ClipboardWriter` 把用户选中的历史记录写回剪贴板
//!
//! 写回后没有任何"忽略下一次变化"的标志：下一次轮询会看到变化的令牌，
//! 但文本已经在历史中，去重规则自然把它变成 no-op。
//! 外部程序复制同样文本时的表现完全一致。
//!
//! # 实现思路
//!
//! - `ClipboardSource` / `ClipboardSink` 两个 trait 把平台细节挡在核心之外。
//! - `SystemClipboard` 基于 `arboard` 实现两者；
//!   `MemoryClipboard` 是进程内实现，带真实的代次计数。
//! - 子模块按职责拆分：轮询归 `watcher`，写回归 `writer`。

mod memory;
mod system;
pub mod watcher;
pub mod writer;

pub use memory::MemoryClipboard;
pub use system::SystemClipboard;
pub use watcher::{ClipboardWatcher, PollOutcome, POLL_INTERVAL};
pub use writer::ClipboardWriter;

use crate::error::AppError;

/// 剪贴板"代次"的不透明标记，内容变化时随之变化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeToken(u64);

impl ChangeToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// 一次剪贴板读取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    pub token: ChangeToken,
    /// 文本负载；剪贴板为空或不是文本时为 `None`
    pub text: Option<String>,
}

/// 剪贴板读取端
pub trait ClipboardSource {
    /// 读取当前令牌与文本负载
    ///
    /// 返回 `Err` 表示本轮暂时不可读，调用方按"无变化"处理。
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, AppError>;
}

/// 剪贴板写入端
pub trait ClipboardSink {
    /// 清空剪贴板并写入文本
    fn replace_text(&mut self, text: &str) -> Result<(), AppError>;
}

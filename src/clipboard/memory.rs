use std::sync::{Arc, Mutex, MutexGuard};

use super::{ChangeToken, ClipboardSink, ClipboardSnapshot, ClipboardSource};
use crate::error::AppError;

#[derive(Debug, Default)]
struct MemoryState {
    generation: u64,
    text: Option<String>,
    failing_reads: u32,
}

/// 进程内剪贴板
///
/// 每次写入都推进代次计数，行为与带变化计数的系统剪贴板一致。
/// 克隆出的句柄共享同一份内容，可以同时交给轮询端和写回端。
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// 模拟其它程序复制了一段文本
    pub fn copy_text(&self, text: impl Into<String>) {
        let mut state = self.lock();
        state.generation += 1;
        state.text = Some(text.into());
    }

    /// 模拟其它程序复制了非文本内容（图片、文件等）
    pub fn copy_non_text(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.text = None;
    }

    /// 让接下来的 `count` 次读取失败
    pub fn fail_next_reads(&self, count: u32) {
        self.lock().failing_reads = count;
    }

    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}

impl ClipboardSource for MemoryClipboard {
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, AppError> {
        let mut state = self.lock();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(AppError::Clipboard("剪贴板暂时不可用".to_string()));
        }
        Ok(ClipboardSnapshot {
            token: ChangeToken::new(state.generation),
            text: state.text.clone(),
        })
    }
}

impl ClipboardSink for MemoryClipboard {
    fn replace_text(&mut self, text: &str) -> Result<(), AppError> {
        self.copy_text(text);
        Ok(())
    }
}

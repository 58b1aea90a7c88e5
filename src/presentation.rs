//! 展示协作者
//!
//! 核心只依赖 `Presentation` trait：展示层拿到的永远是不可变快照，
//! 点击后回调 `SelectionRouter::select_by_click`。
//! `ConsolePresentation` 把列表打印到标准输出，供无界面运行时使用。

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::history::{FAST_ACCESS_SLOTS, HistoryEntry, HistoryView};
use crate::settings::Preferences;

const TRUNCATION_MARK: &str = "…";
const TIMESTAMP_FORMAT: &str = "%y/%m/%d %H:%M";

pub trait Presentation: Send + Sync {
    fn show(&self, view: &HistoryView, preferences: &Preferences);
    fn dismiss(&self);
    fn is_active(&self) -> bool;
}

/// 按行数上限截取条目文本，被截断时在最后一行追加省略号
pub fn preview_lines(text: &str, line_limit: usize) -> Vec<String> {
    let limit = line_limit.max(1);
    let mut lines: Vec<String> = text.lines().take(limit).map(str::to_string).collect();
    let truncated = text.lines().nth(limit).is_some();
    if truncated {
        if let Some(last) = lines.last_mut() {
            last.push_str(TRUNCATION_MARK);
        }
    }
    lines
}

fn slot_label(index: usize) -> String {
    if index < FAST_ACCESS_SLOTS {
        format!("⌘{}", index + 1)
    } else {
        String::new()
    }
}

fn render_entry(out: &mut String, index: usize, entry: &HistoryEntry, line_limit: usize) {
    let label = slot_label(index);
    for (line_no, line) in preview_lines(entry.text(), line_limit).iter().enumerate() {
        let prefix = if line_no == 0 { label.as_str() } else { "" };
        let _ = writeln!(out, "{prefix:>4}  {line}");
    }
    let _ = writeln!(out, "{:>4}  {}", "", entry.created_at().format(TIMESTAMP_FORMAT));
}

/// 把快照渲染成纯文本列表
pub fn render_view(view: &HistoryView, preferences: &Preferences) -> String {
    let mut out = String::from("剪贴板历史\n");
    if view.is_empty() {
        out.push_str("暂无剪贴板历史\n");
        return out;
    }
    for (index, entry) in view.iter().enumerate() {
        render_entry(&mut out, index, entry, preferences.item_line_limit);
    }
    out
}

/// 打印到标准输出的展示层
#[derive(Debug, Default)]
pub struct ConsolePresentation {
    active: AtomicBool,
}

impl ConsolePresentation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presentation for ConsolePresentation {
    fn show(&self, view: &HistoryView, preferences: &Preferences) {
        let rendered = render_view(view, preferences);
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = stdout.write_all(rendered.as_bytes()).and_then(|_| stdout.flush()) {
            log::warn!("输出剪贴板历史失败: {}", err);
        }
        self.active.store(true, Ordering::SeqCst);
    }

    fn dismiss(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            log::debug!("展示已关闭");
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

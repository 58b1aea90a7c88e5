use super::ClipboardSink;
use crate::error::AppError;

/// 把历史记录写回系统剪贴板
///
/// 写入会推进剪贴板自身的令牌。这里不设置任何抑制标志，
/// 下一次轮询依靠历史的去重规则把它当作 no-op。
pub struct ClipboardWriter {
    sink: Box<dyn ClipboardSink + Send>,
}

impl ClipboardWriter {
    pub fn new(sink: impl ClipboardSink + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn write(&mut self, text: &str) -> Result<(), AppError> {
        self.sink.replace_text(text)?;
        log::debug!("📤 已写回剪贴板（{} 字符）", text.chars().count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    #[test]
    fn write_replaces_text_and_advances_generation() {
        let clipboard = MemoryClipboard::new();
        clipboard.copy_text("old");
        let before = clipboard.generation();

        let mut writer = ClipboardWriter::new(clipboard.clone());
        writer.write("new").expect("write");

        assert_eq!(clipboard.text().as_deref(), Some("new"));
        assert!(clipboard.generation() > before);
    }
}

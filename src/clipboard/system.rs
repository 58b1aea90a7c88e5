use arboard::Clipboard;

use super::{ChangeToken, ClipboardSink, ClipboardSnapshot, ClipboardSource};
use crate::error::AppError;

/// 基于 `arboard` 的系统剪贴板
///
/// Windows 上令牌取系统的剪贴板序列号，macOS 上取 `NSPasteboard.changeCount`；
/// X11 / Wayland 没有可用的代次计数，令牌取文本内容的指纹，
/// 非文本内容共用一个固定令牌。
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, AppError> {
        let clipboard = Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
        Ok(Self { clipboard })
    }

    fn read_text(&mut self) -> Result<Option<String>, AppError> {
        match self.clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(err) => Err(AppError::Clipboard(err.to_string())),
        }
    }
}

#[cfg(target_os = "windows")]
fn platform_generation() -> Option<ChangeToken> {
    use windows::Win32::System::DataExchange::GetClipboardSequenceNumber;

    // SAFETY: 无参数的 Win32 查询，不涉及任何指针
    let sequence = unsafe { GetClipboardSequenceNumber() };
    Some(ChangeToken::new(u64::from(sequence)))
}

#[cfg(target_os = "macos")]
#[allow(deprecated)]
fn platform_generation() -> Option<ChangeToken> {
    use cocoa::base::{id, nil};
    use cocoa::foundation::NSUInteger;
    use objc::{class, msg_send, sel, sel_impl};

    // SAFETY: generalPasteboard 返回共享单例，这里只读取计数，不持有引用
    unsafe {
        let pasteboard: id = msg_send![class!(NSPasteboard), generalPasteboard];
        if pasteboard == nil {
            return None;
        }
        let count: NSUInteger = msg_send![pasteboard, changeCount];
        Some(ChangeToken::new(count as u64))
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_generation() -> Option<ChangeToken> {
    None
}

fn fingerprint(text: Option<&str>) -> ChangeToken {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    match text {
        Some(text) => {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            ChangeToken::new(hasher.finish())
        }
        None => ChangeToken::new(0),
    }
}

/// 组合出一次快照
///
/// 先读代次再读文本。两次读取之间的复制只会让下一轮多看到一次变化，
/// 顺序颠倒则会把新代次记在旧文本上，新内容永远不会被捕获。
fn take_snapshot(
    generation: impl FnOnce() -> Option<ChangeToken>,
    read_text: impl FnOnce() -> Result<Option<String>, AppError>,
) -> Result<ClipboardSnapshot, AppError> {
    let generation = generation();
    let text = read_text()?;
    let token = generation.unwrap_or_else(|| fingerprint(text.as_deref()));
    Ok(ClipboardSnapshot { token, text })
}

impl ClipboardSource for SystemClipboard {
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, AppError> {
        take_snapshot(platform_generation, || self.read_text())
    }
}

impl ClipboardSink for SystemClipboard {
    fn replace_text(&mut self, text: &str) -> Result<(), AppError> {
        self.clipboard
            .clear()
            .map_err(|e| AppError::Clipboard(format!("清空剪贴板失败: {}", e)))?;
        self.clipboard
            .set_text(text)
            .map_err(|e| AppError::Clipboard(format!("写入剪贴板失败: {}", e)))?;
        Ok(())
    }
}

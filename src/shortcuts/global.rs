use std::collections::HashMap;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use super::{Modifier, ShortcutHandler, ShortcutKey, ShortcutRegistrar, ShortcutSpec};
use crate::error::AppError;

/// `global-hotkey` 使用的加速键写法，如 `control+KeyV`、`super+Digit1`
fn accelerator(spec: &ShortcutSpec) -> String {
    let mut parts: Vec<String> = spec
        .modifiers()
        .iter()
        .map(|modifier| {
            let name = match modifier {
                Modifier::Control => "control",
                Modifier::Alt => "alt",
                Modifier::Shift => "shift",
                Modifier::Command => "super",
            };
            name.to_string()
        })
        .collect();
    parts.push(match spec.key() {
        ShortcutKey::Letter(ch) => format!("Key{ch}"),
        ShortcutKey::Digit(d) => format!("Digit{d}"),
    });
    parts.join("+")
}

fn to_hotkey(spec: &ShortcutSpec) -> Result<HotKey, AppError> {
    accelerator(spec)
        .parse::<HotKey>()
        .map_err(|e| AppError::Shortcut(format!("转换快捷键 {} 失败: {}", spec, e)))
}

/// 基于 `global-hotkey` 的全局快捷键实现
///
/// 必须在运行平台事件循环的线程上创建：Windows 的热键消息投递到创建线程的
/// 消息队列，macOS 的 Carbon 事件只在主线程的 run loop 上派发。
/// 事件由宿主转交给 `dispatch`，回调因此也在事件循环线程上执行。
pub struct GlobalHotkeyRegistrar {
    manager: GlobalHotKeyManager,
    handlers: HashMap<u32, ShortcutHandler>,
    registered: HashMap<ShortcutSpec, HotKey>,
}

impl GlobalHotkeyRegistrar {
    pub fn new() -> Result<Self, AppError> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| AppError::Shortcut(format!("创建全局快捷键管理器失败: {}", e)))?;

        Ok(Self {
            manager,
            handlers: HashMap::new(),
            registered: HashMap::new(),
        })
    }

    /// 执行事件对应的回调；松开事件与未绑定的 id 忽略
    ///
    /// 返回是否执行了回调。
    pub fn dispatch(&self, event: &GlobalHotKeyEvent) -> bool {
        if matches!(event.state, HotKeyState::Released) {
            return false;
        }
        match self.handlers.get(&event.id) {
            Some(handler) => {
                handler();
                true
            }
            None => {
                log::trace!("收到未绑定的快捷键事件 id={}", event.id);
                false
            }
        }
    }
}

impl ShortcutRegistrar for GlobalHotkeyRegistrar {
    fn register_shortcut(&mut self, spec: &ShortcutSpec, handler: ShortcutHandler) -> Result<(), AppError> {
        let hotkey = to_hotkey(spec)?;
        self.manager
            .register(hotkey)
            .map_err(|e| AppError::Shortcut(format!("注册快捷键 {} 失败: {}", spec, e)))?;

        self.handlers.insert(hotkey.id(), handler);
        self.registered.insert(spec.clone(), hotkey);
        log::debug!("⌨️ 已注册快捷键 {}", spec);
        Ok(())
    }

    fn unregister_shortcut(&mut self, spec: &ShortcutSpec) -> Result<(), AppError> {
        let Some(hotkey) = self.registered.remove(spec) else {
            return Err(AppError::Shortcut(format!("快捷键 {} 未注册", spec)));
        };
        self.handlers.remove(&hotkey.id());
        self.manager
            .unregister(hotkey)
            .map_err(|e| AppError::Shortcut(format!("注销快捷键 {} 失败: {}", spec, e)))?;
        log::debug!("⌨️ 已注销快捷键 {}", spec);
        Ok(())
    }
}

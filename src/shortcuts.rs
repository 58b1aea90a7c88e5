//! 全局快捷键模块（能力接口）
//!
//! # 设计思路
//!
//! 全局快捷键的捕获依赖平台的输入钩子，核心只看到一个能力接口
//! `ShortcutRegistrar { register_shortcut, unregister_shortcut }`。
//!
//! 默认绑定：
//! - 恢复快捷键（macOS `Control+V`，其它平台 `Control+Shift+V`）：显示 / 关闭剪贴板历史
//! - `Command+1` … `Command+9`：只在展示层打开期间注册，按槽位恢复
//!
//! # 实现思路
//!
//! - `ShortcutSpec` 用文本表示（如 `Control+V`），解析与显示对称。
//! - `global` 子模块基于 `global-hotkey` 实现能力接口。

pub mod global;

pub use global::GlobalHotkeyRegistrar;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::app::ClipboardApp;
use crate::error::AppError;
use crate::history::FAST_ACCESS_SLOTS;

/// 显示 / 关闭剪贴板历史的快捷键
///
/// macOS 的粘贴是 ⌘V，`Control+V` 空闲；其它平台 `Control+V` 就是粘贴，
/// 改用 `Control+Shift+V`，避免抢走所有程序的粘贴。
#[cfg(target_os = "macos")]
pub const RESTORE_TRIGGER: &str = "Control+V";
#[cfg(not(target_os = "macos"))]
pub const RESTORE_TRIGGER: &str = "Control+Shift+V";

/// 快捷键回调，在宿主的事件循环线程上执行
pub type ShortcutHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Control,
    Alt,
    Shift,
    Command,
}

impl Modifier {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "control" | "ctrl" => Some(Self::Control),
            "alt" | "option" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "command" | "cmd" | "super" | "meta" => Some(Self::Command),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Control => "Control",
            Self::Alt => "Alt",
            Self::Shift => "Shift",
            Self::Command => "Command",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutKey {
    /// 大写 ASCII 字母
    Letter(char),
    /// 0..=9
    Digit(u8),
}

impl ShortcutKey {
    fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return None;
        };
        if ch.is_ascii_alphabetic() {
            Some(Self::Letter(ch.to_ascii_uppercase()))
        } else {
            ch.to_digit(10).map(|d| Self::Digit(d as u8))
        }
    }
}

impl fmt::Display for ShortcutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(ch) => write!(f, "{ch}"),
            Self::Digit(d) => write!(f, "{d}"),
        }
    }
}

/// 一个快捷键组合：修饰键集合 + 主键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortcutSpec {
    modifiers: Vec<Modifier>,
    key: ShortcutKey,
}

impl ShortcutSpec {
    pub fn new(modifiers: &[Modifier], key: ShortcutKey) -> Self {
        let mut modifiers = modifiers.to_vec();
        modifiers.sort_unstable();
        modifiers.dedup();
        Self { modifiers, key }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn key(&self) -> ShortcutKey {
        self.key
    }

    /// ⌘ + 数字，对应快捷槽位
    pub fn slot(slot: u8) -> Self {
        Self::new(&[Modifier::Command], ShortcutKey::Digit(slot))
    }
}

impl fmt::Display for ShortcutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.name())?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for ShortcutSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let Some((key, modifiers)) = parts.split_last() else {
            return Err(AppError::Shortcut(format!("空的快捷键: '{}'", s)));
        };

        let key = ShortcutKey::parse(key)
            .ok_or_else(|| AppError::Shortcut(format!("无法识别的按键 '{}'（来自 '{}'）", key, s)))?;
        let modifiers = modifiers
            .iter()
            .map(|name| {
                Modifier::parse(name).ok_or_else(|| {
                    AppError::Shortcut(format!("无法识别的修饰键 '{}'（来自 '{}'）", name, s))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(&modifiers, key))
    }
}

/// 宿主提供的全局快捷键能力
pub trait ShortcutRegistrar {
    fn register_shortcut(&mut self, spec: &ShortcutSpec, handler: ShortcutHandler) -> Result<(), AppError>;
    fn unregister_shortcut(&mut self, spec: &ShortcutSpec) -> Result<(), AppError>;
}

/// 默认快捷键绑定
///
/// 恢复快捷键常驻；槽位快捷键只在展示层打开期间注册，
/// 关闭后立即注销，不占用系统或其它程序的 ⌘1…⌘9。
/// 宿主每分发完一次快捷键事件调用 `sync_slots`，让注册状态跟上展示层。
pub struct ShortcutBindings {
    app: Arc<ClipboardApp>,
    trigger: ShortcutSpec,
    slots: Vec<ShortcutSpec>,
}

impl ShortcutBindings {
    /// 注册恢复快捷键
    pub fn bind(registrar: &mut dyn ShortcutRegistrar, app: &Arc<ClipboardApp>) -> Result<Self, AppError> {
        let trigger: ShortcutSpec = RESTORE_TRIGGER.parse()?;
        let toggle_app = Arc::clone(app);
        registrar.register_shortcut(&trigger, Arc::new(move || toggle_app.toggle_presentation()))?;
        log::info!("⌨️ 已注册全局快捷键 {}（显示 / 关闭历史）", trigger);

        Ok(Self {
            app: Arc::clone(app),
            trigger,
            slots: Vec::with_capacity(FAST_ACCESS_SLOTS),
        })
    }

    pub fn trigger(&self) -> &ShortcutSpec {
        &self.trigger
    }

    pub fn slots_bound(&self) -> bool {
        !self.slots.is_empty()
    }

    /// 按展示层当前状态注册或注销槽位快捷键
    pub fn sync_slots(&mut self, registrar: &mut dyn ShortcutRegistrar) {
        let active = self.app.presentation().is_active();
        if active && self.slots.is_empty() {
            self.bind_slots(registrar);
        } else if !active && !self.slots.is_empty() {
            self.unbind_slots(registrar);
        }
    }

    fn bind_slots(&mut self, registrar: &mut dyn ShortcutRegistrar) {
        for slot in 1..=FAST_ACCESS_SLOTS as u8 {
            let spec = ShortcutSpec::slot(slot);
            let slot_app = Arc::clone(&self.app);
            let handler: ShortcutHandler = Arc::new(move || {
                if !slot_app.presentation().is_active() {
                    log::trace!("展示层未打开，忽略槽位快捷键 {}", slot);
                    return;
                }
                slot_app.router().select_by_index(usize::from(slot));
            });
            match registrar.register_shortcut(&spec, handler) {
                Ok(()) => self.slots.push(spec),
                Err(err) => log::warn!("注册槽位快捷键 {} 失败: {}", spec, err),
            }
        }
        log::debug!("⌨️ 已注册 {} 个槽位快捷键", self.slots.len());
    }

    fn unbind_slots(&mut self, registrar: &mut dyn ShortcutRegistrar) {
        for spec in self.slots.drain(..) {
            if let Err(err) = registrar.unregister_shortcut(&spec) {
                log::warn!("注销快捷键 {} 失败: {}", spec, err);
            }
        }
        log::debug!("⌨️ 槽位快捷键已注销");
    }

    /// 退出前注销全部快捷键，失败只记录日志
    pub fn unbind(mut self, registrar: &mut dyn ShortcutRegistrar) {
        self.unbind_slots(registrar);
        if let Err(err) = registrar.unregister_shortcut(&self.trigger) {
            log::warn!("注销快捷键 {} 失败: {}", self.trigger, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::clipboard::{ClipboardWriter, MemoryClipboard};
    use crate::presentation::ConsolePresentation;
    use crate::settings::{PreferenceStore, Preferences};

    #[derive(Default)]
    struct FakeRegistrar {
        handlers: HashMap<ShortcutSpec, ShortcutHandler>,
    }

    impl FakeRegistrar {
        fn fire(&self, spec: &str) {
            let spec: ShortcutSpec = spec.parse().expect("spec");
            let handler = self.handlers.get(&spec).expect("registered");
            handler();
        }
    }

    impl ShortcutRegistrar for FakeRegistrar {
        fn register_shortcut(&mut self, spec: &ShortcutSpec, handler: ShortcutHandler) -> Result<(), AppError> {
            if self.handlers.contains_key(spec) {
                return Err(AppError::Shortcut(format!("{spec} already registered")));
            }
            self.handlers.insert(spec.clone(), handler);
            Ok(())
        }

        fn unregister_shortcut(&mut self, spec: &ShortcutSpec) -> Result<(), AppError> {
            self.handlers
                .remove(spec)
                .map(|_| ())
                .ok_or_else(|| AppError::Shortcut(format!("{spec} not registered")))
        }
    }

    struct DefaultsStore;

    impl PreferenceStore for DefaultsStore {
        fn load(&self) -> Preferences {
            Preferences::default()
        }

        fn save(&self, _preferences: &Preferences) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[test]
    fn spec_parses_and_displays_symmetrically() {
        let spec: ShortcutSpec = "ctrl + v".parse().expect("parse");
        assert_eq!(spec, ShortcutSpec::new(&[Modifier::Control], ShortcutKey::Letter('V')));
        assert_eq!(spec.to_string(), "Control+V");

        let spec: ShortcutSpec = "Shift+Command+Shift+3".parse().expect("parse");
        assert_eq!(spec.to_string(), "Shift+Command+3");
        assert_eq!(spec, ShortcutSpec::new(&[Modifier::Command, Modifier::Shift], ShortcutKey::Digit(3)));
    }

    #[test]
    fn spec_rejects_unknown_parts() {
        assert!(matches!("Hyper+V".parse::<ShortcutSpec>(), Err(AppError::Shortcut(_))));
        assert!(matches!("Control+F12".parse::<ShortcutSpec>(), Err(AppError::Shortcut(_))));
        assert!(matches!("".parse::<ShortcutSpec>(), Err(AppError::Shortcut(_))));
    }

    fn app_with_history(clipboard: &MemoryClipboard) -> Arc<ClipboardApp> {
        let app = Arc::new(ClipboardApp::new(
            DefaultsStore,
            ClipboardWriter::new(clipboard.clone()),
            Arc::new(ConsolePresentation::new()),
        ));
        for text in ["Z", "Y", "X"] {
            app.history().ingest(text);
        }
        app
    }

    fn slot_specs() -> Vec<ShortcutSpec> {
        (1..=FAST_ACCESS_SLOTS as u8).map(ShortcutSpec::slot).collect()
    }

    #[test]
    fn trigger_is_not_the_paste_chord() {
        let trigger: ShortcutSpec = RESTORE_TRIGGER.parse().expect("trigger");
        if cfg!(target_os = "macos") {
            assert_eq!(trigger.to_string(), "Control+V");
        } else {
            assert_eq!(trigger.to_string(), "Control+Shift+V");
        }
    }

    #[test]
    fn digits_are_registered_only_while_presentation_is_active() {
        let clipboard = MemoryClipboard::new();
        let app = app_with_history(&clipboard);
        let mut registrar = FakeRegistrar::default();
        let mut bindings = ShortcutBindings::bind(&mut registrar, &app).expect("bind");
        bindings.sync_slots(&mut registrar);

        assert_eq!(registrar.handlers.len(), 1);
        assert!(slot_specs().iter().all(|spec| !registrar.handlers.contains_key(spec)));

        registrar.fire(RESTORE_TRIGGER);
        bindings.sync_slots(&mut registrar);
        assert!(app.presentation().is_active());
        assert!(bindings.slots_bound());
        assert!(slot_specs().iter().all(|spec| registrar.handlers.contains_key(spec)));

        registrar.fire("Command+2");
        bindings.sync_slots(&mut registrar);
        assert_eq!(clipboard.text().as_deref(), Some("Y"));
        assert!(!app.presentation().is_active());
        assert!(!bindings.slots_bound());
        assert!(slot_specs().iter().all(|spec| !registrar.handlers.contains_key(spec)));

        bindings.unbind(&mut registrar);
        assert!(registrar.handlers.is_empty());
    }

    #[test]
    fn second_trigger_press_dismisses_and_releases_digits() {
        let clipboard = MemoryClipboard::new();
        let app = app_with_history(&clipboard);
        let mut registrar = FakeRegistrar::default();
        let mut bindings = ShortcutBindings::bind(&mut registrar, &app).expect("bind");

        registrar.fire(RESTORE_TRIGGER);
        bindings.sync_slots(&mut registrar);
        assert_eq!(registrar.handlers.len(), FAST_ACCESS_SLOTS + 1);

        registrar.fire(RESTORE_TRIGGER);
        bindings.sync_slots(&mut registrar);
        assert!(!app.presentation().is_active());
        assert_eq!(registrar.handlers.len(), 1);
        assert!(clipboard.text().is_none());
    }

    #[test]
    fn sync_is_idempotent() {
        let clipboard = MemoryClipboard::new();
        let app = app_with_history(&clipboard);
        let mut registrar = FakeRegistrar::default();
        let mut bindings = ShortcutBindings::bind(&mut registrar, &app).expect("bind");

        app.show_presentation();
        bindings.sync_slots(&mut registrar);
        bindings.sync_slots(&mut registrar);
        assert_eq!(registrar.handlers.len(), FAST_ACCESS_SLOTS + 1);
    }
}

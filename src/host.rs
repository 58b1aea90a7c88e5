//! 平台事件循环宿主
//!
//! # 设计思路
//!
//! 全局快捷键只有在平台事件循环运转时才会被派发：
//! Windows 需要创建热键管理器的线程上有消息循环，macOS 需要主线程的 run loop。
//! 因此主线程交给 `winit` 的事件循环，剪贴板轮询放到后台的 tokio 运行时。
//!
//! # 实现思路
//!
//! - 热键管理器在事件循环线程上创建，事件经 `EventLoopProxy` 转成
//!   `HostEvent::Hotkey` 送回同一线程，回调与注册表都不跨线程。
//! - 每分发完一次事件，`ShortcutBindings::sync_slots` 让槽位快捷键的
//!   注册状态跟上展示层。
//! - 轮询结束时通过 `ShutdownHandle` 发送 `HostEvent::Shutdown`，
//!   事件循环退出前注销全部快捷键。

use std::sync::{Arc, Mutex};

use global_hotkey::GlobalHotKeyEvent;
use winit::event::Event;
use winit::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};

use crate::app::ClipboardApp;
use crate::error::AppError;
use crate::shortcuts::{GlobalHotkeyRegistrar, ShortcutBindings};

/// 投递到事件循环的自定义事件
#[derive(Debug, Clone)]
pub enum HostEvent {
    Hotkey(GlobalHotKeyEvent),
    Shutdown,
}

/// 从其它线程请求事件循环退出
#[derive(Clone)]
pub struct ShutdownHandle(EventLoopProxy<HostEvent>);

impl ShutdownHandle {
    pub fn request(&self) {
        if self.0.send_event(HostEvent::Shutdown).is_err() {
            log::debug!("事件循环已退出，忽略退出请求");
        }
    }
}

struct Hotkeys {
    registrar: GlobalHotkeyRegistrar,
    bindings: ShortcutBindings,
}

impl Hotkeys {
    /// 创建热键管理器并注册恢复快捷键，失败时返回 `None`，只记录历史
    fn install(app: &Arc<ClipboardApp>, proxy: EventLoopProxy<HostEvent>) -> Option<Self> {
        let mut registrar = match GlobalHotkeyRegistrar::new() {
            Ok(registrar) => registrar,
            Err(err) => {
                log::warn!("setup: 全局快捷键不可用，仅记录历史: {err}");
                return None;
            }
        };
        let bindings = match ShortcutBindings::bind(&mut registrar, app) {
            Ok(bindings) => bindings,
            Err(err) => {
                log::warn!("setup: 注册恢复快捷键失败，仅记录历史: {err}");
                return None;
            }
        };

        let proxy = Mutex::new(proxy);
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            let proxy = match proxy.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if proxy.send_event(HostEvent::Hotkey(event)).is_err() {
                log::trace!("事件循环已退出，丢弃快捷键事件");
            }
        }));

        Some(Self { registrar, bindings })
    }

    fn handle(&mut self, event: &GlobalHotKeyEvent) {
        if self.registrar.dispatch(event) {
            self.bindings.sync_slots(&mut self.registrar);
        }
    }

    fn release(mut self) {
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
        self.bindings.unbind(&mut self.registrar);
        log::info!("⌨️ 全局快捷键已注销");
    }
}

/// 持有主线程事件循环
pub struct Host {
    event_loop: EventLoop<HostEvent>,
}

impl Host {
    /// 必须在主线程调用
    pub fn new() -> Result<Self, AppError> {
        let event_loop = EventLoopBuilder::<HostEvent>::with_user_event()
            .build()
            .map_err(|e| AppError::EventLoop(format!("创建事件循环失败: {}", e)))?;
        Ok(Self { event_loop })
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.event_loop.create_proxy())
    }

    /// 运行事件循环，直到收到 `HostEvent::Shutdown`
    pub fn run(self, app: &Arc<ClipboardApp>) -> Result<(), AppError> {
        let mut hotkeys = Hotkeys::install(app, self.event_loop.create_proxy());

        log::info!("🖥️ 事件循环已启动");
        self.event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Wait);

                match event {
                    Event::UserEvent(HostEvent::Hotkey(hotkey_event)) => {
                        if let Some(hotkeys) = hotkeys.as_mut() {
                            hotkeys.handle(&hotkey_event);
                        }
                    }
                    Event::UserEvent(HostEvent::Shutdown) => {
                        log::info!("🖥️ 收到退出请求");
                        target.exit();
                    }
                    Event::LoopExiting => {
                        if let Some(hotkeys) = hotkeys.take() {
                            hotkeys.release();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| AppError::EventLoop(format!("事件循环异常退出: {}", e)))
    }
}

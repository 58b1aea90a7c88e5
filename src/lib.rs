//! # 剪贴板历史工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │   展示层 (Presentation)        全局快捷键 (ShortcutRegistrar) │
//! │        ↑ 快照      │ 点击              │ 恢复快捷键 / ⌘1…⌘9 │
//! └────────┼───────────┼───────────────────┼─────────────────┘
//!          │           ↓                   ↓
//! ┌────────┼──────────────────────────────────────────────────┐
//! │  app ── ClipboardApp (偏好 RwLock + 保存入口)               │
//! │   ├─ history ─── SharedHistory → HistoryStore (去重·有界·有序) │
//! │   ├─ selection ─ SelectionRouter (槽位 / id → 恢复)         │
//! │   └─ clipboard                                              │
//! │       ├─ watcher  500ms 轮询 + 变化令牌 → ingest             │
//! │       └─ writer   写回剪贴板（依靠去重，不设忽略标志）         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`settings`] | 偏好值、区间收敛、JSON 持久化 |
//! | [`history`] | 历史状态机与不可变快照 |
//! | [`clipboard`] | 系统剪贴板读写、轮询器、写回器 |
//! | [`selection`] | 快捷槽位与点击到恢复动作的路由 |
//! | [`presentation`] | 展示协作者接口与控制台实现 |
//! | [`shortcuts`] | 全局快捷键能力接口与默认绑定 |
//! | [`app`] | 组合根：显示 / 关闭历史、保存偏好 |
//! | [`host`] | 主线程平台事件循环，派发全局快捷键 |

pub mod error;
pub mod settings;
pub mod history;
pub mod clipboard;
pub mod selection;
pub mod presentation;
pub mod shortcuts;
pub mod app;
pub mod host;

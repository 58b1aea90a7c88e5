//! 应用组合根
//!
//! # 设计思路
//!
//! `ClipboardApp` 持有共享历史、当前偏好、偏好持久化协作者、选择路由与展示层，
//! 并承载两个用户动作：
//! - **显示 / 关闭展示层**：由恢复快捷键切换，显示时交给展示层一份快照
//! - **保存偏好**：唯一允许修改偏好的入口
//!
//! # 实现思路
//!
//! - 偏好放在 `RwLock` 里，只在保存时整体替换，其余时间只读共享。
//! - 保存顺序：收敛 → 持久化 → 应用到历史 → 替换内存值。
//!   持久化失败时内存中的任何东西都不变。

use std::sync::{Arc, RwLock};

use crate::clipboard::ClipboardWriter;
use crate::error::AppError;
use crate::history::SharedHistory;
use crate::presentation::Presentation;
use crate::selection::SelectionRouter;
use crate::settings::{PreferenceStore, Preferences};

pub struct ClipboardApp {
    history: SharedHistory,
    preferences: RwLock<Preferences>,
    preference_store: Box<dyn PreferenceStore>,
    router: SelectionRouter,
    presentation: Arc<dyn Presentation>,
}

impl ClipboardApp {
    /// 加载偏好并按偏好创建历史记录
    pub fn new(
        preference_store: impl PreferenceStore + 'static,
        writer: ClipboardWriter,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        let preferences = preference_store.load().normalized();
        log::info!(
            "⚙️ 偏好已加载：历史上限 {}，显示行数 {}",
            preferences.maximum_history_items,
            preferences.item_line_limit
        );

        let history = SharedHistory::new(&preferences);
        let router = SelectionRouter::new(history.clone(), writer, Arc::clone(&presentation));

        Self {
            history,
            preferences: RwLock::new(preferences),
            preference_store: Box::new(preference_store),
            router,
            presentation,
        }
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    pub fn router(&self) -> &SelectionRouter {
        &self.router
    }

    pub fn presentation(&self) -> &Arc<dyn Presentation> {
        &self.presentation
    }

    pub fn preferences(&self) -> Preferences {
        match self.preferences.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// 把当前快照交给展示层
    pub fn show_presentation(&self) {
        let view = self.history.current_view();
        let preferences = self.preferences();
        log::debug!("显示剪贴板历史（{} 条）", view.len());
        self.presentation.show(&view, &preferences);
    }

    pub fn dismiss_presentation(&self) {
        self.presentation.dismiss();
    }

    /// 恢复快捷键的动作：未打开时显示，已打开时关闭
    pub fn toggle_presentation(&self) {
        if self.presentation.is_active() {
            self.dismiss_presentation();
        } else {
            self.show_presentation();
        }
    }

    /// 保存新的偏好，返回实际生效（收敛后）的值
    pub fn save_preferences(&self, requested: Preferences) -> Result<Preferences, AppError> {
        let preferences = requested.normalized();
        if preferences != requested {
            log::warn!("偏好数值越界，已收敛为: {:?}", preferences);
        }

        self.preference_store.save(&preferences)?;
        self.history.apply_preference_change(preferences.maximum_history_items);

        let mut current = match self.preferences.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("偏好锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        };
        *current = preferences;
        Ok(preferences)
    }
}

//! 用户偏好设置模块
//!
//! # 设计思路
//!
//! 偏好只有两个有界整数：历史记录上限与列表条目的显示行数上限。
//! 它们在启动时加载一次，之后只能通过显式的"保存"动作整体替换，
//! 不存在多处原地修改。
//!
//! # 实现思路
//!
//! - `Preferences` 是普通的 `Copy` 结构体，作为显式配置传入历史记录。
//! - 所有越界值在边界处（加载、保存）被 `clamp` 到合法区间，
//!   保证容量永远不会是 0 或负数。
//! - 持久化抽象为 `PreferenceStore`，默认实现把 JSON 写到平台配置目录。
//! - 设置文件缺失或损坏时回退默认值，仅记录日志，不阻止启动。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const MAXIMUM_HISTORY_ITEMS_DEFAULT: usize = 20;
pub const MAXIMUM_HISTORY_ITEMS_MIN: usize = 5;
pub const MAXIMUM_HISTORY_ITEMS_MAX: usize = 100;

pub const ITEM_LINE_LIMIT_DEFAULT: usize = 10;
pub const ITEM_LINE_LIMIT_MIN: usize = 1;
pub const ITEM_LINE_LIMIT_MAX: usize = 20;

const SETTINGS_DIR_NAME: &str = "utklippstavle";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// 用户偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// 历史记录最多保留的条目数，合法区间 [5, 100]
    pub maximum_history_items: usize,
    /// 每个条目在列表中最多显示的行数，合法区间 [1, 20]，仅影响展示
    pub item_line_limit: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            maximum_history_items: MAXIMUM_HISTORY_ITEMS_DEFAULT,
            item_line_limit: ITEM_LINE_LIMIT_DEFAULT,
        }
    }
}

fn normalize_maximum_history_items(value: usize) -> usize {
    value.clamp(MAXIMUM_HISTORY_ITEMS_MIN, MAXIMUM_HISTORY_ITEMS_MAX)
}

fn normalize_item_line_limit(value: usize) -> usize {
    value.clamp(ITEM_LINE_LIMIT_MIN, ITEM_LINE_LIMIT_MAX)
}

impl Preferences {
    /// 将两个字段收敛到各自的合法区间
    pub fn normalized(self) -> Self {
        Self {
            maximum_history_items: normalize_maximum_history_items(self.maximum_history_items),
            item_line_limit: normalize_item_line_limit(self.item_line_limit),
        }
    }
}

/// 偏好持久化协作者
///
/// `load` 在启动时调用一次，从未保存过时返回默认值；
/// `save` 在用户显式保存时调用。
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Preferences;
    fn save(&self, preferences: &Preferences) -> Result<(), AppError>;
}

/// 基于 JSON 文件的偏好存储
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 使用平台配置目录下的 `utklippstavle/settings.json`
    pub fn in_config_dir() -> Result<Self, AppError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Storage("无法确定平台配置目录".to_string()))?;
        Ok(Self::new(config_dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_preferences_from_path(path: &Path) -> Preferences {
    if !path.exists() {
        log::info!("⚙️ 未找到设置文件，使用默认偏好: {}", path.display());
        return Preferences::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("读取设置文件失败，使用默认偏好: {}", err);
            return Preferences::default();
        }
    };

    match serde_json::from_str::<Preferences>(&content) {
        Ok(parsed) => {
            let normalized = parsed.normalized();
            if normalized != parsed {
                log::warn!("设置文件中的数值越界，已收敛为: {:?}", normalized);
            }
            normalized
        }
        Err(err) => {
            log::warn!("解析设置文件失败，使用默认偏好: {}", err);
            Preferences::default()
        }
    }
}

fn save_preferences_to_path(path: &Path, preferences: &Preferences) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Storage(format!("创建设置目录失败: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(preferences)
        .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Preferences {
        load_preferences_from_path(&self.path)
    }

    fn save(&self, preferences: &Preferences) -> Result<(), AppError> {
        save_preferences_to_path(&self.path, preferences)?;
        log::info!("⚙️ 偏好已保存: {}", self.path.display());
        Ok(())
    }
}

//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，所有可能失败的适配层操作
//! （系统剪贴板读写、设置文件读写、全局快捷键注册、平台事件循环）统一返回
//! `Result<T, AppError>`。
//!
//! 核心状态机（历史记录、选择路由）本身不会失败：无效输入一律降级为 no-op，
//! 因此这里只覆盖与外部世界打交道的部分。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 提供 `From` 转换，无需手动 map。

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板读写操作失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置存储不可用（目录缺失、序列化失败等）
    #[error("设置存储不可用: {0}")]
    Storage(String),

    /// 全局快捷键注册 / 解析失败
    #[error("快捷键操作失败: {0}")]
    Shortcut(String),

    /// 平台事件循环无法创建或异常退出
    #[error("事件循环错误: {0}")]
    EventLoop(String),
}

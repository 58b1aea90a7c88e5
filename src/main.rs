//! # 剪贴板历史工具 — 应用入口
//!
//! 本文件仅负责初始化与组装：日志、偏好、剪贴板、事件循环、轮询任务。
//! 主线程运行平台事件循环（全局快捷键依赖它），剪贴板轮询跑在后台的
//! tokio 运行时上。业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::sync::Arc;
use std::thread;

use tokio::runtime::Runtime;
use tokio::sync::oneshot;

use utklippstavle::app::ClipboardApp;
use utklippstavle::clipboard::{self, ClipboardWatcher, ClipboardWriter, SystemClipboard};
use utklippstavle::error::AppError;
use utklippstavle::host::Host;
use utklippstavle::presentation::ConsolePresentation;
use utklippstavle::settings::JsonPreferenceStore;

/// Ctrl-C；监听失败时永不完成
async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("监听退出信号失败，将一直运行: {err}");
        std::future::pending::<()>().await;
    }
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("setup: begin");

    let preference_store = JsonPreferenceStore::in_config_dir()?;
    log::info!("setup: settings file {}", preference_store.path().display());

    let writer = ClipboardWriter::new(SystemClipboard::new()?);
    let app = Arc::new(ClipboardApp::new(
        preference_store,
        writer,
        Arc::new(ConsolePresentation::new()),
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let mut watcher = ClipboardWatcher::new(SystemClipboard::new()?);
    watcher.prime();

    // 没有图形会话时（如纯终端 Linux）仍然记录历史，只是无法通过键盘唤起
    let host = match Host::new() {
        Ok(host) => host,
        Err(err) => {
            log::warn!("setup: {err}，以无快捷键模式运行");
            log::info!("setup: complete");
            runtime.block_on(clipboard::watcher::run_polling(
                &mut watcher,
                app.history(),
                clipboard::POLL_INTERVAL,
                ctrl_c(),
            ));
            log::info!("已退出");
            return Ok(());
        }
    };

    let shutdown = host.shutdown_handle();
    let (stop_polling, polling_stopped) = oneshot::channel::<()>();
    let poll_app = Arc::clone(&app);
    let polling = thread::Builder::new()
        .name("clipboard-poll".to_string())
        .spawn(move || {
            poll_in_background(runtime, &mut watcher, &poll_app, polling_stopped);
            shutdown.request();
        })?;
    log::info!("setup: complete");

    let result = host.run(&app);

    // 事件循环先退出（如 macOS 的退出菜单）时也要停下轮询
    let _ = stop_polling.send(());
    if polling.join().is_err() {
        log::error!("轮询线程异常退出");
    }
    log::info!("已退出");
    result
}

fn poll_in_background(
    runtime: Runtime,
    watcher: &mut ClipboardWatcher<SystemClipboard>,
    app: &ClipboardApp,
    stopped: oneshot::Receiver<()>,
) {
    let shutdown = async {
        tokio::select! {
            _ = ctrl_c() => log::info!("收到 Ctrl-C"),
            _ = stopped => {}
        }
    };
    runtime.block_on(clipboard::watcher::run_polling(
        watcher,
        app.history(),
        clipboard::POLL_INTERVAL,
        shutdown,
    ));
}

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::{ChangeToken, ClipboardSource};
use crate::history::{IngestOutcome, SharedHistory};

/// 轮询间隔：平台不提供剪贴板变化推送，只能定时检查
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// 单次轮询的结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// 令牌未变，什么都不做
    Unchanged,
    /// 令牌已变，但内容为空或不是文本
    Skipped,
    /// 令牌已变且有非空文本，应交给历史记录
    Captured(String),
    /// 本轮读取失败，等下一轮自然重试
    ReadFailed,
}

/// 剪贴板轮询器
///
/// 只记住上一次看到的令牌；每轮检查是 O(1) 外加一次剪贴板读取。
pub struct ClipboardWatcher<S> {
    source: S,
    last_observed: Option<ChangeToken>,
    consecutive_failures: u32,
}

impl<S: ClipboardSource> ClipboardWatcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last_observed: None,
            consecutive_failures: 0,
        }
    }

    pub fn last_observed_token(&self) -> Option<ChangeToken> {
        self.last_observed
    }

    /// 记录启动时剪贴板的令牌，但不把现有内容计入历史
    pub fn prime(&mut self) {
        match self.source.snapshot() {
            Ok(snapshot) => {
                self.last_observed = Some(snapshot.token);
                log::debug!("📋 剪贴板初始令牌已记录");
            }
            Err(err) => {
                log::warn!("📋 读取初始剪贴板失败，首次成功轮询时将捕获现有内容: {}", err);
            }
        }
    }

    /// 检查剪贴板是否出现新的复制事件
    pub fn check(&mut self) -> PollOutcome {
        let snapshot = match self.source.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures == 1 {
                    log::warn!("📋 读取剪贴板失败，下一轮重试: {}", err);
                } else {
                    log::trace!("📋 读取剪贴板仍然失败（连续 {} 次）: {}", self.consecutive_failures, err);
                }
                return PollOutcome::ReadFailed;
            }
        };

        if self.consecutive_failures > 0 {
            log::info!("📋 剪贴板恢复可读（此前连续失败 {} 次）", self.consecutive_failures);
            self.consecutive_failures = 0;
        }

        if self.last_observed == Some(snapshot.token) {
            return PollOutcome::Unchanged;
        }
        self.last_observed = Some(snapshot.token);

        match snapshot.text {
            Some(text) if !text.is_empty() => PollOutcome::Captured(text),
            _ => {
                log::trace!("📋 剪贴板变化但没有可用文本");
                PollOutcome::Skipped
            }
        }
    }

    /// 检查一次，并把捕获到的文本交给历史记录
    pub fn poll(&mut self, history: &SharedHistory) -> PollOutcome {
        let outcome = self.check();
        if let PollOutcome::Captured(text) = &outcome {
            match history.ingest(text.as_str()) {
                IngestOutcome::Added => log::debug!("📋 捕获新的剪贴板文本"),
                IngestOutcome::Duplicate => log::debug!("📋 剪贴板文本已在历史中，忽略"),
                IngestOutcome::Empty => {}
            }
        }
        outcome
    }
}

/// 以固定节奏驱动轮询，直到 `shutdown` 完成
///
/// 错过的节拍直接跳过，不会在恢复后连续补发。
pub async fn run_polling<S, F>(
    watcher: &mut ClipboardWatcher<S>,
    history: &SharedHistory,
    interval: Duration,
    shutdown: F,
) where
    S: ClipboardSource,
    F: Future,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    log::info!("📋 剪贴板轮询已启动（间隔 {}ms）", interval.as_millis());
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                watcher.poll(history);
            }
        }
    }
    log::info!("📋 剪贴板轮询已停止");
}

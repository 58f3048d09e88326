//! 任务作用域的 Bean 提供者
//!
//! overlay 绑定在 tokio 逻辑任务上（`task_local!`），而不是物理线程：
//! 任务在 `.await` 处挂起后即使被调度到另一个工作线程恢复，看到的仍是同一个 overlay。
//!
//! - 同一任务内的嵌套作用域只增不减：内层看到外层安装的全部 Bean
//! - 离开作用域时精确恢复进入前的 overlay（正常返回、错误、取消都一样）
//! - `tokio::spawn` 出来的任务默认没有 overlay，需要时用 [`ScopedBeanProvider::bind`] 显式传递快照

use super::bean::{Bean, BeanSet, Capability, Instance};
use super::error::BeanError;
use super::registry::fallback_or_not_found;
use super::stats::{InnerStats, LookupStats};
use super::BeanProvider;
use crate::logging::OperationTimer;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// `run_scoped` 计时日志中的操作名
pub const SCOPED_OPERATION: &str = "scoped_bean_operation";

tokio::task_local! {
    static OVERLAY: Arc<BeanSet>;
}

/// 先查当前任务的 overlay，再查回退提供者
#[derive(Default)]
pub struct ScopedBeanProvider {
    fallback: Option<Arc<dyn BeanProvider>>,
    stats: InnerStats,
}

impl ScopedBeanProvider {
    /// 没有回退的提供者
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: Arc<dyn BeanProvider>) -> Self {
        Self {
            fallback: Some(fallback),
            stats: InnerStats::default(),
        }
    }

    /// 在扩展后的 overlay 中执行 `operation`
    ///
    /// 新 overlay = 当前任务的 overlay ∪ `beans`。`operation` 只被调用一次，
    /// 其返回值（包括 `Err`）原样传回；返回前 overlay 已恢复为进入前的状态。
    /// 如果返回的 future 在完成前被丢弃（取消），overlay 同样会被移除。
    pub async fn run_scoped<I, F, Fut, T>(&self, beans: I, operation: F) -> T
    where
        I: IntoIterator,
        I::Item: Into<Option<Bean>>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let additional = BeanSet::from_optional(beans);
        let overlay = match Self::current_overlay() {
            Some(current) => current.union(&additional),
            None => additional,
        };

        tracing::trace!(beans = overlay.len(), "Installing scoped bean overlay");
        // 取消时计时器随 future 一起被丢弃，记录为中断
        let timer = OperationTimer::new(SCOPED_OPERATION).with_metadata("beans", overlay.len());
        let result = OVERLAY
            .scope(Arc::new(overlay), async move { operation().await })
            .await;
        timer.finish();
        tracing::trace!("Scoped bean overlay removed");
        result
    }

    /// 当前任务的 overlay（不在作用域中时为 `None`）
    pub fn current_overlay() -> Option<Arc<BeanSet>> {
        OVERLAY.try_with(Arc::clone).ok()
    }

    pub fn has_overlay() -> bool {
        OVERLAY.try_with(|_| ()).is_ok()
    }

    /// 把调用方当前的 overlay 快照绑定到另一个 future 上
    ///
    /// 用于 `tokio::spawn`：子任务得到父任务 overlay 的只读快照，
    /// 之后父子双方各自的作用域互不影响。
    pub fn bind<F>(future: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        let snapshot = Self::current_overlay();
        async move {
            match snapshot {
                Some(overlay) => OVERLAY.scope(overlay, future).await,
                None => future.await,
            }
        }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn stats(&self) -> LookupStats {
        self.stats.snapshot()
    }
}

#[async_trait]
impl BeanProvider for ScopedBeanProvider {
    async fn provide_bean(&self, capability: Capability) -> Result<Instance, BeanError> {
        self.stats.record_lookup();

        // 没有 overlay 时 try_with 返回 Err，直接走回退
        let local = OVERLAY
            .try_with(|overlay| overlay.find(&capability))
            .ok()
            .flatten();

        if let Some(instance) = local {
            self.stats.record_local_hit();
            tracing::debug!(capability = %capability, "Bean resolved from task overlay");
            return Ok(instance);
        }

        fallback_or_not_found(self.fallback.as_deref(), capability, &self.stats).await
    }
}

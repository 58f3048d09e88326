//! 默认提供者链的装配
//!
//! 链路：`ScopedBeanProvider` → `CompositeBeanProvider`（应用 Bean）→ `SetBeanProvider`（配置 Bean）

use super::container::{Bean, BeanProvider, CompositeBeanProvider, ScopedBeanProvider, SetBeanProvider};
use crate::config::AppConfig;
use std::sync::Arc;

/// 服务提供者工厂
pub struct ProviderFactory {
    config: Arc<AppConfig>,
}

impl ProviderFactory {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// 配置层：`AppConfig` 以及各配置段
    pub fn config_provider(&self) -> SetBeanProvider {
        SetBeanProvider::from_beans([
            Bean::from_arc(self.config.clone()),
            Bean::new(self.config.agent.clone()),
            Bean::new(self.config.logging.clone()),
        ])
    }

    /// 应用层：调用方注册的 Bean，未命中时回退到配置层
    pub fn application_provider<I>(&self, beans: I) -> CompositeBeanProvider
    where
        I: IntoIterator,
        I::Item: Into<Option<Bean>>,
    {
        CompositeBeanProvider::from_beans(beans, Some(Arc::new(self.config_provider())))
    }

    /// 完整的默认链
    pub fn build<I>(&self, beans: I) -> ScopedBeanProvider
    where
        I: IntoIterator,
        I::Item: Into<Option<Bean>>,
    {
        let application: Arc<dyn BeanProvider> = Arc::new(self.application_provider(beans));
        tracing::debug!("Default bean provider chain assembled");
        ScopedBeanProvider::with_fallback(application)
    }
}

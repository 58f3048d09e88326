//! 静态注册表
//!
//! `SetBeanProvider` 只搜索固定集合；`CompositeBeanProvider` 在本地未命中时
//! 委托给回退提供者。两者的匹配顺序都是注册顺序。

use super::bean::{Bean, BeanSet, Capability, Instance};
use super::error::BeanError;
use super::stats::{InnerStats, LookupStats};
use super::BeanProvider;
use async_trait::async_trait;
use std::sync::Arc;

/// 集合支撑的提供者，没有回退
#[derive(Debug, Default)]
pub struct SetBeanProvider {
    beans: BeanSet,
    stats: InnerStats,
}

impl SetBeanProvider {
    pub fn new(beans: BeanSet) -> Self {
        Self {
            beans,
            stats: InnerStats::default(),
        }
    }

    /// 从可选 Bean 构建，`None` 和重复实例被静默过滤
    pub fn from_beans<I>(beans: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Bean>>,
    {
        Self::new(BeanSet::from_optional(beans))
    }

    pub fn beans(&self) -> &BeanSet {
        &self.beans
    }

    pub fn stats(&self) -> LookupStats {
        self.stats.snapshot()
    }
}

#[async_trait]
impl BeanProvider for SetBeanProvider {
    async fn provide_bean(&self, capability: Capability) -> Result<Instance, BeanError> {
        self.stats.record_lookup();
        match self.beans.find(&capability) {
            Some(instance) => {
                self.stats.record_local_hit();
                tracing::debug!(capability = %capability, "Bean resolved from static set");
                Ok(instance)
            }
            None => {
                self.stats.record_miss();
                tracing::debug!(capability = %capability, "Bean not found in static set");
                Err(BeanError::not_found(capability))
            }
        }
    }
}

/// 构建静态注册表的便捷函数
pub fn beans<I>(beans: I) -> SetBeanProvider
where
    I: IntoIterator,
    I::Item: Into<Option<Bean>>,
{
    SetBeanProvider::from_beans(beans)
}

/// 静态集合 + 回退提供者
pub struct CompositeBeanProvider {
    beans: BeanSet,
    fallback: Option<Arc<dyn BeanProvider>>,
    stats: InnerStats,
}

impl CompositeBeanProvider {
    pub fn new(beans: BeanSet, fallback: Option<Arc<dyn BeanProvider>>) -> Self {
        Self {
            beans,
            fallback,
            stats: InnerStats::default(),
        }
    }

    pub fn from_beans<I>(beans: I, fallback: Option<Arc<dyn BeanProvider>>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Bean>>,
    {
        Self::new(BeanSet::from_optional(beans), fallback)
    }

    pub fn beans(&self) -> &BeanSet {
        &self.beans
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn stats(&self) -> LookupStats {
        self.stats.snapshot()
    }
}

#[async_trait]
impl BeanProvider for CompositeBeanProvider {
    async fn provide_bean(&self, capability: Capability) -> Result<Instance, BeanError> {
        self.stats.record_lookup();
        if let Some(instance) = self.beans.find(&capability) {
            self.stats.record_local_hit();
            tracing::debug!(capability = %capability, "Bean resolved from composite set");
            return Ok(instance);
        }
        fallback_or_not_found(self.fallback.as_deref(), capability, &self.stats).await
    }
}

/// 本地未命中后的公共路径：有回退就委托，没有就报告未找到
pub(super) async fn fallback_or_not_found(
    fallback: Option<&dyn BeanProvider>,
    capability: Capability,
    stats: &InnerStats,
) -> Result<Instance, BeanError> {
    match fallback {
        Some(provider) => {
            stats.record_fallback();
            tracing::trace!(capability = %capability, "Delegating lookup to fallback provider");
            provider.provide_bean(capability).await
        }
        None => {
            stats.record_miss();
            tracing::debug!(capability = %capability, "Bean cannot be located");
            Err(BeanError::not_found(capability))
        }
    }
}

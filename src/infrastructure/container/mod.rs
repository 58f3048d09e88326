//! Bean 容器
//!
//! 按类型查找实例的提供者链：
//! - `SetBeanProvider`：固定集合，没有回退
//! - `CompositeBeanProvider`：固定集合 + 回退提供者
//! - `ScopedBeanProvider`：当前任务的 overlay + 回退提供者

pub mod bean;
pub mod error;
pub mod registry;
pub mod scoped;
pub mod stats;

pub use bean::{Bean, BeanSet, Capability, Instance};
pub use error::BeanError;
pub use registry::{beans, CompositeBeanProvider, SetBeanProvider};
pub use scoped::ScopedBeanProvider;
pub use stats::LookupStats;

use async_trait::async_trait;
use std::sync::Arc;

/// 类型擦除的提供者接口
///
/// 保持对象安全，以便以 `Arc<dyn BeanProvider>` 组成回退链；
/// 带类型的查找见 [`BeanProviderExt`]。
#[async_trait]
pub trait BeanProvider: Send + Sync {
    /// 返回满足 `capability` 的实例，查找链全部未命中时返回 `BeanError::NotFound`
    async fn provide_bean(&self, capability: Capability) -> Result<Instance, BeanError>;
}

#[async_trait]
impl<P: BeanProvider + ?Sized> BeanProvider for Arc<P> {
    async fn provide_bean(&self, capability: Capability) -> Result<Instance, BeanError> {
        (**self).provide_bean(capability).await
    }
}

/// 带类型的查找 API
#[async_trait]
pub trait BeanProviderExt: BeanProvider {
    /// 解析类型 `T` 的 Bean
    async fn provide<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, BeanError> {
        let capability = Capability::of::<T>();
        let instance = self.provide_bean(capability).await?;
        instance
            .downcast::<T>()
            .map_err(|_| BeanError::TypeCastFailed {
                expected: capability.type_name(),
            })
    }

    /// 与 `provide` 相同，但把 `NotFound` 转换为 `Ok(None)`；其他错误原样返回
    async fn provide_optional<T: Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>, BeanError> {
        match self.provide::<T>().await {
            Ok(bean) => Ok(Some(bean)),
            Err(BeanError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<P: BeanProvider + ?Sized> BeanProviderExt for P {}

/// 服务解析宏
#[macro_export]
macro_rules! provide {
    ($provider:expr, $type:ty) => {
        $crate::infrastructure::container::BeanProviderExt::provide::<$type>(&$provider).await
    };
}

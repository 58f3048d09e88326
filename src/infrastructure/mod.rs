//! 基础设施层
//!
//! - Bean 容器与提供者链
//! - 默认提供者链的装配

pub mod container;
pub mod provider;

// 重新导出API
pub use container::{
    beans, Bean, BeanError, BeanProvider, BeanProviderExt, Capability, CompositeBeanProvider,
    ScopedBeanProvider, SetBeanProvider,
};
pub use provider::ProviderFactory;

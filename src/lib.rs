pub mod api;
pub mod clients;
pub mod config;
pub mod errors;
pub mod infrastructure;
pub mod logging;

// Re-export commonly used items for convenience
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use infrastructure::{
    beans, Bean, BeanError, BeanProvider, BeanProviderExt, Capability, CompositeBeanProvider,
    ProviderFactory, ScopedBeanProvider, SetBeanProvider,
};

//! 任务作用域提供者的集成测试

use capscope::infrastructure::container::{
    beans, Bean, BeanError, BeanProvider, BeanProviderExt, Capability, Instance,
    ScopedBeanProvider,
};
use std::sync::Arc;
use tokio::sync::Barrier;
use tokio::time::{sleep, timeout, Duration};

#[derive(Debug)]
struct ServiceA(&'static str);

#[derive(Debug)]
struct ServiceB(&'static str);

#[derive(Debug)]
struct ScopeFailed;

/// 总是失败的提供者，用来验证非 NotFound 错误不会被吞掉
struct BrokenProvider;

#[async_trait::async_trait]
impl BeanProvider for BrokenProvider {
    async fn provide_bean(&self, _capability: Capability) -> Result<Instance, BeanError> {
        Err(BeanError::Provider("backend offline".to_string()))
    }
}

#[tokio::test]
async fn test_optional_on_empty_provider_is_absent() {
    let provider = ScopedBeanProvider::new();

    let result = provider.provide_optional::<ServiceA>().await;
    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_optional_propagates_other_errors() {
    let provider = ScopedBeanProvider::with_fallback(Arc::new(BrokenProvider));

    let result = provider.provide_optional::<ServiceA>().await;
    assert_eq!(result.unwrap_err(), BeanError::Provider("backend offline".to_string()));
}

#[tokio::test]
async fn test_nested_scopes_compose() {
    let provider = ScopedBeanProvider::new();

    let (a, b) = provider
        .run_scoped(vec![Bean::new(ServiceA("outer"))], || async {
            provider
                .run_scoped(vec![Bean::new(ServiceB("inner"))], || async {
                    let a = provider.provide::<ServiceA>().await.unwrap();
                    let b = provider.provide::<ServiceB>().await.unwrap();
                    (a, b)
                })
                .await
        })
        .await;

    assert_eq!(a.0, "outer");
    assert_eq!(b.0, "inner");
    assert!(!ScopedBeanProvider::has_overlay());
}

#[tokio::test]
async fn test_concurrent_tasks_are_isolated() {
    let provider = Arc::new(ScopedBeanProvider::new());
    let barrier = Arc::new(Barrier::new(2));

    let scoped = {
        let provider = provider.clone();
        let barrier = barrier.clone();
        tokio::spawn(async move {
            provider
                .run_scoped(vec![Bean::new(ServiceA("task-1"))], || async {
                    // 第一次等待：作用域已安装
                    barrier.wait().await;
                    // 第二次等待：另一个任务已完成查找
                    barrier.wait().await;
                    provider.provide::<ServiceA>().await.is_ok()
                })
                .await
        })
    };

    let unscoped = {
        let provider = provider.clone();
        let barrier = barrier.clone();
        tokio::spawn(async move {
            barrier.wait().await;
            let result = provider.provide::<ServiceA>().await;
            barrier.wait().await;
            result
        })
    };

    assert!(scoped.await.unwrap());
    assert!(unscoped.await.unwrap().unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_overlay_removed_after_failure() {
    let provider = ScopedBeanProvider::with_fallback(Arc::new(beans(vec![Bean::new(ServiceB(
        "fallback",
    ))])));

    let before = provider.provide::<ServiceA>().await;
    assert!(before.unwrap_err().is_not_found());

    let result: Result<(), ScopeFailed> = provider
        .run_scoped(vec![Bean::new(ServiceA("scoped"))], || async {
            assert!(provider.provide::<ServiceA>().await.is_ok());
            Err(ScopeFailed)
        })
        .await;
    assert!(result.is_err());

    // 作用域外的查找与进入作用域前的结果一致
    let after = provider.provide::<ServiceA>().await;
    assert!(after.unwrap_err().is_not_found());
    assert!(provider.provide::<ServiceB>().await.is_ok());
}

#[tokio::test]
async fn test_overlay_removed_after_cancellation() {
    let provider = ScopedBeanProvider::new();

    let cancelled = timeout(
        Duration::from_millis(20),
        provider.run_scoped(vec![Bean::new(ServiceA("scoped"))], || async {
            sleep(Duration::from_secs(60)).await;
        }),
    )
    .await;
    assert!(cancelled.is_err());

    assert!(!ScopedBeanProvider::has_overlay());
    assert!(provider.provide::<ServiceA>().await.unwrap_err().is_not_found());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlay_survives_suspension() {
    let provider = Arc::new(ScopedBeanProvider::new());

    let handle = {
        let provider = provider.clone();
        tokio::spawn(async move {
            provider
                .run_scoped(vec![Bean::new(ServiceA("resumed"))], || async {
                    let mut seen = Vec::new();
                    for _ in 0..10 {
                        // 挂起后可能在其他工作线程恢复
                        tokio::task::yield_now().await;
                        sleep(Duration::from_millis(1)).await;
                        seen.push(provider.provide::<ServiceA>().await.unwrap().0);
                    }
                    seen
                })
                .await
        })
    };

    let seen = handle.await.unwrap();
    assert_eq!(seen, vec!["resumed"; 10]);
}

#[tokio::test]
async fn test_spawned_task_starts_without_overlay() {
    let provider = Arc::new(ScopedBeanProvider::new());

    let (plain, bound) = provider
        .run_scoped(vec![Bean::new(ServiceA("parent"))], || async {
            let plain = {
                let provider = provider.clone();
                tokio::spawn(async move { provider.provide::<ServiceA>().await.is_ok() })
            };
            let bound = {
                let provider = provider.clone();
                tokio::spawn(ScopedBeanProvider::bind(async move {
                    provider.provide::<ServiceA>().await.map(|a| a.0)
                }))
            };
            (plain.await.unwrap(), bound.await.unwrap())
        })
        .await;

    assert!(!plain);
    assert_eq!(bound.unwrap(), "parent");
}

#[tokio::test]
async fn test_scoped_provider_as_fallback_of_another_chain() {
    let scoped: Arc<dyn BeanProvider> = Arc::new(ScopedBeanProvider::new());
    let outer = capscope::CompositeBeanProvider::from_beans(
        vec![Bean::new(ServiceB("static"))],
        Some(scoped.clone()),
    );

    let concrete = ScopedBeanProvider::new();
    let resolved = concrete
        .run_scoped(vec![Bean::new(ServiceA("task"))], || async {
            outer.provide::<ServiceA>().await
        })
        .await
        .unwrap();

    // overlay 按任务存储，任何 ScopedBeanProvider 实例都能看到
    assert_eq!(resolved.0, "task");
}

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Debug)]
struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[tokio::test]
async fn test_inner_scope_adds_view_to_outer_instance() {
    let provider = ScopedBeanProvider::new();
    let greeter = Arc::new(EnglishGreeter);

    let greeting = provider
        .run_scoped(vec![Bean::from_arc(greeter.clone())], || async {
            assert!(matches!(
                provider.provide::<Arc<dyn Greeter>>().await,
                Err(BeanError::NotFound { .. })
            ));

            let as_dyn: Arc<dyn Greeter> = greeter.clone();
            let inner = provider
                .run_scoped(vec![Bean::from_arc(greeter.clone()).with_interface(as_dyn)], || async {
                    assert!(provider.provide::<EnglishGreeter>().await.is_ok());
                    provider.provide::<Arc<dyn Greeter>>().await.map(|g| g.greet())
                })
                .await;

            // 内层追加的视图在离开作用域后消失
            assert!(matches!(
                provider.provide::<Arc<dyn Greeter>>().await,
                Err(BeanError::NotFound { .. })
            ));
            inner
        })
        .await
        .unwrap();

    assert_eq!(greeting, "hello");
}

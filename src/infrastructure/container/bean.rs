//! Bean 与能力描述符
//!
//! - `Capability`：按 `TypeId` 标识的静态类型标签
//! - `Bean`：类型擦除后的共享实例，可附带额外的接口视图
//! - `BeanSet`：按注册顺序排列、按实例身份去重的 Bean 集合

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 类型擦除后的实例句柄
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 能力描述符 - 查找时使用的静态类型标签
#[derive(Clone, Copy)]
pub struct Capability {
    type_id: TypeId,
    type_name: &'static str,
}

impl Capability {
    /// 获取类型 `T` 的能力描述符
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 类型名称（仅用于日志和错误信息）
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// 类型名称不参与比较，只有 TypeId 决定身份
impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Capability {}

impl Hash for Capability {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.type_name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 单个视图：能力描述符 + 对应的实例
#[derive(Clone)]
struct Facet {
    capability: Capability,
    instance: Instance,
}

/// 已注册的实例
///
/// 第一个视图是实例本身的具体类型，其余视图由 [`Bean::with_interface`] 添加，
/// 用来表达“实现了某个接口”的关系，例如 `Arc<dyn AgentClient>`。
/// 克隆 `Bean` 只克隆 `Arc` 句柄，实例本身永远不会被复制。
#[derive(Clone)]
pub struct Bean {
    facets: Vec<Facet>,
}

impl Bean {
    /// 以具体类型注册实例
    pub fn new<T: Send + Sync + 'static>(instance: T) -> Self {
        Self::from_arc(Arc::new(instance))
    }

    /// 以调用方已持有的 `Arc` 注册实例，调用方与容器共享同一个对象
    pub fn from_arc<T: Send + Sync + 'static>(instance: Arc<T>) -> Self {
        Self {
            facets: vec![Facet {
                capability: Capability::of::<T>(),
                instance,
            }],
        }
    }

    /// 追加一个接口视图
    ///
    /// ```
    /// use std::sync::Arc;
    /// use capscope::infrastructure::container::Bean;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { "hello".into() }
    /// }
    ///
    /// let english = Arc::new(English);
    /// let bean = Bean::from_arc(english.clone())
    ///     .with_interface::<Arc<dyn Greeter>>(english);
    /// assert!(bean.satisfies(&capscope::infrastructure::container::Capability::of::<Arc<dyn Greeter>>()));
    /// ```
    pub fn with_interface<I: Send + Sync + 'static>(mut self, view: I) -> Self {
        let capability = Capability::of::<I>();
        if !self.satisfies(&capability) {
            self.facets.push(Facet {
                capability,
                instance: Arc::new(view),
            });
        }
        self
    }

    /// 具体类型的能力描述符
    pub fn capability(&self) -> Capability {
        self.facets[0].capability
    }

    /// 所有可匹配的能力描述符（具体类型在前）
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.facets.iter().map(|facet| facet.capability)
    }

    pub fn satisfies(&self, capability: &Capability) -> bool {
        self.facets.iter().any(|facet| facet.capability == *capability)
    }

    /// 获取满足能力的实例句柄
    pub fn instance_for(&self, capability: &Capability) -> Option<Instance> {
        self.facets
            .iter()
            .find(|facet| facet.capability == *capability)
            .map(|facet| facet.instance.clone())
    }

    /// 按类型取出实例
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.instance_for(&Capability::of::<T>())?.downcast::<T>().ok()
    }

    /// 合并同一实例的其他视图，已有的能力保持不变
    fn merge_views(&mut self, other: Bean) {
        for facet in other.facets {
            if !self.satisfies(&facet.capability) {
                self.facets.push(facet);
            }
        }
    }

    /// 是否为同一个实例（引用相等）
    pub fn same_instance(&self, other: &Bean) -> bool {
        std::ptr::addr_eq(
            Arc::as_ptr(&self.facets[0].instance),
            Arc::as_ptr(&other.facets[0].instance),
        )
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.facets.iter().map(|facet| facet.capability))
            .finish()
    }
}

/// 有序、去重的 Bean 集合
///
/// 迭代顺序即注册顺序，查找时第一个匹配的 Bean 胜出。
#[derive(Clone, Default, Debug)]
pub struct BeanSet {
    beans: Vec<Bean>,
}

impl BeanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从可选 Bean 集合构建，`None` 被静默丢弃
    pub fn from_optional<I>(beans: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Bean>>,
    {
        let mut set = Self::new();
        set.extend(beans.into_iter().filter_map(Into::into));
        set
    }

    /// 插入 Bean；同一实例已存在时把缺少的接口视图合并到已有 Bean 上，返回 false
    pub fn insert(&mut self, bean: Bean) -> bool {
        match self.beans.iter_mut().find(|existing| existing.same_instance(&bean)) {
            Some(existing) => {
                existing.merge_views(bean);
                false
            }
            None => {
                self.beans.push(bean);
                true
            }
        }
    }

    pub fn contains(&self, bean: &Bean) -> bool {
        self.beans.iter().any(|existing| existing.same_instance(bean))
    }

    /// 并集：保留 `self` 的顺序，`other` 中的新实例追加在后
    pub fn union(&self, other: &BeanSet) -> BeanSet {
        let mut merged = self.clone();
        merged.extend(other.beans.iter().cloned());
        merged
    }

    /// 按注册顺序查找第一个满足能力的实例
    pub fn find(&self, capability: &Capability) -> Option<Instance> {
        self.beans
            .iter()
            .find_map(|bean| bean.instance_for(capability))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bean> {
        self.beans.iter()
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

impl Extend<Bean> for BeanSet {
    fn extend<I: IntoIterator<Item = Bean>>(&mut self, iter: I) {
        for bean in iter {
            self.insert(bean);
        }
    }
}

impl FromIterator<Bean> for BeanSet {
    fn from_iter<I: IntoIterator<Item = Bean>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a BeanSet {
    type Item = &'a Bean;
    type IntoIter = std::slice::Iter<'a, Bean>;

    fn into_iter(self) -> Self::IntoIter {
        self.beans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    #[derive(Debug)]
    struct Service {
        name: String,
    }

    impl Named for Service {
        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_capability_equality_ignores_name() {
        assert_eq!(Capability::of::<String>(), Capability::of::<String>());
        assert_ne!(Capability::of::<String>(), Capability::of::<u32>());
        assert!(Capability::of::<String>().type_name().contains("String"));
    }

    #[test]
    fn test_bean_downcast() {
        let bean = Bean::new(Service { name: "a".into() });
        assert_eq!(bean.downcast::<Service>().unwrap().name, "a");
        assert!(bean.downcast::<String>().is_none());
    }

    #[test]
    fn test_interface_view() {
        let service = Arc::new(Service { name: "svc".into() });
        let bean = Bean::from_arc(service.clone()).with_interface::<Arc<dyn Named>>(service);

        let view = bean.downcast::<Arc<dyn Named>>().unwrap();
        assert_eq!(view.name(), "svc");
        assert_eq!(bean.capabilities().count(), 2);
        assert_eq!(bean.capability(), Capability::of::<Service>());
    }

    #[test]
    fn test_set_deduplicates_by_identity() {
        let shared = Bean::new(1u32);
        let mut set = BeanSet::new();

        assert!(set.insert(shared.clone()));
        assert!(!set.insert(shared));
        // 值相同但实例不同，不算重复
        assert!(set.insert(Bean::new(1u32)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_duplicate_instance_contributes_its_views() {
        let service = Arc::new(Service { name: "svc".into() });
        let set: BeanSet = vec![
            Bean::from_arc(service.clone()),
            Bean::from_arc(service.clone()).with_interface::<Arc<dyn Named>>(service),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 1);
        let view = set.find(&Capability::of::<Arc<dyn Named>>()).unwrap();
        assert_eq!(view.downcast::<Arc<dyn Named>>().unwrap().name(), "svc");
        assert!(set.find(&Capability::of::<Service>()).is_some());
    }

    #[test]
    fn test_union_merges_views_of_shared_instance() {
        let service = Arc::new(Service { name: "svc".into() });
        let outer: BeanSet = vec![Bean::from_arc(service.clone())].into_iter().collect();
        let inner: BeanSet = vec![Bean::from_arc(service.clone()).with_interface::<Arc<dyn Named>>(service)]
            .into_iter()
            .collect();

        let merged = outer.union(&inner);
        assert_eq!(merged.len(), 1);
        assert!(merged.find(&Capability::of::<Arc<dyn Named>>()).is_some());
        // 外层集合本身不被修改
        assert!(outer.find(&Capability::of::<Arc<dyn Named>>()).is_none());
    }

    #[test]
    fn test_from_optional_drops_none() {
        let set = BeanSet::from_optional(vec![Some(Bean::new(1u8)), None, Some(Bean::new(2u16))]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_find_uses_registration_order() {
        let set: BeanSet = vec![Bean::new(String::from("first")), Bean::new(String::from("second"))]
            .into_iter()
            .collect();

        let found = set.find(&Capability::of::<String>()).unwrap();
        assert_eq!(found.downcast::<String>().unwrap().as_str(), "first");
    }

    #[test]
    fn test_union_keeps_order_and_identity() {
        let a = Bean::new(1u8);
        let b = Bean::new(2u16);
        let left: BeanSet = vec![a.clone()].into_iter().collect();
        let right: BeanSet = vec![a, b].into_iter().collect();

        let merged = left.union(&right);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.iter().next().unwrap().capability(), Capability::of::<u8>());
        // 原集合不受影响
        assert_eq!(left.len(), 1);
    }
}

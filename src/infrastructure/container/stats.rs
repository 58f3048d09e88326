//! 查找统计

use std::sync::atomic::{AtomicUsize, Ordering};

/// 内部统计信息（原子计数器）
#[derive(Default, Debug)]
pub(crate) struct InnerStats {
    lookups: AtomicUsize,
    local_hits: AtomicUsize,
    fallbacks: AtomicUsize,
    misses: AtomicUsize,
}

impl InnerStats {
    pub(crate) fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_local_hit(&self) {
        self.local_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> LookupStats {
        LookupStats {
            lookups: self.lookups.load(Ordering::Relaxed),
            local_hits: self.local_hits.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// 提供者统计信息快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// 总查找次数
    pub lookups: usize,
    /// 本地集合（或 overlay）命中次数
    pub local_hits: usize,
    /// 委托给回退提供者的次数
    pub fallbacks: usize,
    /// 本提供者直接报告未找到的次数（没有回退时）
    pub misses: usize,
}

impl LookupStats {
    /// 本地命中率
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.local_hits as f64 / self.lookups as f64
        }
    }
}

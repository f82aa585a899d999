//! 进程内按键串行化的写入闸门
//!
//! 记录存储没有事务，先读后写的流程（加入小组、覆盖评分）在同一进程内
//! 通过同一个键的异步互斥锁排队执行。跨进程的竞争不在此处理。

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

// 超过该数量时清理无人持有的锁
const PRUNE_THRESHOLD: usize = 1024;

static WRITE_GATE: Lazy<WriteGate> = Lazy::new(WriteGate::new);

#[derive(Default)]
pub struct WriteGate {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全局实例
    pub fn global() -> &'static WriteGate {
        &WRITE_GATE
    }

    pub fn category_key(category_id: &str) -> String {
        format!("category:{category_id}")
    }

    pub fn grade_key(activity_id: &str, student_id: &str, graded_by: &str) -> String {
        format!("grade:{activity_id}:{student_id}:{graded_by}")
    }

    /// 获取键对应的锁，守卫释放前同键的其他调用方等待
    pub async fn acquire(&self, key: impl Into<String>) -> OwnedMutexGuard<()> {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.prune();
        }
        let lock = self.locks.entry(key.into()).or_default().clone();
        lock.lock_owned().await
    }

    /// 当前登记的键数量
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn prune(&self) {
        let before = self.locks.len();
        // 只有表自身持有引用的锁可以移除
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        debug!("Pruned {} idle write locks", before - self.locks.len());
    }
}

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use log::debug;

use crate::config::Settings;
use super::error::StoreResult;
use super::store_core::Store;

/// 存储和当前会话持有者
#[derive(Debug)]
struct Session {
    store: Store,
    owner: Option<ThreadId>,
}

#[derive(Debug)]
struct Shared {
    session: Mutex<Session>,
    released: Condvar,
}

/// 线程安全的存储管理器
///
/// 最外层 `start_transaction` 把调用线程登记为会话持有者，直到对应的
/// 最外层 `commit`/`rollback` 才释放。其他线程的任何操作在此期间阻塞，
/// 持有者自身的嵌套调用不会阻塞。
#[derive(Debug, Clone)]
pub struct StoreManager {
    shared: Arc<Shared>,
}

impl Default for StoreManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreManager {
    pub fn new() -> Self {
        Self::from_store(Store::new())
    }

    /// 使用配置构建
    pub fn with_settings(settings: Arc<Settings>) -> Self {
        Self::from_store(Store::with_settings(settings))
    }

    fn from_store(store: Store) -> Self {
        StoreManager {
            shared: Arc::new(Shared {
                session: Mutex::new(Session { store, owner: None }),
                released: Condvar::new(),
            }),
        }
    }

    /// 等待其他线程的会话结束后取得存储
    fn acquire(&self) -> MutexGuard<'_, Session> {
        let me = thread::current().id();
        let mut session = self
            .shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while matches!(session.owner, Some(owner) if owner != me) {
            session = self
                .shared
                .released
                .wait(session)
                .unwrap_or_else(PoisonError::into_inner);
        }
        session
    }

    /// 最外层事务结束后释放会话
    fn release_if_idle(&self, session: &mut Session) {
        if session.owner.is_some() && !session.store.in_transaction() {
            session.owner = None;
            debug!("会话已释放");
            self.shared.released.notify_all();
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.acquire().store.get(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.acquire().store.exists(key)
    }

    pub fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.acquire().store.set(key, value)
    }

    pub fn delete(&self, key: &str) -> StoreResult<()> {
        self.acquire().store.delete(key)
    }

    pub fn start_transaction(&self) {
        let mut session = self.acquire();
        if session.owner.is_none() {
            session.owner = Some(thread::current().id());
            debug!("会话由线程 {:?} 持有", thread::current().id());
        }
        session.store.start_transaction();
    }

    pub fn commit(&self) -> StoreResult<()> {
        let mut session = self.acquire();
        // 无论重放是否出错栈顶都已出栈
        let result = session.store.commit();
        self.release_if_idle(&mut session);
        result
    }

    pub fn rollback(&self) -> StoreResult<()> {
        let mut session = self.acquire();
        let result = session.store.rollback();
        self.release_if_idle(&mut session);
        result
    }

    pub fn depth(&self) -> usize {
        self.acquire().store.depth()
    }

    pub fn in_transaction(&self) -> bool {
        self.acquire().store.in_transaction()
    }

    /// 已提交的键数量
    pub fn len(&self) -> usize {
        self.acquire().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acquire().store.is_empty()
    }
}

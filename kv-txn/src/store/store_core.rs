use std::sync::Arc;

use log::{debug, trace, warn};

use crate::config::Settings;
use super::base_store::BaseStore;
use super::change_log::Change;
use super::error::{StoreError, StoreResult};
use super::error_list::ErrorList;
use super::transaction::TransactionStack;

/// 支持嵌套事务的内存键值存储
///
/// 事务内的写入只记录在栈顶作用域的变更日志中。读取时从最内层作用域
/// 向外查找，都没有记录时回落到已提交数据。提交把栈顶日志按原顺序
/// 重放到外层，回滚直接丢弃栈顶日志。
#[derive(Debug, Clone, Default)]
pub struct Store {
    base: BaseStore,
    transactions: TransactionStack,
}

impl Store {
    pub fn new() -> Self {
        Self {
            base: BaseStore::new(),
            transactions: TransactionStack::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            base: BaseStore::with_capacity(capacity),
            transactions: TransactionStack::new(),
        }
    }

    /// 按配置构建
    pub fn with_settings(settings: Arc<Settings>) -> Self {
        Self::with_capacity(settings.store.initial_capacity)
    }

    /// 当前可见的值
    pub fn get(&self, key: &str) -> Option<String> {
        let value = self.resolve(key).map(str::to_string);
        trace!("get {} -> {:?}", key, value);
        value
    }

    pub fn exists(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    pub fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey);
        }
        trace!("set {} (depth {})", key, self.depth());
        self.apply(Change::Set {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn delete(&mut self, key: &str) -> StoreResult<()> {
        trace!("delete {} (depth {})", key, self.depth());
        self.apply(Change::Delete {
            key: key.to_string(),
        })
    }

    /// 开启一层新的事务作用域
    pub fn start_transaction(&mut self) {
        let id = self.transactions.push();
        debug!("开启事务 {}，嵌套深度 {}", id, self.depth());
    }

    /// 提交栈顶事务
    ///
    /// 日志按追加顺序重放到新的栈顶，栈为空时写入已提交数据。重放中的
    /// 失败会被收集并在最后以聚合错误返回，失败之前已重放的变更保留。
    pub fn commit(&mut self) -> StoreResult<()> {
        let transaction = self.transactions.pop()?;
        let id = transaction.id;
        let log = transaction.merge();

        let mut errors = ErrorList::new();
        for change in log {
            if let Err(e) = self.apply(change) {
                warn!("事务 {} 重放失败: {}", id, e);
                errors.add(e);
            }
        }

        debug!(
            "事务 {} 已提交，剩余嵌套深度 {}，重放失败 {} 条",
            id,
            self.depth(),
            errors.len()
        );
        errors.into_result()
    }

    /// 回滚栈顶事务
    pub fn rollback(&mut self) -> StoreResult<()> {
        let transaction = self.transactions.pop()?;
        let id = transaction.id;
        let state = transaction.discard();
        debug!("事务 {} {:?}，剩余嵌套深度 {}", id, state, self.depth());
        Ok(())
    }

    /// 打开中的事务层数
    pub fn depth(&self) -> usize {
        self.transactions.depth()
    }

    pub fn in_transaction(&self) -> bool {
        !self.transactions.is_empty()
    }

    /// 已提交的键数量
    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    fn resolve(&self, key: &str) -> Option<&str> {
        match self.transactions.lookup(key) {
            Some(visibility) => visibility.value(),
            None => self.base.get(key),
        }
    }

    /// 写入当前上下文：有事务时追加到栈顶日志，否则直接修改已提交数据。
    /// 提交重放也走这里，不重新经过公开接口。
    fn apply(&mut self, change: Change) -> StoreResult<()> {
        if let Change::Delete { key } = &change {
            if !self.exists(key) {
                return Err(StoreError::KeyNotFound(key.clone()));
            }
        }

        match self.transactions.top_mut() {
            Some(transaction) => transaction.record(change),
            None => match change {
                Change::Set { key, value } => self.base.put(key, value),
                Change::Delete { key } => {
                    self.base.remove(&key);
                }
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Visibility;

    #[test]
    fn test_failed_delete_replay_is_aggregated() {
        let mut store = Store::new();
        store.set("kept", "v0").unwrap();

        store.start_transaction();
        store.set("kept", "v1").unwrap();
        // 构造一条在外层已不可见的删除记录
        store
            .transactions
            .top_mut()
            .unwrap()
            .record(Change::Delete { key: "ghost".to_string() });
        store.set("after", "v2").unwrap();

        let err = store.commit().unwrap_err();
        match err {
            StoreError::Aggregate(list) => {
                assert_eq!(list.len(), 1);
                assert!(matches!(&list.errors()[0], StoreError::KeyNotFound(k) if k == "ghost"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // 失败前后的变更都已重放，事务已出栈
        assert_eq!(store.get("kept"), Some("v1".to_string()));
        assert_eq!(store.get("after"), Some("v2".to_string()));
        assert!(!store.in_transaction());
    }

    #[test]
    fn test_multiple_replay_failures_keep_order() {
        let mut store = Store::new();
        store.start_transaction();
        store.start_transaction();
        {
            let top = store.transactions.top_mut().unwrap();
            top.record(Change::Delete { key: "a".to_string() });
            top.record(Change::Delete { key: "b".to_string() });
        }

        let err = store.commit().unwrap_err();
        let StoreError::Aggregate(list) = err else {
            panic!("expected aggregate error");
        };
        let keys: Vec<&str> = list
            .errors()
            .iter()
            .map(|e| match e {
                StoreError::KeyNotFound(k) => k.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(keys, vec!["a", "b"]);

        // 外层事务仍然打开
        assert_eq!(store.depth(), 1);
        assert!(store.transactions.top().unwrap().log().is_empty());
    }

    #[test]
    fn test_replay_into_parent_scope_is_buffered() {
        let mut store = Store::new();
        store.start_transaction();
        store.start_transaction();
        store.set("k", "v").unwrap();
        store.commit().unwrap();

        assert_eq!(store.transactions.top().unwrap().log().len(), 1);
        assert_eq!(
            store.transactions.lookup("k"),
            Some(Visibility::Present("v"))
        );
        assert!(store.base.get("k").is_none());
    }
}

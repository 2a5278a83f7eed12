use log::debug;

use super::change_log::{Change, ChangeLog, Visibility};
use super::error::{StoreError, StoreResult};

/// 事务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// 打开中，可以继续写入
    Open,
    /// 已合并到外层
    Merged,
    /// 已丢弃
    Discarded,
}

/// 一层事务作用域，独占一份变更日志
#[derive(Debug, Clone)]
pub struct Transaction {
    /// 事务ID
    pub id: u64,
    state: TransactionState,
    log: ChangeLog,
}

impl Transaction {
    pub fn new(id: u64) -> Self {
        Transaction {
            id,
            state: TransactionState::Open,
            log: ChangeLog::new(),
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn log(&self) -> &ChangeLog {
        &self.log
    }

    /// 追加变更，只有打开中的事务接受写入
    pub fn record(&mut self, change: Change) {
        debug_assert_eq!(self.state, TransactionState::Open);
        self.log.append(change);
    }

    pub fn lookup(&self, key: &str) -> Option<Visibility<'_>> {
        self.log.lookup(key)
    }

    /// 结束作用域并交出日志，调用方按原顺序重放。
    /// 终态只记录在日志输出中，事务对象随后被消耗。
    pub fn merge(mut self) -> ChangeLog {
        self.state = TransactionState::Merged;
        debug!(
            "事务 {} 状态 {:?}，共 {} 条变更",
            self.id,
            self.state,
            self.log.len()
        );
        self.log
    }

    /// 结束作用域并丢弃日志，返回终态
    pub fn discard(mut self) -> TransactionState {
        self.state = TransactionState::Discarded;
        debug!(
            "事务 {} 状态 {:?}，丢弃 {} 条变更",
            self.id,
            self.state,
            self.log.len()
        );
        self.state
    }
}

/// 嵌套事务栈，栈顶为最内层作用域
#[derive(Debug, Clone, Default)]
pub struct TransactionStack {
    scopes: Vec<Transaction>,
    next_txn_id: u64,
}

impl TransactionStack {
    pub fn new() -> Self {
        TransactionStack {
            scopes: Vec::new(),
            next_txn_id: 0,
        }
    }

    /// 压入一个新的空作用域，返回其ID
    pub fn push(&mut self) -> u64 {
        self.next_txn_id += 1;
        let id = self.next_txn_id;
        self.scopes.push(Transaction::new(id));
        id
    }

    pub fn pop(&mut self) -> StoreResult<Transaction> {
        self.scopes.pop().ok_or(StoreError::NoActiveTransaction)
    }

    pub fn top(&self) -> Option<&Transaction> {
        self.scopes.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Transaction> {
        self.scopes.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// 从内到外查找第一个对该键有记录的作用域；都没有时返回 None
    pub fn lookup(&self, key: &str) -> Option<Visibility<'_>> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(key))
    }
}

use std::fmt;

use super::error_list::ErrorList;

/// 存储操作错误类型
#[derive(Debug, Clone)]
pub enum StoreError {
    /// 写操作使用了空键
    InvalidKey,
    /// 键在当前可见范围内不存在
    KeyNotFound(String),
    /// 没有进行中的事务
    NoActiveTransaction,
    /// 提交重放过程中收集到的一个或多个错误
    Aggregate(ErrorList),
    /// 文件IO错误
    IoError(String),
    /// 配置错误
    ConfigError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidKey => write!(f, "键不能为空"),
            StoreError::KeyNotFound(key) => write!(f, "键 '{}' 不存在", key),
            StoreError::NoActiveTransaction => write!(f, "没有进行中的事务"),
            StoreError::Aggregate(list) => write!(f, "{}", list),
            StoreError::IoError(msg) => write!(f, "IO错误: {}", msg),
            StoreError::ConfigError(msg) => write!(f, "配置错误: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Aggregate(list) => list
                .errors()
                .first()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

/// 存储操作结果类型
pub type StoreResult<T> = Result<T, StoreError>;

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::IoError(error.to_string())
    }
}

impl From<::config::ConfigError> for StoreError {
    fn from(error: ::config::ConfigError) -> Self {
        StoreError::ConfigError(error.to_string())
    }
}

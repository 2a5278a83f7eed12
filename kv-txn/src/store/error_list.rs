use std::fmt;

use super::error::{StoreError, StoreResult};

/// 按加入顺序收集一批操作中出现的错误
#[derive(Debug, Clone, Default)]
pub struct ErrorList {
    errors: Vec<StoreError>,
}

impl ErrorList {
    pub fn new() -> Self {
        ErrorList { errors: Vec::new() }
    }

    /// 追加一个错误
    pub fn add(&mut self, error: StoreError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 已收集的错误，顺序与加入顺序一致
    pub fn errors(&self) -> &[StoreError] {
        &self.errors
    }

    /// 没有错误时返回 None，否则返回包装全部错误的聚合错误
    pub fn error(&self) -> Option<StoreError> {
        if self.errors.is_empty() {
            None
        } else {
            Some(StoreError::Aggregate(self.clone()))
        }
    }

    pub fn into_result(self) -> StoreResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Aggregate(self))
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl From<Vec<StoreError>> for ErrorList {
    fn from(errors: Vec<StoreError>) -> Self {
        ErrorList { errors }
    }
}

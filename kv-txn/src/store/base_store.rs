use std::collections::HashMap;

/// 已提交数据的底层映射，不感知事务
#[derive(Debug, Clone, Default)]
pub struct BaseStore {
    data: HashMap<String, String>,
}

impl BaseStore {
    pub fn new() -> Self {
        BaseStore {
            data: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BaseStore {
            data: HashMap::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn put(&mut self, key: String, value: String) {
        self.data.insert(key, value);
    }

    /// 删除键，返回键是否存在
    pub fn remove(&mut self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Set,
    Delete,
}

/// 单条变更记录，写入日志后不可修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// 设置键值对
    Set { key: String, value: String },
    /// 删除键
    Delete { key: String },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Set { .. } => ChangeKind::Set,
            Change::Delete { .. } => ChangeKind::Delete,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Change::Set { key, .. } | Change::Delete { key } => key,
        }
    }
}

/// 某个作用域对一个键的最新看法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility<'a> {
    /// 键在该作用域中被设置为此值
    Present(&'a str),
    /// 键在该作用域中被删除
    Deleted,
}

impl<'a> Visibility<'a> {
    pub fn value(self) -> Option<&'a str> {
        match self {
            Visibility::Present(value) => Some(value),
            Visibility::Deleted => None,
        }
    }
}

/// 一个事务作用域内按追加顺序排列的变更日志
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Vec<Change>,
}

impl ChangeLog {
    pub fn new() -> Self {
        ChangeLog {
            changes: Vec::new(),
        }
    }

    pub fn append(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// 从最新到最旧查找键，同一键后写入的记录覆盖先写入的
    pub fn lookup(&self, key: &str) -> Option<Visibility<'_>> {
        self.changes
            .iter()
            .rev()
            .find(|change| change.key() == key)
            .map(|change| match change {
                Change::Set { value, .. } => Visibility::Present(value.as_str()),
                Change::Delete { .. } => Visibility::Deleted,
            })
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }
}

impl IntoIterator for ChangeLog {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

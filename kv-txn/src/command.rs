use crate::store::StoreManager;
use log::debug;

// 表示解析后的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(String, String),
    Get(String),
    Delete(String),

    // 事务命令
    Begin,
    Commit,
    Rollback,

    Help,

    // 无效命令
    Invalid(String),
}

// 命令处理器
pub struct CommandHandler {
    store_manager: StoreManager,
}

impl CommandHandler {
    pub fn new(store_manager: StoreManager) -> Self {
        CommandHandler { store_manager }
    }

    pub fn store_manager(&self) -> &StoreManager {
        &self.store_manager
    }

    // 解析命令字符串
    pub fn parse_command(&self, input: &str) -> Command {
        let parts: Vec<&str> = input.split_whitespace().collect();

        if parts.is_empty() {
            return Command::Invalid("Empty command".to_string());
        }

        match parts[0].to_lowercase().as_str() {
            "begin" | "start" => Command::Begin,
            "commit" => Command::Commit,
            "rollback" => Command::Rollback,

            "set" => {
                if parts.len() < 3 {
                    Command::Invalid("Usage: SET key value".to_string())
                } else {
                    Command::Set(parts[1].to_string(), parts[2..].join(" "))
                }
            }
            "get" => {
                if parts.len() != 2 {
                    Command::Invalid("Usage: GET key".to_string())
                } else {
                    Command::Get(parts[1].to_string())
                }
            }
            "delete" | "del" => {
                if parts.len() != 2 {
                    Command::Invalid("Usage: DELETE key".to_string())
                } else {
                    Command::Delete(parts[1].to_string())
                }
            }
            "help" => Command::Help,
            _ => Command::Invalid(format!("Unknown command: {}", parts[0])),
        }
    }

    // 执行命令
    pub fn execute_command(&self, command: Command) -> String {
        debug!("执行命令: {:?}", command);

        let done = |result: crate::store::StoreResult<()>| match result {
            Ok(()) => "OK".to_string(),
            Err(e) => format!("ERROR: {}", e),
        };

        match command {
            Command::Set(key, value) => done(self.store_manager.set(&key, &value)),
            Command::Get(key) => self
                .store_manager
                .get(&key)
                .unwrap_or_else(|| "(nil)".to_string()),
            Command::Delete(key) => done(self.store_manager.delete(&key)),
            Command::Begin => {
                self.store_manager.start_transaction();
                "OK".to_string()
            }
            Command::Commit => done(self.store_manager.commit()),
            Command::Rollback => done(self.store_manager.rollback()),
            Command::Help => Self::help().to_string(),
            Command::Invalid(msg) => format!("ERROR: {}", msg),
        }
    }

    /// 逐行执行，跳过空行和 # 开头的注释行
    pub fn execute_script(&self, script: &str) -> Vec<String> {
        script
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| self.execute_command(self.parse_command(line)))
            .collect()
    }

    fn help() -> &'static str {
        r"可用命令:
  set [key] [value] - 写入键值，事务中只对当前事务可见
  get [key] - 读取当前可见的值
  delete [key] - 删除当前可见的键
  begin - 开启一层嵌套事务
  commit - 把当前事务合并到外层
  rollback - 丢弃当前事务
  help - 获取所有命令帮助"
    }
}

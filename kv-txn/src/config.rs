use config::{Config, File};
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::store::StoreResult;

const DEFAULT_CONFIG: &str = r#"[store]
# 已提交数据映射的初始容量
initial_capacity = 64

[logging]
# 日志文件路径，留空则只输出到终端
log_file = "logs/kv-txn.log"
# 日志级别: "error", "warn", "info", "debug", "trace"
level = "info"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub initial_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_file: String,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store: StoreConfig {
                initial_capacity: 64,
            },
            logging: LoggingConfig {
                log_file: "logs/kv-txn.log".to_string(),
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// 读取 config/default.toml，不存在时先写入默认配置
    pub fn new() -> StoreResult<Self> {
        Self::load_or_create(Path::new("config"))
    }

    /// 读取 `<config_dir>/default.toml`，不存在时先写入默认配置
    pub fn load_or_create(config_dir: &Path) -> StoreResult<Self> {
        let default_config_path = config_dir.join("default.toml");

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        if !default_config_path.exists() {
            let mut file = fs::File::create(&default_config_path)?;
            file.write_all(DEFAULT_CONFIG.as_bytes())?;
        }

        Self::from_file(&default_config_path)
    }

    /// 读取指定的配置文件
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

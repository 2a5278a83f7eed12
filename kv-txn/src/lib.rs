pub mod store;
pub mod config;
pub mod command;
pub mod logger;

// 重新导出常用类型
pub use store::{Store, StoreError, StoreManager, StoreResult};
pub use command::{Command, CommandHandler};
pub use config::Settings;

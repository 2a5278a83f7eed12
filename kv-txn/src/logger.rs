use log::{LevelFilter, SetLoggerError};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// 解析日志级别，无法识别时使用 info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn open_log_file(log_file: &str) -> Option<File> {
    if log_file.is_empty() {
        return None;
    }

    // 确保日志目录存在
    if let Some(parent) = Path::new(log_file).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("无法创建日志目录: {}", e);
                return None;
            }
        }
    }

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("无法打开日志文件 {}: {}，仅输出到终端", log_file, e);
            None
        }
    }
}

/// 初始化终端日志，并在能打开日志文件时同时写入文件
pub fn init_logger(log_file: &str, level: &str) -> Result<(), SetLoggerError> {
    let level_filter = parse_level(level);

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level_filter,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(file) = open_log_file(log_file) {
        loggers.push(WriteLogger::new(level_filter, Config::default(), file));
    }

    CombinedLogger::init(loggers)
}

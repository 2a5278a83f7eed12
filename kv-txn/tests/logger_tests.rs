use kv_txn::logger::init_logger;
use kv_txn::store::Store;
use log::debug;
use std::fs;

// 全局日志只能初始化一次，本文件只放这一个测试
#[test]
fn test_init_logger_falls_back_to_terminal() {
    // 日志目录位置被普通文件占用，无法创建日志文件
    let blocker = std::env::temp_dir().join(format!("kv-txn-log-blocker-{}", std::process::id()));
    fs::write(&blocker, "file").unwrap();
    let log_file = blocker.join("logs").join("kv-txn.log");

    assert!(init_logger(log_file.to_str().unwrap(), "debug").is_ok());
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    assert!(!log_file.exists());

    // 初始化后存储照常工作并输出日志
    debug!("logger ready");
    let mut store = Store::new();
    store.start_transaction();
    store.set("k", "v").unwrap();
    store.commit().unwrap();
    assert_eq!(store.get("k"), Some("v".to_string()));

    fs::remove_file(&blocker).ok();
}

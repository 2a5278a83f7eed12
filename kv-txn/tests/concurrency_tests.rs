use kv_txn::store::{StoreError, StoreManager};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn test_manager_scenarios() {
    let manager = StoreManager::new();
    manager.set("key1", "value1").unwrap();

    manager.start_transaction();
    manager.set("key1", "value2").unwrap();
    manager.start_transaction();
    manager.delete("key1").unwrap();
    manager.commit().unwrap();
    assert_eq!(manager.get("key1"), None);
    manager.commit().unwrap();
    assert_eq!(manager.get("key1"), None);

    assert!(matches!(manager.rollback(), Err(StoreError::NoActiveTransaction)));
    assert_eq!(manager.depth(), 0);
}

#[test]
fn test_nested_calls_from_owner_do_not_block() {
    let manager = StoreManager::new();
    manager.start_transaction();
    manager.start_transaction();
    manager.set("k", "v").unwrap();
    assert_eq!(manager.depth(), 2);
    manager.commit().unwrap();
    manager.rollback().unwrap();
    assert!(!manager.in_transaction());
    assert!(!manager.exists("k"));
}

#[test]
fn test_other_thread_waits_for_outermost_commit() {
    let manager = StoreManager::new();
    manager.set("counter", "0").unwrap();

    manager.start_transaction();
    manager.set("counter", "1").unwrap();

    let (tx, rx) = mpsc::channel();
    let other = manager.clone();
    let handle = thread::spawn(move || {
        // 持有者提交前这里会阻塞
        let seen = other.get("counter");
        tx.send(seen.clone()).unwrap();
        other.set("counter", "2").unwrap();
        seen
    });

    // 会话未释放，另一线程拿不到结果
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    manager.start_transaction();
    manager.set("counter", "inner").unwrap();
    manager.commit().unwrap();
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

    manager.set("counter", "1").unwrap();
    manager.commit().unwrap();

    let seen = handle.join().unwrap();
    assert_eq!(seen, Some("1".to_string()));
    assert_eq!(manager.get("counter"), Some("2".to_string()));
}

#[test]
fn test_rollback_releases_session() {
    let manager = StoreManager::new();
    manager.start_transaction();
    manager.set("k", "pending").unwrap();

    let other = manager.clone();
    let handle = thread::spawn(move || {
        other.set("k", "other").unwrap();
    });

    thread::sleep(Duration::from_millis(50));
    manager.rollback().unwrap();
    handle.join().unwrap();

    assert_eq!(manager.get("k"), Some("other".to_string()));
}

#[test]
fn test_direct_writes_from_many_threads() {
    let manager = StoreManager::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let m = manager.clone();
            thread::spawn(move || {
                m.start_transaction();
                m.set(&format!("key{}", i), &i.to_string()).unwrap();
                m.commit().unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.len(), 8);
    for i in 0..8 {
        assert_eq!(manager.get(&format!("key{}", i)), Some(i.to_string()));
    }
}

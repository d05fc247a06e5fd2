use super::*;
use crate::config::LogStoreConfig;
use crate::ports::console::NoConsole;
use crate::ports::list_store::StoreError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::broadcast::error::TryRecvError;

// ==================== Test Mocks ====================

#[derive(Default)]
struct MockListStore {
    lists: Mutex<HashMap<String, VecDeque<String>>>,
    closed: AtomicBool,
    fail_push: AtomicBool,
    fail_trim: AtomicBool,
    fail_range: AtomicBool,
    trims: AtomicUsize,
}

impl MockListStore {
    /// Seed a list, head first.
    fn seed(&self, key: &str, items: &[&str]) {
        let list = items.iter().map(|item| item.to_string()).collect();
        self.lists.lock().unwrap().insert(key.to_string(), list);
    }

    fn len(&self, key: &str) -> usize {
        self.lists.lock().unwrap().get(key).map_or(0, VecDeque::len)
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
        let len = len as isize;
        let start = if start < 0 { len + start } else { start }.max(0);
        let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);
        if start > stop || start >= len {
            return None;
        }
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl ListStore for MockListStore {
    async fn push_head(&self, key: &str, value: &str) -> Result<usize, StoreError> {
        self.check_open()?;
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(StoreError::Command("OOM command not allowed".to_string()));
        }
        let mut lists = self.lists.lock().unwrap();
        let list = lists.entry(key.to_string()).or_default();
        list.push_front(value.to_string());
        Ok(list.len())
    }

    async fn trim(&self, key: &str, start: isize, stop: isize) -> Result<(), StoreError> {
        self.check_open()?;
        if self.fail_trim.load(Ordering::SeqCst) {
            return Err(StoreError::Command("trim rejected".to_string()));
        }
        self.trims.fetch_add(1, Ordering::SeqCst);
        let mut lists = self.lists.lock().unwrap();
        if let Some(list) = lists.get_mut(key) {
            match Self::bounds(list.len(), start, stop) {
                Some((start, stop)) => {
                    let kept: VecDeque<String> = list.drain(start..=stop).collect();
                    *list = kept;
                }
                None => list.clear(),
            }
        }
        Ok(())
    }

    async fn range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, StoreError> {
        self.check_open()?;
        if self.fail_range.load(Ordering::SeqCst) {
            return Err(StoreError::Command("range rejected".to_string()));
        }
        let lists = self.lists.lock().unwrap();
        let Some(list) = lists.get(key) else {
            return Ok(Vec::new());
        };
        Ok(match Self::bounds(list.len(), start, stop) {
            Some((start, stop)) => list.range(start..=stop).cloned().collect(),
            None => Vec::new(),
        })
    }

    async fn flush_all(&self) -> Result<bool, StoreError> {
        self.check_open()?;
        self.lists.lock().unwrap().clear();
        Ok(true)
    }

    async fn close(&self) -> Result<bool, StoreError> {
        self.check_open()?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(true)
    }
}

#[derive(Default)]
struct RecordingConsole {
    lines: Mutex<Vec<(String, Severity, String)>>,
}

impl RecordingConsole {
    fn lines(&self) -> Vec<(String, Severity, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl ConsoleLogger for RecordingConsole {
    fn write(&self, logger: &str, severity: Severity, content: &LogContent) {
        self.lines
            .lock()
            .unwrap()
            .push((logger.to_string(), severity, content.to_string()));
    }
}

fn store_with(config: LogStoreConfig) -> (LogStore, Arc<MockListStore>, Arc<RecordingConsole>) {
    let store = Arc::new(MockListStore::default());
    let console = Arc::new(RecordingConsole::default());
    let log = LogStore::new(store.clone(), console.clone(), config).unwrap();
    (log, store, console)
}

fn contents(entries: &[StoredEntry]) -> Vec<Value> {
    entries
        .iter()
        .map(|entry| {
            let record = entry.as_record().expect("record");
            record.content().cloned().unwrap_or_default()
        })
        .collect()
}

// ==================== Severity Methods ====================

#[tokio::test]
async fn test_severity_methods_return_invoked_severity() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));

    let messages = [
        log.fatal("test"),
        log.error("test"),
        log.warn("test"),
        log.info("test"),
        log.debug("test"),
        log.trace("test"),
    ];

    for (message, expected) in messages.iter().zip(Severity::ALL) {
        assert_eq!(message.kind, expected);
        assert_eq!(message.message, LogContent::from("test"));
    }
}

#[tokio::test]
async fn test_each_severity_has_its_own_list() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc"));

    for severity in Severity::ALL {
        log.log(severity, &"x".into()).wait().await.unwrap();
    }

    for severity in Severity::ALL {
        assert_eq!(store.len(&format!("svc:{}", severity)), 1);
    }
}

#[tokio::test]
async fn test_console_receives_every_message() {
    let (log, _, console) = store_with(LogStoreConfig::new("svc"));

    log.warn("disk almost full").written().await.unwrap();

    assert_eq!(
        console.lines(),
        vec![("svc".to_string(), Severity::Warn, "disk almost full".to_string())]
    );
}

// ==================== Persistence ====================

#[tokio::test]
async fn test_write_then_read_back() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));

    log.info("hello").written().await.unwrap();
    let entries = log.all_default(Severity::Info).await.unwrap();

    assert_eq!(entries.len(), 1);
    let record = entries[0].as_record().unwrap();
    assert_eq!(record.content(), Some(&json!("hello")));
    assert_eq!(record.time.map(|time| time.timestamp()), record.timestamp());
}

#[tokio::test]
async fn test_read_observes_unawaited_writes_newest_first() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));

    log.info("one");
    log.info("two");
    log.info("three");

    let entries = log.all(Severity::Info, 0, -1).await.unwrap();
    assert_eq!(contents(&entries), vec![json!("three"), json!("two"), json!("one")]);
}

#[tokio::test]
async fn test_range_bounds_are_passed_through() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));
    for n in 1..=4i64 {
        log.debug(n);
    }

    let newest_two = log.all(Severity::Debug, 0, 1).await.unwrap();
    assert_eq!(contents(&newest_two), vec![json!(4), json!(3)]);

    let oldest = log.all(Severity::Debug, -1, -1).await.unwrap();
    assert_eq!(contents(&oldest), vec![json!(1)]);
}

#[tokio::test]
async fn test_stored_value_is_formatted_content() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));

    log.error(json!({"code": 500})).written().await.unwrap();
    let io = std::io::Error::other("socket hang up");
    log.error(LogContent::from_error(&io)).written().await.unwrap();

    let entries = log.all_default(Severity::Error).await.unwrap();
    assert_eq!(
        contents(&entries),
        vec![json!("socket hang up"), json!(r#"{"code":500}"#)]
    );
}

#[tokio::test]
async fn test_unparseable_entries_are_returned_raw() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc"));
    store.seed(
        "svc:info",
        &["legacy line", r#"{"content":"ok","timestamp":1}"#],
    );

    let entries = log.all_default(Severity::Info).await.unwrap();
    assert_eq!(entries[0], StoredEntry::Raw("legacy line".to_string()));
    assert_eq!(entries[1].as_record().unwrap().content(), Some(&json!("ok")));
}

#[tokio::test]
async fn test_foreign_records_keep_their_fields() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc"));
    store.seed(
        "svc:info",
        &[
            r#"{"content":"x","timestamp":1,"host":"a"}"#,
            r#"{"content":"y","timestamp":1.5}"#,
            r#"{"content":"z"}"#,
        ],
    );

    let entries = log.all_default(Severity::Info).await.unwrap();

    assert!(entries.iter().all(|entry| !entry.is_raw()));
    assert_eq!(contents(&entries), vec![json!("x"), json!("y"), json!("z")]);
    let first = entries[0].as_record().unwrap();
    assert_eq!(first.get("host"), Some(&json!("a")));
    assert!(entries[1].as_record().unwrap().time.is_some());
    assert!(entries[2].as_record().unwrap().time.is_none());
}

#[tokio::test]
async fn test_log_tag_uses_raw_key_and_info_console() {
    let (log, store, console) = store_with(LogStoreConfig::new("svc"));

    log.log_tag("audit", &"login".into()).wait().await.unwrap();

    assert_eq!(store.len("svc:audit"), 1);
    assert_eq!(console.lines()[0].1, Severity::Info);
    let entries = log.all_tag("audit", 0, -1).await.unwrap();
    assert_eq!(contents(&entries), vec![json!("login")]);
}

// ==================== Capped Lists ====================

#[tokio::test]
async fn test_limit_keeps_newest_entries() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc").with_limit_amount(3));

    for n in 1..=5i64 {
        log.info(n);
    }
    let entries = log.all_default(Severity::Info).await.unwrap();

    assert_eq!(contents(&entries), vec![json!(5), json!(4), json!(3)]);
    assert_eq!(store.trims.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_full_list_stays_at_limit() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc").with_limit_amount(3));
    store.seed("svc:warn", &["c", "b", "a"]);

    log.warn("d").written().await.unwrap();

    assert_eq!(store.len("svc:warn"), 3);
    let entries = log.all_default(Severity::Warn).await.unwrap();
    assert_eq!(entries.last(), Some(&StoredEntry::Raw("b".to_string())));
}

#[tokio::test]
async fn test_no_trim_below_limit() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc").with_limit_amount(3));

    log.info("a");
    log.info("b").written().await.unwrap();

    assert_eq!(store.trims.load(Ordering::SeqCst), 0);
}

// ==================== Error Policy ====================

#[tokio::test]
async fn test_write_failure_is_broadcast_once() {
    let (log, store, console) = store_with(LogStoreConfig::new("svc"));
    store.fail_push.store(true, Ordering::SeqCst);
    let mut errors = log.subscribe_errors();

    let message = log.error("boom");
    assert_eq!(message.kind, Severity::Error);
    message.written().await.unwrap();

    let error = errors.try_recv().unwrap();
    assert_eq!(
        error,
        LogStoreError::Write {
            key: "svc:error".to_string(),
            source: StoreError::Command("OOM command not allowed".to_string()),
        }
    );
    assert!(matches!(errors.try_recv(), Err(TryRecvError::Empty)));

    let reported = console.lines();
    assert_eq!(reported.len(), 2);
    assert_eq!(reported[1].1, Severity::Error);
    assert!(reported[1].2.starts_with("Write to svc:error failed"));
}

#[tokio::test]
async fn test_write_failure_is_returned_when_throwing() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc").with_throw_errors(true));
    store.fail_push.store(true, Ordering::SeqCst);
    let mut errors = log.subscribe_errors();

    let result = log.info("boom").written().await;

    assert!(matches!(result, Err(LogStoreError::Write { .. })));
    assert!(matches!(errors.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_thrown_error_of_dropped_message_is_broadcast() {
    let (log, store, console) = store_with(LogStoreConfig::new("svc").with_throw_errors(true));
    store.fail_push.store(true, Ordering::SeqCst);
    let mut errors = log.subscribe_errors();

    log.info("fire and forget");
    log.all_default(Severity::Debug).await.unwrap();

    let error = errors.try_recv().unwrap();
    assert!(matches!(error, LogStoreError::Write { ref key, .. } if key == "svc:info"));
    assert!(matches!(errors.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(console.lines().len(), 2);
}

#[tokio::test]
async fn test_trim_failure_follows_same_policy() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc").with_limit_amount(1));
    store.fail_trim.store(true, Ordering::SeqCst);
    let mut errors = log.subscribe_errors();

    log.info("a").written().await.unwrap();
    log.info("b").written().await.unwrap();

    let error = errors.try_recv().unwrap();
    assert!(matches!(error, LogStoreError::Trim { ref key, .. } if key == "svc:info"));
    assert!(matches!(errors.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(store.len("svc:info"), 2);
}

#[tokio::test]
async fn test_trim_failure_returned_when_throwing() {
    let config = LogStoreConfig::new("svc")
        .with_limit_amount(1)
        .with_throw_errors(true);
    let (log, store, _) = store_with(config);
    store.fail_trim.store(true, Ordering::SeqCst);

    log.info("a").written().await.unwrap();
    let result = log.info("b").written().await;

    assert!(matches!(result, Err(LogStoreError::Trim { .. })));
}

#[tokio::test]
async fn test_read_failure_propagates() {
    let config = LogStoreConfig::new("svc").with_throw_errors(false);
    let (log, store, _) = store_with(config);
    store.fail_range.store(true, Ordering::SeqCst);

    let result = log.all_default(Severity::Info).await;

    assert!(matches!(result, Err(LogStoreError::Read { ref key, .. }) if key == "svc:info"));
}

#[tokio::test]
async fn test_write_without_subscribers_completes() {
    let (log, store, _) = store_with(LogStoreConfig::new("svc"));
    store.fail_push.store(true, Ordering::SeqCst);

    assert!(log.info("nobody listening").written().await.is_ok());
}

// ==================== Flush and Close ====================

#[tokio::test]
async fn test_flush_empties_every_list() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));
    log.info("a");
    log.error("b");

    assert!(log.flush().await.unwrap());

    for severity in Severity::ALL {
        assert!(log.all_default(severity).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_operations_after_close_fail_with_connection_error() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));
    let mut errors = log.subscribe_errors();

    assert!(log.close().await.unwrap());

    let read = log.all_default(Severity::Info).await.unwrap_err();
    assert!(read.is_connection());

    log.info("late").written().await.unwrap();
    assert!(errors.try_recv().unwrap().is_connection());

    let close = log.close().await.unwrap_err();
    assert_eq!(close, LogStoreError::Close(StoreError::Closed));
}

#[tokio::test]
async fn test_clones_share_the_worker() {
    let (log, _, _) = store_with(LogStoreConfig::new("svc"));
    let other = log.clone();

    other.info("from clone");
    let entries = log.all_default(Severity::Info).await.unwrap();

    assert_eq!(contents(&entries), vec![json!("from clone")]);
}

// ==================== Construction ====================

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let result = LogStore::new(
        Arc::new(MockListStore::default()),
        Arc::new(NoConsole),
        LogStoreConfig::new("svc").with_limit_amount(0),
    );
    assert!(matches!(result, Err(LogStoreError::Config(_))));
}

#[test]
fn test_requires_runtime() {
    let result = LogStore::new(
        Arc::new(MockListStore::default()),
        Arc::new(NoConsole),
        LogStoreConfig::default(),
    );
    assert!(matches!(result, Err(LogStoreError::NoRuntime)));
}

use super::{MessageStore, SledStore};
use crate::broker::message::Message;

use tempfile::{TempDir, tempdir};

fn create_test_store() -> (SledStore, TempDir) {
    let dir = tempdir().unwrap();
    let store = SledStore::open(dir.path().to_str().unwrap(), "messages").unwrap();
    (store, dir)
}

#[test]
fn test_empty_log_returns_empty_vec() {
    let (store, _dir) = create_test_store();
    assert!(store.read_all().unwrap().is_empty());
    assert!(store.is_empty());
}

#[test]
fn test_append_and_read_in_order() {
    let (store, _dir) = create_test_store();
    let first = Message::new("alice", "one");
    let second = Message::new("bob", "two");
    let third = Message::new("alice", "three");

    for msg in [&first, &second, &third] {
        store.append(msg).unwrap();
    }

    let messages = store.read_all().unwrap();
    assert_eq!(messages, vec![first, second, third]);
}

#[test]
fn test_shared_timestamp_keeps_append_order() {
    let (store, _dir) = create_test_store();
    let first = Message::new("alice", "a");
    let mut second = Message::new("alice", "b");
    second.created_at = first.created_at;

    store.append(&first).unwrap();
    store.append(&second).unwrap();

    let texts: Vec<_> = store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn test_malformed_record_is_skipped() {
    let (store, _dir) = create_test_store();
    let good = Message::new("carol", "fine");

    store.append_raw(b"{not json").unwrap();
    store.append(&good).unwrap();
    store.append_raw(br#"{"id":"x"}"#).unwrap();

    let messages = store.read_all().unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(messages, vec![good]);
}

#[test]
fn test_reopen_reads_persisted_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().to_str().unwrap();
    let msg = Message::new("dave", "durable");

    {
        let store = SledStore::open(path, "messages").unwrap();
        store.append(&msg).unwrap();
    }

    let store = SledStore::open(path, "messages").unwrap();
    assert_eq!(store.read_all().unwrap(), vec![msg]);
}

#[test]
fn test_log_keys_are_isolated() {
    let dir = tempdir().unwrap();
    let db = sled::open(dir.path()).unwrap();
    let chat = SledStore::with_db(db.clone(), "chat").unwrap();
    let other = SledStore::with_db(db, "other").unwrap();

    chat.append(&Message::new("erin", "hello")).unwrap();

    assert_eq!(chat.read_all().unwrap().len(), 1);
    assert!(other.read_all().unwrap().is_empty());
    assert_eq!(other.log_key(), "other");
}

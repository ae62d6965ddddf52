use super::*;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("autonet-storage-{}", uuid::Uuid::new_v4()))
}

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_storage_set_get_remove() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get_item("token").unwrap(), None);

    storage.set_item("token", "abc").unwrap();
    assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("abc"));

    storage.remove_item("token").unwrap();
    assert_eq!(storage.get_item("token").unwrap(), None);
    storage.remove_item("token").unwrap();
}

#[test]
fn memory_storage_clones_share_items() {
    let a = MemoryStorage::new();
    let b = a.clone();
    a.set_item("user", "{}").unwrap();
    assert_eq!(b.get_item("user").unwrap().as_deref(), Some("{}"));
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_storage_round_trips_across_instances() {
    let dir = scratch_dir();
    let storage = FileStorage::new(&dir);
    assert_eq!(storage.get_item("token").unwrap(), None);

    storage.set_item("token", "bearer-1").unwrap();
    let reopened = FileStorage::new(&dir);
    assert_eq!(reopened.get_item("token").unwrap().as_deref(), Some("bearer-1"));

    reopened.remove_item("token").unwrap();
    assert_eq!(storage.get_item("token").unwrap(), None);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_storage_remove_missing_key_is_ok() {
    let storage = FileStorage::new(scratch_dir());
    storage.remove_item("user").unwrap();
}

#[test]
fn file_storage_rejects_path_like_keys() {
    let storage = FileStorage::new(scratch_dir());
    let err = storage.set_item("../escape", "x").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert!(storage.get_item("").is_err());
}

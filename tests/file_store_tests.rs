//! Integration tests for the file-backed key-value store.

#![cfg(feature = "file-store")]

use std::path::PathBuf;

use trialview::prelude::*;
use trialview::service::MemoryStudyService;
use trialview::storage::FileStore;

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("trialview-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("store.json")
}

#[tokio::test]
async fn test_values_survive_reopen() {
    let path = temp_path("reopen");
    let store = FileStore::new(&path);
    assert_eq!(store.get("missing").await.unwrap(), None);

    store.set("a", "1".to_string()).await.unwrap();
    store.set("b", "2".to_string()).await.unwrap();
    store.set("a", "3".to_string()).await.unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.get("a").await.unwrap().as_deref(), Some("3"));
    assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[tokio::test]
async fn test_corrupt_file_is_a_store_error() {
    let path = temp_path("corrupt");
    std::fs::write(&path, "not json").unwrap();
    let store = FileStore::new(&path);
    assert!(matches!(store.get("a").await, Err(Error::Store(_))));
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_keep_every_key() {
    let path = temp_path("concurrent");
    let store = FileStore::new(&path);
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.set(&format!("k{i}"), i.to_string()).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    for i in 0..16 {
        assert_eq!(store.get(&format!("k{i}")).await.unwrap(), Some(i.to_string()));
    }
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[tokio::test]
async fn test_objective_names_persist_across_caches() {
    let path = temp_path("names");
    let service = MemoryStudyService::new();
    let id = service.insert_study("s", vec![Direction::Minimize, Direction::Minimize]);
    let names = vec!["loss".to_string(), "latency".to_string()];

    let cache = StudyCache::builder(service.clone())
        .store(FileStore::new(&path))
        .build();
    cache.refresh(id).await.unwrap();
    cache.set_objective_names(id, names.clone()).await.unwrap();

    let reloaded = StudyCache::builder(service)
        .store(FileStore::new(&path))
        .build();
    reloaded.refresh(id).await.unwrap();
    assert_eq!(reloaded.snapshot(id).unwrap().objective_names, names);

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

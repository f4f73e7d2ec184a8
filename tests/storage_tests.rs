use medcare_hms::storage::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
use std::path::PathBuf;
use uuid::Uuid;

fn scratch_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("medcare-test-{}", Uuid::new_v4()))
        .join("session.json")
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_no_token() {
        let store = FileTokenStore::new(scratch_path());
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_token_survives_a_new_store_instance() {
        let path = scratch_path();

        FileTokenStore::new(path.clone())
            .save("abc.def.ghi")
            .await
            .unwrap();

        // A fresh instance stands in for a restarted process.
        let reopened = FileTokenStore::new(path.clone());
        assert_eq!(reopened.load().await.unwrap().as_deref(), Some("abc.def.ghi"));

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[TOKEN_KEY], "abc.def.ghi");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_token() {
        let path = scratch_path();
        let store = FileTokenStore::new(path.clone());

        store.save("first").await.unwrap();
        store.save("second").await.unwrap();
        assert_eq!(store.load().await.unwrap().as_deref(), Some("second"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_remove_deletes_and_is_idempotent() {
        let path = scratch_path();
        let store = FileTokenStore::new(path.clone());

        store.save("tok").await.unwrap();
        store.remove().await.unwrap();
        assert!(!path.exists());
        assert_eq!(store.load().await.unwrap(), None);

        // Removing again is not an error.
        assert!(store.remove().await.is_ok());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = scratch_path();
        let store = FileTokenStore::new(path.clone());

        // Replacing an existing entry must not widen the mode either.
        store.save("first-bearer").await.unwrap();
        store.save("secret-bearer").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & 0o077, 0, "token file mode is {mode:o}");
        assert_eq!(store.load().await.unwrap().as_deref(), Some("secret-bearer"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_empty_token_is_returned_as_stored() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, br#"{"token":""}"#).unwrap();

        let store = FileTokenStore::new(path.clone());
        assert_eq!(store.load().await.unwrap().as_deref(), Some(""));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not json at all").unwrap();

        let store = FileTokenStore::new(path.clone());
        assert!(store.load().await.is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_clones_share_the_slot() {
        let store = MemoryTokenStore::new();
        let handle = store.clone();

        store.save("shared").await.unwrap();
        assert_eq!(handle.peek().as_deref(), Some("shared"));

        store.remove().await.unwrap();
        assert_eq!(handle.peek(), None);
    }

    #[tokio::test]
    async fn test_memory_store_failure() {
        let store = MemoryTokenStore::new_failing();
        assert!(store.load().await.is_err());
        assert!(store.save("x").await.is_err());
        assert!(store.remove().await.is_err());
    }
}

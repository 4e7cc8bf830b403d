use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

pub type Inventory = BTreeMap<String, u32>;
pub type UserMap = BTreeMap<String, UserRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub coins: u64,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub inventory: Inventory,
}

impl UserRecord {
    pub fn new(password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            name: name.into(),
            coins: 0,
            score: 0,
            inventory: Inventory::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found: {0}")]
    NotFound(String),
    #[error("user already exists: {0}")]
    AlreadyExists(String),
    #[error("failed to write user store {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode user store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// In-memory user map mirrored to a single JSON file.
///
/// Every mutation holds the write lock for its whole read-modify-persist
/// sequence, and the in-memory copy only changes once the file write has
/// succeeded.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: RwLock<UserMap>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>, users: UserMap) -> Self {
        Self {
            path: path.into(),
            users: RwLock::new(users),
        }
    }

    /// Missing or unreadable documents start an empty store; the file on
    /// disk is left as it was.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<UserMap>(&bytes) {
                Ok(users) => {
                    tracing::info!(path = %path.display(), count = users.len(), "user store loaded");
                    users
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "user store unparseable, starting empty");
                    UserMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "user store missing, starting empty");
                UserMap::new()
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "user store unreadable, starting empty");
                UserMap::new()
            }
        };

        Self::new(path, users)
    }

    pub async fn get(&self, id: &str) -> Option<UserRecord> {
        self.users.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.users.read().await.contains_key(id)
    }

    pub async fn snapshot(&self) -> UserMap {
        self.users.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Plain-text comparison against the stored password.
    pub async fn authenticate(&self, id: &str, password: &str) -> bool {
        self.users
            .read()
            .await
            .get(id)
            .is_some_and(|record| record.password == password)
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        let users = self.users.read().await;
        write_users(&self.path, &users).await
    }

    pub async fn insert_new(&self, id: &str, record: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }

        users.insert(id.to_string(), record);
        if let Err(err) = write_users(&self.path, &users).await {
            users.remove(id);
            return Err(err);
        }
        Ok(())
    }

    /// Applies `apply` to a copy of the record and commits it once the
    /// whole store has been written back.
    pub async fn update<T, E, F>(&self, id: &str, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut UserRecord) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut users = self.users.write().await;
        let Some(current) = users.get(id) else {
            return Err(StoreError::NotFound(id.to_string()).into());
        };

        let mut record = current.clone();
        let output = apply(&mut record)?;

        let previous = users.insert(id.to_string(), record);
        if let Err(err) = write_users(&self.path, &users).await {
            if let Some(previous) = previous {
                users.insert(id.to_string(), previous);
            }
            return Err(err.into());
        }

        Ok(output)
    }
}

async fn write_users(path: &Path, users: &UserMap) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(users)?;
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

    tracing::debug!(path = %path.display(), count = users.len(), "user store persisted");
    Ok(())
}

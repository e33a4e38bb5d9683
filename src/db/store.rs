//! Typed key-value persistence for user data.
//!
//! Every stored shape has its own [`TypedKey`], so a list of film ids can only
//! be read back as a list of film ids. Values are encoded as JSON. A stored
//! value that does not decode into its key's shape is reported as
//! [`AppError::Storage`] instead of being replaced with a default.

use serde::{de::DeserializeOwned, Serialize};
use std::{fmt::Display, marker::PhantomData, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{FilmId, ListKind},
};

const KEY_PREFIX: &str = "seenit";

/// Every key the application persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    List(ListKind),
    LastSearchQuery,
    LastSearchResults,
    LastSearchSavedAt,
    ProfileFirstName,
    ProfileLastName,
    ProfileEmail,
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreKey::List(kind) => kind.storage_name(),
            StoreKey::LastSearchQuery => "lastSearchQuery",
            StoreKey::LastSearchResults => "lastSearchResults",
            StoreKey::LastSearchSavedAt => "lastSearchSavedAt",
            StoreKey::ProfileFirstName => "firstName",
            StoreKey::ProfileLastName => "lastName",
            StoreKey::ProfileEmail => "email",
        };
        write!(f, "{}:{}", KEY_PREFIX, name)
    }
}

/// Raw string storage backend
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &StoreKey) -> AppResult<Option<String>>;

    async fn set(&self, key: &StoreKey, value: String) -> AppResult<()>;

    async fn delete(&self, key: &StoreKey) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// A [`StoreKey`] bound to the shape stored under it
pub struct TypedKey<T> {
    key: StoreKey,
    _shape: PhantomData<fn() -> T>,
}

impl<T> TypedKey<T> {
    pub const fn new(key: StoreKey) -> Self {
        Self {
            key,
            _shape: PhantomData,
        }
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }
}

pub mod keys {
    use chrono::{DateTime, Utc};

    use super::*;

    pub const fn list(kind: ListKind) -> TypedKey<Vec<FilmId>> {
        TypedKey::new(StoreKey::List(kind))
    }

    pub const LAST_SEARCH_QUERY: TypedKey<String> = TypedKey::new(StoreKey::LastSearchQuery);
    pub const LAST_SEARCH_RESULTS: TypedKey<Vec<FilmId>> =
        TypedKey::new(StoreKey::LastSearchResults);
    pub const LAST_SEARCH_SAVED_AT: TypedKey<DateTime<Utc>> =
        TypedKey::new(StoreKey::LastSearchSavedAt);
    pub const PROFILE_FIRST_NAME: TypedKey<String> = TypedKey::new(StoreKey::ProfileFirstName);
    pub const PROFILE_LAST_NAME: TypedKey<String> = TypedKey::new(StoreKey::ProfileLastName);
    pub const PROFILE_EMAIL: TypedKey<String> = TypedKey::new(StoreKey::ProfileEmail);
}

/// JSON encode/decode layer over a [`KeyValueStore`]
#[derive(Clone)]
pub struct TypedStore {
    backend: Arc<dyn KeyValueStore>,
}

impl TypedStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &TypedKey<T>) -> AppResult<Option<T>> {
        let Some(raw) = self.backend.get(key.key()).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            tracing::error!(
                key = %key.key(),
                backend = self.backend.name(),
                error = %e,
                "Stored value has unexpected shape"
            );
            AppError::Storage(format!("Failed to decode '{}': {}", key.key(), e))
        })
    }

    pub async fn save<T: Serialize>(&self, key: &TypedKey<T>, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| {
            AppError::Storage(format!("Failed to encode '{}': {}", key.key(), e))
        })?;
        self.backend.set(key.key(), raw).await
    }

    pub async fn remove<T>(&self, key: &TypedKey<T>) -> AppResult<()> {
        self.backend.delete(key.key()).await
    }
}

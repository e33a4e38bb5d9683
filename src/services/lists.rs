use crate::{
    db::{keys, TypedStore},
    error::AppResult,
    models::{FilmId, ListKind, ListMembership},
};

/// The user's "want to watch" and "watched" lists
///
/// Lists keep insertion order and never hold an id twice. Each update is a
/// read-modify-write of one key; concurrent writers resolve as last write wins.
#[derive(Clone)]
pub struct LocalListStore {
    store: TypedStore,
}

impl LocalListStore {
    pub fn new(store: TypedStore) -> Self {
        Self { store }
    }

    /// Ids on `list`, oldest first; an unknown key is an empty list
    pub async fn get(&self, list: ListKind) -> AppResult<Vec<FilmId>> {
        Ok(self.store.load(&keys::list(list)).await?.unwrap_or_default())
    }

    /// Appends `id` unless already present; returns whether the list changed
    pub async fn add(&self, list: ListKind, id: FilmId) -> AppResult<bool> {
        let mut ids = self.get(list).await?;
        if ids.contains(&id) {
            return Ok(false);
        }

        ids.push(id);
        self.store.save(&keys::list(list), &ids).await?;

        tracing::info!(list = list.slug(), film_id = %id, size = ids.len(), "Film added to list");
        Ok(true)
    }

    /// Removes `id`; returns whether it was present
    pub async fn remove(&self, list: ListKind, id: FilmId) -> AppResult<bool> {
        let mut ids = self.get(list).await?;
        let before = ids.len();
        ids.retain(|existing| *existing != id);

        if ids.len() == before {
            return Ok(false);
        }

        self.store.save(&keys::list(list), &ids).await?;

        tracing::info!(list = list.slug(), film_id = %id, size = ids.len(), "Film removed from list");
        Ok(true)
    }

    pub async fn contains(&self, list: ListKind, id: FilmId) -> AppResult<bool> {
        Ok(self.get(list).await?.contains(&id))
    }

    pub async fn membership(&self, id: FilmId) -> AppResult<ListMembership> {
        Ok(ListMembership {
            want_to_watch: self.contains(ListKind::WantToWatch, id).await?,
            watched: self.contains(ListKind::Watched, id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{KeyValueStore, MemoryStore, StoreKey};
    use crate::error::AppError;
    use std::sync::Arc;

    fn lists() -> (Arc<MemoryStore>, LocalListStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = LocalListStore::new(TypedStore::new(backend.clone()));
        (backend, store)
    }

    #[tokio::test]
    async fn test_empty_list_by_default() {
        let (_, lists) = lists();
        assert!(lists.get(ListKind::WantToWatch).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_keeps_insertion_order() {
        let (_, lists) = lists();
        for id in [30, 10, 20] {
            assert!(lists.add(ListKind::Watched, FilmId(id)).await.unwrap());
        }

        assert_eq!(
            lists.get(ListKind::Watched).await.unwrap(),
            vec![FilmId(30), FilmId(10), FilmId(20)]
        );
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (_, lists) = lists();
        assert!(lists.add(ListKind::WantToWatch, FilmId(1)).await.unwrap());
        assert!(!lists.add(ListKind::WantToWatch, FilmId(1)).await.unwrap());

        assert_eq!(
            lists.get(ListKind::WantToWatch).await.unwrap(),
            vec![FilmId(1)]
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let (_, lists) = lists();
        lists.add(ListKind::WantToWatch, FilmId(1)).await.unwrap();
        lists.add(ListKind::WantToWatch, FilmId(2)).await.unwrap();

        assert!(lists.remove(ListKind::WantToWatch, FilmId(1)).await.unwrap());
        assert!(!lists.remove(ListKind::WantToWatch, FilmId(1)).await.unwrap());
        assert_eq!(
            lists.get(ListKind::WantToWatch).await.unwrap(),
            vec![FilmId(2)]
        );
    }

    #[tokio::test]
    async fn test_lists_are_independent() {
        let (_, lists) = lists();
        lists.add(ListKind::WantToWatch, FilmId(5)).await.unwrap();

        assert!(lists.contains(ListKind::WantToWatch, FilmId(5)).await.unwrap());
        assert!(!lists.contains(ListKind::Watched, FilmId(5)).await.unwrap());
        assert_eq!(
            lists.membership(FilmId(5)).await.unwrap(),
            ListMembership {
                want_to_watch: true,
                watched: false,
            }
        );
    }

    #[tokio::test]
    async fn test_reads_legacy_tracked_key() {
        let (backend, lists) = lists();
        backend
            .set(&StoreKey::List(ListKind::WantToWatch), "[301,435]".to_string())
            .await
            .unwrap();

        assert_eq!(
            lists.get(ListKind::WantToWatch).await.unwrap(),
            vec![FilmId(301), FilmId(435)]
        );
    }

    #[tokio::test]
    async fn test_corrupt_list_is_an_error() {
        let (backend, lists) = lists();
        backend
            .set(&StoreKey::List(ListKind::Watched), "{\"ids\":1}".to_string())
            .await
            .unwrap();

        let result = lists.add(ListKind::Watched, FilmId(1)).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}

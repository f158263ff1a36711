//! Image record storage.
//!
//! The pipeline and the HTTP layer share one store handle. `MemoryStore` keeps
//! everything in process memory; a persistent backend only has to implement
//! [`ImageStore`].

use crate::error::StoreError;
use crate::types::{ImageRecord, NewImage};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Storage backend for processed images.
///
/// Records are create-only: there is no update or delete.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Assign the next id, store the record and return a copy of it.
    async fn create(&self, image: NewImage) -> Result<ImageRecord, StoreError>;

    /// Look up one record. `Ok(None)` means the id was never assigned.
    async fn get(&self, id: u64) -> Result<Option<ImageRecord>, StoreError>;

    /// Every record, newest (highest id) first.
    async fn list(&self) -> Result<Vec<ImageRecord>, StoreError>;
}

#[derive(Debug)]
struct Inner {
    next_id: u64,
    records: BTreeMap<u64, ImageRecord>,
}

/// Process-lifetime store backed by an ordered map.
///
/// Id assignment and insertion happen under one write lock, so concurrent
/// creates never share an id and readers never see a half-inserted record.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn create(&self, image: NewImage) -> Result<ImageRecord, StoreError> {
        // A poisoned lock still holds a consistent map: every mutation below is
        // a single insert after the id bump.
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let id = inner.next_id;
        inner.next_id += 1;

        let record = ImageRecord {
            id,
            original_image: image.original_image,
            ai_description: image.ai_description,
            generated_image: image.generated_image,
            metadata: image.metadata,
        };
        inner.records.insert(id, record.clone());

        tracing::debug!(id, "Stored image record");
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<ImageRecord>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.records.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ImageRecord>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.records.values().rev().cloned().collect())
    }
}

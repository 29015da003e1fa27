//! The `Record` trait implemented by every entity kept in a store

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// An entity that can be persisted in a [`RecordStore`](crate::store::RecordStore)
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Short name of the entity, used in logs, errors and the on-disk header
    const KIND: &'static str;

    /// Identifier assigned at creation, never changed afterwards
    fn id(&self) -> Uuid;

    /// Whether `self` may not coexist with `other` in the same collection.
    ///
    /// Two records with the same id always conflict; implementors may add
    /// further uniqueness rules.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

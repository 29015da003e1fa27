//! Record store abstraction
//!
//! A record store is an ordered list of records of one kind with linear
//! lookup by identifier. Backends only decide where the list lives and how
//! access to it is serialized; the list manipulation itself is shared and
//! lives in this module.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{StoreError, StoreResult},
    record::Record,
};

/// Durable list-of-records storage
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Append a record to the end of the collection and return it
    async fn append(&self, record: R) -> StoreResult<R>;

    /// Return every record in insertion order
    async fn list_all(&self) -> StoreResult<Vec<R>>;

    /// Return the record with the given identifier
    async fn find_by_id(&self, id: Uuid) -> StoreResult<R>;

    /// Replace the record with the given identifier in place and return the
    /// record that was replaced
    async fn replace(&self, id: Uuid, record: R) -> StoreResult<R>;

    /// Remove the record with the given identifier and return it
    async fn remove(&self, id: Uuid) -> StoreResult<R>;

    /// Return the first record matching `predicate`, if any
    async fn find_first(
        &self,
        predicate: &(dyn for<'r> Fn(&'r R) -> bool + Send + Sync),
    ) -> StoreResult<Option<R>> {
        Ok(self.list_all().await?.into_iter().find(|r| predicate(r)))
    }
}

pub(crate) fn position<R: Record>(records: &[R], id: Uuid) -> StoreResult<usize> {
    records
        .iter()
        .position(|r| r.id() == id)
        .ok_or(StoreError::NotFound { kind: R::KIND, id })
}

pub(crate) fn find<R: Record>(records: &[R], id: Uuid) -> StoreResult<R> {
    let index = position(records, id)?;
    Ok(records[index].clone())
}

pub(crate) fn append<R: Record>(records: &mut Vec<R>, record: R) -> StoreResult<R> {
    if let Some(existing) = records.iter().find(|r| record.conflicts_with(r)) {
        return Err(StoreError::Conflict {
            kind: R::KIND,
            message: format!("clashes with existing record {}", existing.id()),
        });
    }

    records.push(record.clone());
    Ok(record)
}

pub(crate) fn replace<R: Record>(records: &mut [R], id: Uuid, record: R) -> StoreResult<R> {
    let index = position(records, id)?;

    if record.id() != id {
        return Err(StoreError::Conflict {
            kind: R::KIND,
            message: format!("identifier {id} cannot be changed to {}", record.id()),
        });
    }

    let clash = records
        .iter()
        .enumerate()
        .find(|(i, r)| *i != index && record.conflicts_with(r));
    if let Some((_, existing)) = clash {
        return Err(StoreError::Conflict {
            kind: R::KIND,
            message: format!("clashes with existing record {}", existing.id()),
        });
    }

    Ok(std::mem::replace(&mut records[index], record))
}

pub(crate) fn remove<R: Record>(records: &mut Vec<R>, id: Uuid) -> StoreResult<R> {
    let index = position(records, id)?;
    Ok(records.remove(index))
}

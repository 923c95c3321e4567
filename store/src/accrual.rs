use crate::StoreError;
use ubi_types::{Address, PolicyId};

/// Store trait for persisting accrual engine state to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `ubi-accrual`
/// crate (which would create a circular dependency). The engine
/// serializes/deserializes its own types.
pub trait AccrualStore {
    fn put_policy(&self, id: PolicyId, policy: &[u8]) -> Result<(), StoreError>;
    fn iter_policies(&self) -> Result<Vec<(PolicyId, Vec<u8>)>, StoreError>;

    fn put_participant(&self, address: &Address, state: &[u8]) -> Result<(), StoreError>;
    fn iter_participants(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError>;

    fn put_cursor(
        &self,
        address: &Address,
        policy: PolicyId,
        cursor: &[u8],
    ) -> Result<(), StoreError>;
    fn iter_cursors(&self) -> Result<Vec<(Address, PolicyId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}

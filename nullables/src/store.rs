//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use ubi_store::{AccrualStore, StoreError};
use ubi_types::{Address, PolicyId};

/// An in-memory accrual store for testing.
#[derive(Default)]
pub struct NullAccrualStore {
    policies: Mutex<BTreeMap<PolicyId, Vec<u8>>>,
    participants: Mutex<HashMap<Address, Vec<u8>>>,
    cursors: Mutex<HashMap<(Address, PolicyId), Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl NullAccrualStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccrualStore for NullAccrualStore {
    fn put_policy(&self, id: PolicyId, policy: &[u8]) -> Result<(), StoreError> {
        self.policies.lock().unwrap().insert(id, policy.to_vec());
        Ok(())
    }

    fn iter_policies(&self) -> Result<Vec<(PolicyId, Vec<u8>)>, StoreError> {
        Ok(self
            .policies
            .lock()
            .unwrap()
            .iter()
            .map(|(id, bytes)| (*id, bytes.clone()))
            .collect())
    }

    fn put_participant(&self, address: &Address, state: &[u8]) -> Result<(), StoreError> {
        self.participants
            .lock()
            .unwrap()
            .insert(address.clone(), state.to_vec());
        Ok(())
    }

    fn iter_participants(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError> {
        Ok(self
            .participants
            .lock()
            .unwrap()
            .iter()
            .map(|(a, bytes)| (a.clone(), bytes.clone()))
            .collect())
    }

    fn put_cursor(&self, address: &Address, policy: PolicyId, cursor: &[u8]) -> Result<(), StoreError> {
        self.cursors
            .lock()
            .unwrap()
            .insert((address.clone(), policy), cursor.to_vec());
        Ok(())
    }

    fn iter_cursors(&self) -> Result<Vec<(Address, PolicyId, Vec<u8>)>, StoreError> {
        Ok(self
            .cursors
            .lock()
            .unwrap()
            .iter()
            .map(|((a, id), bytes)| (a.clone(), *id, bytes.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}

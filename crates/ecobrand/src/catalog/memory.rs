//! In-process repository adapters used by the API server and tests.

use std::sync::{Arc, Mutex};

use super::domain::{ProductId, ProductRecord, SearchRecord, UserId};
use super::repository::{ProductRepository, RepositoryError, SearchHistory};

/// Products kept in insertion order; listings are served newest first.
#[derive(Default, Clone)]
pub struct InMemoryProductRepository {
    records: Arc<Mutex<Vec<ProductRecord>>>,
}

impl ProductRepository for InMemoryProductRepository {
    fn insert(&self, record: ProductRecord) -> Result<ProductRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: ProductRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|record| &record.id != id);
        Ok(guard.len() != before)
    }

    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().rev().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemorySearchHistory {
    entries: Arc<Mutex<Vec<SearchRecord>>>,
}

impl InMemorySearchHistory {
    pub fn entries(&self) -> Vec<SearchRecord> {
        self.entries.lock().expect("history mutex poisoned").clone()
    }
}

impl SearchHistory for InMemorySearchHistory {
    fn record(&self, entry: SearchRecord) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .expect("history mutex poisoned")
            .push(entry);
        Ok(())
    }

    fn recent(&self, user: &UserId, limit: usize) -> Result<Vec<SearchRecord>, RepositoryError> {
        let guard = self.entries.lock().expect("history mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|entry| entry.user_id.as_ref() == Some(user))
            .take(limit)
            .cloned()
            .collect())
    }
}

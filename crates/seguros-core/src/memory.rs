//! # In-Memory Store
//!
//! [`MemoryStore`] implements [`InsuredRepository`] over an ordered map
//! guarded by a `parking_lot::RwLock`. Ids come from a monotonically
//! increasing counter starting at 1, so map order is creation order.
//!
//! Email and phone uniqueness is re-checked under the write lock on every
//! insert and replace, so two racing creates with the same email cannot both
//! be stored even if both passed the validator's pre-check.
//!
//! The lock is never held across an `.await`.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::model::{InsuredDraft, InsuredId, InsuredPerson};
use crate::repository::{InsuredRepository, UniqueField};

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<InsuredId, InsuredPerson>,
}

impl Table {
    fn holder_of(&self, field: UniqueField, value: &str, exclude: Option<InsuredId>) -> bool {
        self.rows.values().any(|row| {
            Some(row.id) != exclude
                && match field {
                    UniqueField::Email => row.email == value,
                    UniqueField::PhoneNumber => row.phone_number == value,
                }
        })
    }

    fn ensure_unique(&self, draft: &InsuredDraft, exclude: Option<InsuredId>) -> Result<(), StoreError> {
        for field in [UniqueField::Email, UniqueField::PhoneNumber] {
            let value = field.value_of(draft);
            if self.holder_of(field, value, exclude) {
                return Err(StoreError::Duplicate {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Thread-safe, cloneable in-memory insured store.
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<RwLock<Table>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InsuredRepository for MemoryStore {
    async fn find_by_id(&self, id: InsuredId) -> Result<Option<InsuredPerson>, StoreError> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<InsuredPerson>, StoreError> {
        Ok(self.table.read().rows.values().cloned().collect())
    }

    async fn exists_with(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<InsuredId>,
    ) -> Result<bool, StoreError> {
        Ok(self.table.read().holder_of(field, value, exclude))
    }

    async fn insert(&self, draft: &InsuredDraft) -> Result<InsuredPerson, StoreError> {
        let mut table = self.table.write();
        table.ensure_unique(draft, None)?;
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("insured id space exhausted".to_string()))?;
        let id = InsuredId::new(next);
        let record = InsuredPerson::from_draft(id, draft.clone());
        table.last_id = next;
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn replace_fields(
        &self,
        id: InsuredId,
        draft: &InsuredDraft,
    ) -> Result<InsuredPerson, StoreError> {
        let mut table = self.table.write();
        if !table.rows.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        table.ensure_unique(draft, Some(id))?;
        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.replace_fields(draft.clone());
        Ok(row.clone())
    }

    async fn remove(&self, id: InsuredId) -> Result<(), StoreError> {
        self.table
            .write()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(email: &str, phone: &str) -> InsuredDraft {
        InsuredDraft {
            first_name: "Ana".into(),
            last_name: "Lopez".into(),
            second_last_name: "Garcia".into(),
            phone_number: phone.into(),
            email: email.into(),
            birth_date: "1990-01-01".into(),
            estimated_value: 1000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = MemoryStore::new();
        let a = store.insert(&draft("a@x.com", "1")).await.unwrap();
        let b = store.insert(&draft("b@x.com", "2")).await.unwrap();
        assert_eq!(a.id, InsuredId::new(1));
        assert_eq!(b.id, InsuredId::new(2));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_remove() {
        let store = MemoryStore::new();
        let a = store.insert(&draft("a@x.com", "1")).await.unwrap();
        store.remove(a.id).await.unwrap();
        let b = store.insert(&draft("b@x.com", "2")).await.unwrap();
        assert_eq!(b.id, InsuredId::new(2));
    }

    #[tokio::test]
    async fn find_all_is_creation_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert(&draft(&format!("{i}@x.com"), &i.to_string()))
                .await
                .unwrap();
        }
        let ids: Vec<i32> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email_without_validator() {
        let store = MemoryStore::new();
        store.insert(&draft("a@x.com", "1")).await.unwrap();
        let err = store.insert(&draft("a@x.com", "2")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate { field: UniqueField::Email, ref value } if value == "a@x.com"
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_phone_without_validator() {
        let store = MemoryStore::new();
        store.insert(&draft("a@x.com", "1")).await.unwrap();
        let err = store.insert(&draft("b@x.com", "1")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate { field: UniqueField::PhoneNumber, .. }
        ));
    }

    #[tokio::test]
    async fn exists_with_honours_exclusion() {
        let store = MemoryStore::new();
        let a = store.insert(&draft("a@x.com", "1")).await.unwrap();
        assert!(store.exists_with(UniqueField::Email, "a@x.com", None).await.unwrap());
        assert!(!store
            .exists_with(UniqueField::Email, "a@x.com", Some(a.id))
            .await
            .unwrap());
        assert!(!store.exists_with(UniqueField::PhoneNumber, "9", None).await.unwrap());
    }

    #[tokio::test]
    async fn replace_keeps_own_values_but_rejects_others() {
        let store = MemoryStore::new();
        let a = store.insert(&draft("a@x.com", "1")).await.unwrap();
        store.insert(&draft("b@x.com", "2")).await.unwrap();

        let mut same = draft("a@x.com", "1");
        same.estimated_value = 2000;
        let updated = store.replace_fields(a.id, &same).await.unwrap();
        assert_eq!(updated.estimated_value, 2000);

        let err = store
            .replace_fields(a.id, &draft("b@x.com", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: UniqueField::Email, .. }));
    }

    #[tokio::test]
    async fn replace_and_remove_missing_record() {
        let store = MemoryStore::new();
        let missing = InsuredId::new(42);
        assert!(matches!(
            store.replace_fields(missing, &draft("a@x.com", "1")).await,
            Err(StoreError::NotFound(id)) if id == missing
        ));
        assert!(matches!(store.remove(missing).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.insert(&draft("a@x.com", "1")).await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}

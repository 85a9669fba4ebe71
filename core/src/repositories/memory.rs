//! In-memory store used by tests and database-less development

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Entity;
use crate::errors::{DomainError, DomainResult};
use crate::query::QueryPlan;

use super::entity::Repository;

/// Vector-backed store; clones share the same rows
pub struct InMemoryRepository<E> {
    rows: Arc<RwLock<Vec<E>>>,
}

impl<E> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seeds rows without validation or unique checks
    pub async fn seed(&self, entities: impl IntoIterator<Item = E>) {
        self.rows.write().await.extend(entities);
    }

    /// Number of stored rows, hidden ones included
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Visible rows matching `predicate`
    pub(crate) async fn find_visible(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|row| !row.is_hidden() && predicate(row))
            .cloned()
            .collect()
    }

    /// Applies `change` to the row with `id`, hidden or not
    pub(crate) async fn modify(&self, id: Uuid, change: impl FnOnce(&mut E)) -> bool {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                change(row);
                true
            }
            None => false,
        }
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_unique<E: Entity>(rows: &[E], candidate: &E) -> DomainResult<()> {
    for key in candidate.unique_keys() {
        let taken = rows
            .iter()
            .filter(|row| row.id() != candidate.id())
            .any(|row| row.unique_keys().contains(&key));
        if taken {
            return Err(DomainError::Duplicate {
                field: key.field.to_string(),
                value: key.value,
            });
        }
    }
    Ok(())
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn insert(&self, entity: &E) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        check_unique(&rows, entity)?;
        rows.push(entity.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<E>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|row| row.id() == id && !row.is_hidden())
            .cloned())
    }

    async fn find_many(&self, plan: &QueryPlan) -> DomainResult<Vec<E>> {
        let rows = self.rows.read().await;
        let candidates = rows
            .iter()
            .filter(|row| !row.is_hidden())
            .map(|row| (row.clone(), row.to_document()))
            .collect();
        Ok(plan.select(candidates))
    }

    async fn update(&self, entity: &E) -> DomainResult<bool> {
        let mut rows = self.rows.write().await;
        check_unique(&rows, entity)?;
        match rows.iter_mut().find(|row| row.id() == entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() != before)
    }
}

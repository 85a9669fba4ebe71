use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::Entity;
use crate::errors::{DomainError, DomainResult};
use crate::query::{Predicate, Projection, QueryFeatures, QueryParams};
use crate::repositories::Repository;

/// Result of a list read: the rows plus the projection requested for them
#[derive(Debug, Clone)]
pub struct Listing<E> {
    pub items: Vec<E>,
    pub projection: Projection,
}

impl<E: Entity> Listing<E> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialized, projected rows
    pub fn documents(&self) -> Vec<Value> {
        self.documents_with(Entity::to_document)
    }

    /// Like [`documents`](Self::documents) with a custom serializer (population)
    pub fn documents_with(&self, render: impl Fn(&E) -> Value) -> Vec<Value> {
        self.items
            .iter()
            .map(|item| self.projection.apply(render(item)))
            .collect()
    }
}

/// CRUD factory over any entity and its repository
pub struct CrudService<E, R: ?Sized> {
    repository: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R: ?Sized> Clone for CrudService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            _entity: PhantomData,
        }
    }
}

impl<E, R> CrudService<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn not_found() -> DomainError {
        DomainError::not_found(E::schema().resource)
    }

    /// Validates and persists a new entity
    pub async fn create(&self, input: E::Input) -> DomainResult<E> {
        let entity = E::from_input(input)?;
        self.repository.insert(&entity).await?;
        info!(resource = E::schema().resource, id = %entity.id(), "created");
        Ok(entity)
    }

    pub async fn get_one(&self, id: Uuid) -> DomainResult<E> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(Self::not_found)
    }

    /// Filtered, sorted, projected and paginated list.
    ///
    /// `base` restricts the read before the request parameters apply
    /// (for example the tour of a nested review route).
    pub async fn get_all(
        &self,
        params: &QueryParams,
        base: Option<Predicate>,
    ) -> DomainResult<Listing<E>> {
        let mut features = QueryFeatures::new(E::schema(), params);
        if let Some(predicate) = base {
            features = features.with_base(predicate);
        }
        let plan = features.filter()?.sort().limit_fields().paginate().build();
        debug!(resource = E::schema().resource, ?plan, "listing");

        let items = self.repository.find_many(&plan).await?;
        Ok(Listing {
            items,
            projection: plan.projection,
        })
    }

    /// Applies a partial update, re-validates and bumps the version
    pub async fn update_one(&self, id: Uuid, patch: E::Patch) -> DomainResult<E> {
        let mut entity = self.get_one(id).await?;
        entity.apply_patch(patch)?;
        entity.touch();

        if !self.repository.update(&entity).await? {
            return Err(Self::not_found());
        }
        info!(resource = E::schema().resource, %id, "updated");
        Ok(entity)
    }

    pub async fn delete_one(&self, id: Uuid) -> DomainResult<()> {
        if !self.repository.delete(id).await? {
            return Err(Self::not_found());
        }
        info!(resource = E::schema().resource, %id, "deleted");
        Ok(())
    }
}

//! Movement type catalog repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use kardex_core::catalog::{CatalogError, MovementDirection, MovementType, StockEffect};
use kardex_shared::types::{MovementTypeId, PageRequest, PageResponse};

use super::convert::{direction_to_core, direction_to_db, effect_to_core, effect_to_db};
use crate::entities::{movement_types, movements};

/// Input for creating a user-defined movement type.
#[derive(Debug, Clone)]
pub struct CreateMovementTypeInput {
    /// Unique short code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Direction of goods flow.
    pub direction: MovementDirection,
    /// Balance effect.
    pub effect: StockEffect,
    /// Whether a source location is required.
    pub requires_source: bool,
    /// Whether a destination location is required.
    pub requires_destination: bool,
}

/// Input for updating a user-defined movement type.
///
/// Direction and effect are fixed at creation; changing them would
/// reinterpret the history of movements already recorded under the type.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovementTypeInput {
    /// New name.
    pub name: Option<String>,
    /// Activate or deactivate the type.
    pub is_active: Option<bool>,
}

/// Repository for the movement type catalog.
#[derive(Debug, Clone)]
pub struct MovementTypeRepository {
    db: DatabaseConnection,
}

impl MovementTypeRepository {
    /// Creates a new movement type repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists movement types, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        include_inactive: bool,
        page: PageRequest,
    ) -> Result<PageResponse<movement_types::Model>, CatalogError> {
        let mut query = movement_types::Entity::find();
        if !include_inactive {
            query = query.filter(movement_types::Column::IsActive.eq(true));
        }
        let query = query.order_by_asc(movement_types::Column::Code);

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let data = query
            .paginate(&self.db, page.limit())
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Fetches a movement type by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TypeNotFound` if no record exists.
    pub async fn get(&self, id: MovementTypeId) -> Result<movement_types::Model, CatalogError> {
        movement_types::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?
            .ok_or(CatalogError::TypeNotFound(id))
    }

    /// Fetches a movement type by its unique code.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CodeNotFound` if no record exists.
    pub async fn get_by_code(&self, code: &str) -> Result<movement_types::Model, CatalogError> {
        movement_types::Entity::find()
            .filter(movement_types::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?
            .ok_or_else(|| CatalogError::CodeNotFound(code.to_string()))
    }

    /// Creates a user-defined movement type.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag combination is invalid or the code is
    /// already taken.
    pub async fn create(
        &self,
        input: CreateMovementTypeInput,
    ) -> Result<movement_types::Model, CatalogError> {
        let record = MovementType {
            id: MovementTypeId::new(),
            code: input.code.clone(),
            name: input.name.clone(),
            direction: input.direction,
            effect: input.effect,
            requires_source: input.requires_source,
            requires_destination: input.requires_destination,
            is_system: false,
            is_active: true,
        };
        record.validate()?;

        let existing = movement_types::Entity::find()
            .filter(movement_types::Column::Code.eq(&input.code))
            .count(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        if existing > 0 {
            return Err(CatalogError::DuplicateCode(input.code));
        }

        let now = Utc::now().into();
        let active = movement_types::ActiveModel {
            id: Set(record.id.into_inner()),
            code: Set(record.code),
            name: Set(record.name),
            direction: Set(direction_to_db(record.direction)),
            effect: Set(effect_to_db(record.effect)),
            requires_source: Set(record.requires_source),
            requires_destination: Set(record.requires_destination),
            is_system: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active
            .insert(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))
    }

    /// Updates a user-defined movement type.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ImmutableType` for system types.
    pub async fn update(
        &self,
        id: MovementTypeId,
        input: UpdateMovementTypeInput,
    ) -> Result<movement_types::Model, CatalogError> {
        let model = self.get(id).await?;
        if model.is_system {
            return Err(CatalogError::ImmutableType(model.code));
        }

        let mut active: movement_types::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))
    }

    /// Deletes a user-defined movement type.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ImmutableType` for system types and
    /// `CatalogError::TypeInUse` when movements reference the type.
    pub async fn delete(&self, id: MovementTypeId) -> Result<(), CatalogError> {
        let model = self.get(id).await?;
        if model.is_system {
            return Err(CatalogError::ImmutableType(model.code));
        }

        let movement_count = movements::Entity::find()
            .filter(movements::Column::MovementTypeId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        if movement_count > 0 {
            return Err(CatalogError::TypeInUse {
                code: model.code,
                movement_count,
            });
        }

        model
            .delete(&self.db)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(())
    }

    /// Resolves a stored record into the core domain type.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TypeNotFound` if no record exists.
    pub async fn resolve(&self, id: MovementTypeId) -> Result<MovementType, CatalogError> {
        let model = self.get(id).await?;
        Ok(model_to_core(&model))
    }
}

/// Converts a stored movement type row into the core domain type.
#[must_use]
pub fn model_to_core(model: &movement_types::Model) -> MovementType {
    MovementType {
        id: MovementTypeId::from_uuid(model.id),
        code: model.code.clone(),
        name: model.name.clone(),
        direction: direction_to_core(&model.direction),
        effect: effect_to_core(&model.effect),
        requires_source: model.requires_source,
        requires_destination: model.requires_destination,
        is_system: model.is_system,
        is_active: model.is_active,
    }
}

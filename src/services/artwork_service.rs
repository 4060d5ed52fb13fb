use crate::api::error::AppError;
use crate::entities::{artworks, prelude::*};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

/// Price applied when a new artwork is created without one
pub const DEFAULT_PRICE: f64 = 2999.99;

/// Fields accepted when creating an artwork. Media URLs reference files
/// already persisted by the storage service.
#[derive(Debug, Default)]
pub struct NewArtwork {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub sketch_url: Option<String>,
    pub for_sale: bool,
    pub is_sold: bool,
    pub price: Option<f64>,
}

/// Partial update. `None` means "leave unchanged"; only provided fields
/// overwrite the stored record.
#[derive(Debug, Default)]
pub struct ArtworkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub sketch_url: Option<String>,
    pub for_sale: Option<bool>,
    pub is_sold: Option<bool>,
    pub price: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ListFilter {
    /// Include soft-deleted records alongside active ones
    pub include_deleted: bool,
    /// Return exclusively soft-deleted records (wins over include_deleted)
    pub only_deleted: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Persistent store of artwork records. Every operation touches exactly
/// one row; the database's per-statement atomicity is the only
/// concurrency control.
pub struct ArtworkService {
    db: DatabaseConnection,
}

impl ArtworkService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn ensure_well_formed(id: &str) -> Result<(), AppError> {
        Uuid::parse_str(id)
            .map(|_| ())
            .map_err(|_| AppError::InvalidId(format!("'{}' is not a valid artwork id", id)))
    }

    fn ensure_positive_price(price: f64) -> Result<(), AppError> {
        if price <= 0.0 || !price.is_finite() {
            return Err(AppError::Validation(
                "Price must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create(&self, input: NewArtwork) -> Result<artworks::Model, AppError> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if input.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        let sketch_url = input
            .sketch_url
            .ok_or_else(|| AppError::Validation("A sketch file is required".to_string()))?;

        let price = input.price.unwrap_or(DEFAULT_PRICE);
        Self::ensure_positive_price(price)?;

        let now = Utc::now();
        let artwork = artworks::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(input.title),
            description: Set(input.description),
            image_url: Set(input.image_url),
            video_url: Set(input.video_url),
            sketch_url: Set(sketch_url),
            for_sale: Set(input.for_sale),
            is_sold: Set(input.is_sold),
            price: Set(price),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(artwork.insert(&self.db).await?)
    }

    pub async fn get(&self, id: &str, include_deleted: bool) -> Result<artworks::Model, AppError> {
        Self::ensure_well_formed(id)?;

        let artwork = Artworks::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Sketch not found".to_string()))?;

        if artwork.is_deleted && !include_deleted {
            return Err(AppError::NotFound("Sketch not found".to_string()));
        }

        Ok(artwork)
    }

    pub async fn list(&self, filter: ListFilter) -> Result<Vec<artworks::Model>, AppError> {
        let mut cond = Condition::all();
        if filter.only_deleted {
            cond = cond.add(artworks::Column::IsDeleted.eq(true));
        } else if !filter.include_deleted {
            cond = cond.add(artworks::Column::IsDeleted.eq(false));
        }

        let mut select = Artworks::find()
            .filter(cond)
            .order_by_asc(artworks::Column::CreatedAt)
            .order_by_asc(artworks::Column::Id);

        if let Some(limit) = filter.limit {
            select = select.limit(limit);
        }
        if let Some(offset) = filter.offset {
            select = select.offset(offset);
        }

        Ok(select.all(&self.db).await?)
    }

    pub async fn update(&self, id: &str, patch: ArtworkPatch) -> Result<artworks::Model, AppError> {
        Self::ensure_well_formed(id)?;

        let existing = Artworks::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Sketch not found".to_string()))?;

        let mut active = existing.into_active_model();

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Title cannot be empty".to_string()));
            }
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            if description.trim().is_empty() {
                return Err(AppError::Validation(
                    "Description cannot be empty".to_string(),
                ));
            }
            active.description = Set(description);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(video_url) = patch.video_url {
            active.video_url = Set(Some(video_url));
        }
        if let Some(sketch_url) = patch.sketch_url {
            active.sketch_url = Set(sketch_url);
        }
        if let Some(for_sale) = patch.for_sale {
            active.for_sale = Set(for_sale);
        }
        if let Some(is_sold) = patch.is_sold {
            active.is_sold = Set(is_sold);
        }
        if let Some(price) = patch.price {
            Self::ensure_positive_price(price)?;
            active.price = Set(price);
        }

        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    pub async fn soft_delete(&self, id: &str) -> Result<(), AppError> {
        Self::ensure_well_formed(id)?;

        let existing = Artworks::find_by_id(id).one(&self.db).await?;
        let Some(existing) = existing.filter(|a| !a.is_deleted) else {
            return Err(AppError::NotFound(
                "Sketch not found or already deleted".to_string(),
            ));
        };

        let now = Utc::now();
        let mut active = existing.into_active_model();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        Ok(())
    }

    pub async fn restore(&self, id: &str) -> Result<(), AppError> {
        Self::ensure_well_formed(id)?;

        let existing = Artworks::find_by_id(id).one(&self.db).await?;
        let Some(existing) = existing.filter(|a| a.is_deleted) else {
            return Err(AppError::NotFound(
                "Sketch not found or not deleted".to_string(),
            ));
        };

        let mut active = existing.into_active_model();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Removes the row regardless of soft-delete state. Referenced files
    /// stay on disk; the record owns the reference, not the bytes.
    pub async fn hard_delete(&self, id: &str) -> Result<(), AppError> {
        Self::ensure_well_formed(id)?;

        let result = Artworks::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Sketch not found".to_string()));
        }

        Ok(())
    }
}

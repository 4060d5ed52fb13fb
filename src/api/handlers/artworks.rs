use crate::api::error::AppError;
use crate::entities::artworks;
use crate::services::artwork_service::{ArtworkPatch, ListFilter, NewArtwork};
use crate::services::storage::MediaCategory;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ArtworkResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub sketch_url: String,
    pub for_sale: bool,
    pub is_sold: bool,
    pub price: f64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<artworks::Model> for ArtworkResponse {
    fn from(model: artworks::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            image_url: model.image_url,
            video_url: model.video_url,
            sketch_url: model.sketch_url,
            for_sale: model.for_sale,
            is_sold: model.is_sold,
            price: model.price,
            is_deleted: model.is_deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ArtworkListResponse {
    pub status: u16,
    pub message: String,
    pub sketches: Vec<ArtworkResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct ArtworkItemResponse {
    pub status: u16,
    pub message: String,
    pub sketch: ArtworkResponse,
}

#[derive(Serialize, ToSchema)]
pub struct CreateArtworkResponse {
    pub status: u16,
    pub message: String,
    pub inserted_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default)]
    pub only_deleted: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize)]
pub struct GetQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

fn parse_bool(text: &str) -> Result<bool, AppError> {
    match text.to_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" | "" => Ok(false),
        other => Err(AppError::Validation(format!(
            "'{}' is not a valid boolean",
            other
        ))),
    }
}

fn parse_price(text: &str) -> Result<f64, AppError> {
    text.trim()
        .parse()
        .map_err(|_| AppError::Validation("Price must be a number".to_string()))
}

/// Collected multipart form: text fields plus the public paths of any
/// files already persisted by the storage service.
#[derive(Default)]
struct ArtworkForm {
    title: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    video_url: Option<String>,
    sketch_url: Option<String>,
    for_sale: Option<bool>,
    is_sold: Option<bool>,
    price: Option<f64>,
}

/// Drains the multipart stream, persisting file fields as it goes.
/// Files are stored before the record exists; a later failure leaves
/// them on disk (accepted, see DESIGN.md).
async fn read_artwork_form(
    state: &crate::AppState,
    multipart: &mut Multipart,
) -> Result<ArtworkForm, AppError> {
    let mut form = ArtworkForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => {
                form.title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            "description" => {
                form.description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            "for_sale" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                form.for_sale = Some(parse_bool(&text)?);
            }
            "is_sold" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                form.is_sold = Some(parse_bool(&text)?);
            }
            "price" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                if !text.trim().is_empty() {
                    form.price = Some(parse_price(&text)?);
                }
            }
            "image" | "video" | "sketch" => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                // Browsers send an empty file part for untouched inputs
                if original_name.is_empty() {
                    continue;
                }

                let category = match name.as_str() {
                    "image" => MediaCategory::Images,
                    "video" => MediaCategory::Videos,
                    _ => MediaCategory::Sketches,
                };

                let reader = StreamReader::new(field.map_err(std::io::Error::other));
                let stored = state
                    .storage
                    .store(category, &original_name, Box::new(reader))
                    .await?;

                match category {
                    MediaCategory::Images => form.image_url = Some(stored.public_path),
                    MediaCategory::Videos => form.video_url = Some(stored.public_path),
                    MediaCategory::Sketches => form.sketch_url = Some(stored.public_path),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

#[utoipa::path(
    get,
    path = "/artist/",
    params(
        ("include_deleted" = Option<bool>, Query, description = "Include soft-deleted sketches"),
        ("only_deleted" = Option<bool>, Query, description = "Return exclusively soft-deleted sketches"),
        ("limit" = Option<u64>, Query, description = "Page size"),
        ("offset" = Option<u64>, Query, description = "Number of sketches to skip")
    ),
    responses(
        (status = 200, description = "All sketches fetched successfully", body = ArtworkListResponse)
    ),
    tag = "artist"
)]
pub async fn list_artworks(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ArtworkListResponse>, AppError> {
    let sketches = state
        .artworks
        .list(ListFilter {
            include_deleted: query.include_deleted,
            only_deleted: query.only_deleted,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(Json(ArtworkListResponse {
        status: 200,
        message: "All Sketches Fetched Successfully".to_string(),
        sketches: sketches.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/artist/{id}",
    params(
        ("id" = String, Path, description = "Artwork identifier"),
        ("include_deleted" = Option<bool>, Query, description = "Allow fetching a soft-deleted sketch")
    ),
    responses(
        (status = 200, description = "Sketch fetched successfully", body = ArtworkItemResponse),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Sketch not found")
    ),
    tag = "artist"
)]
pub async fn get_artwork(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<ArtworkItemResponse>, AppError> {
    let sketch = state.artworks.get(&id, query.include_deleted).await?;

    Ok(Json(ArtworkItemResponse {
        status: 200,
        message: "Sketch Fetched Successfully".to_string(),
        sketch: sketch.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/artist/",
    request_body(content = String, description = "Multipart form: title, description, for_sale, is_sold, price, files image/video/sketch (sketch required)", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Sketch created successfully", body = CreateArtworkResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = [])),
    tag = "artist"
)]
pub async fn create_artwork(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateArtworkResponse>), AppError> {
    let form = read_artwork_form(&state, &mut multipart).await?;

    let created = state
        .artworks
        .create(NewArtwork {
            title: form.title.unwrap_or_default(),
            description: form.description.unwrap_or_default(),
            image_url: form.image_url,
            video_url: form.video_url,
            sketch_url: form.sketch_url,
            for_sale: form.for_sale.unwrap_or(false),
            is_sold: form.is_sold.unwrap_or(false),
            price: form.price,
        })
        .await?;

    tracing::info!("Created sketch {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateArtworkResponse {
            status: 201,
            message: "Sketch created successfully".to_string(),
            inserted_id: created.id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/artist/{id}",
    params(("id" = String, Path, description = "Artwork identifier")),
    request_body(content = String, description = "Multipart form: any subset of the create fields/files", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Sketch updated successfully", body = ArtworkItemResponse),
        (status = 400, description = "Malformed identifier or invalid field"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sketch not found")
    ),
    security(("bearer" = [])),
    tag = "artist"
)]
pub async fn update_artwork(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ArtworkItemResponse>, AppError> {
    let form = read_artwork_form(&state, &mut multipart).await?;

    let updated = state
        .artworks
        .update(
            &id,
            ArtworkPatch {
                title: form.title,
                description: form.description,
                image_url: form.image_url,
                video_url: form.video_url,
                sketch_url: form.sketch_url,
                for_sale: form.for_sale,
                is_sold: form.is_sold,
                price: form.price,
            },
        )
        .await?;

    Ok(Json(ArtworkItemResponse {
        status: 200,
        message: "Sketch updated successfully".to_string(),
        sketch: updated.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/artist/{id}",
    params(("id" = String, Path, description = "Artwork identifier")),
    responses(
        (status = 200, description = "Sketch soft-deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sketch not found or already deleted")
    ),
    security(("bearer" = [])),
    tag = "artist"
)]
pub async fn delete_artwork(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.artworks.soft_delete(&id).await?;

    Ok(Json(MessageResponse {
        status: 200,
        message: "Sketch deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/artist/{id}/hard",
    params(("id" = String, Path, description = "Artwork identifier")),
    responses(
        (status = 200, description = "Sketch permanently deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sketch not found")
    ),
    security(("bearer" = [])),
    tag = "artist"
)]
pub async fn destroy_artwork(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.artworks.hard_delete(&id).await?;

    Ok(Json(MessageResponse {
        status: 200,
        message: "Sketch permanently deleted".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/artist/{id}/restore",
    params(("id" = String, Path, description = "Artwork identifier")),
    responses(
        (status = 200, description = "Sketch restored", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Sketch not found or not deleted")
    ),
    security(("bearer" = [])),
    tag = "artist"
)]
pub async fn restore_artwork(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.artworks.restore(&id).await?;

    Ok(Json(MessageResponse {
        status: 200,
        message: "Sketch restored successfully".to_string(),
    }))
}

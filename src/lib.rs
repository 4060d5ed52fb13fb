pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::artwork_service::ArtworkService;
use crate::services::auth_service::AuthService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::artworks::list_artworks,
        api::handlers::artworks::get_artwork,
        api::handlers::artworks::create_artwork,
        api::handlers::artworks::update_artwork,
        api::handlers::artworks::delete_artwork,
        api::handlers::artworks::destroy_artwork,
        api::handlers::artworks::restore_artwork,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::dashboard,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::artworks::ArtworkResponse,
            api::handlers::artworks::ArtworkListResponse,
            api::handlers::artworks::ArtworkItemResponse,
            api::handlers::artworks::CreateArtworkResponse,
            api::handlers::artworks::MessageResponse,
            api::handlers::auth::LoginRequest,
            api::handlers::auth::TokenResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "artist", description = "Artwork portfolio endpoints"),
        (name = "auth", description = "Admin authentication endpoints"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub artworks: Arc<ArtworkService>,
    pub auth: Arc<AuthService>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    // Mutating artwork routes and the dashboard sit behind the admin
    // gate; listing, fetching and login stay public.
    let admin_routes = Router::new()
        .route("/artist/", post(api::handlers::artworks::create_artwork))
        .route(
            "/artist/:id",
            put(api::handlers::artworks::update_artwork)
                .delete(api::handlers::artworks::delete_artwork),
        )
        .route(
            "/artist/:id/hard",
            delete(api::handlers::artworks::destroy_artwork),
        )
        .route(
            "/artist/:id/restore",
            post(api::handlers::artworks::restore_artwork),
        )
        .route("/auth/dashboard", get(api::handlers::auth::dashboard))
        .route_layer(from_fn_with_state(
            state.clone(),
            api::middleware::auth::auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/artist/", get(api::handlers::artworks::list_artworks))
        .route("/artist/:id", get(api::handlers::artworks::get_artwork))
        .route("/auth/token", post(api::handlers::auth::login))
        .route("/auth/logout", post(api::handlers::auth::logout))
        .route("/health", get(api::handlers::health::health_check));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(admin_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_upload_size + 10 * 1024 * 1024, // multipart overhead buffer
        ))
        .with_state(state)
}

use portfolio_backend::api::error::AppError;
use portfolio_backend::infrastructure::database::run_migrations;
use portfolio_backend::services::artwork_service::{
    ArtworkPatch, ArtworkService, DEFAULT_PRICE, ListFilter, NewArtwork,
};
use sea_orm::{ConnectOptions, Database};
use uuid::Uuid;

async fn setup_service() -> ArtworkService {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);
    let db = Database::connect(opt).await.unwrap();
    run_migrations(&db).await.unwrap();
    ArtworkService::new(db)
}

fn sample(title: &str) -> NewArtwork {
    NewArtwork {
        title: title.to_string(),
        description: "Graphite study".to_string(),
        sketch_url: Some("/uploads/sketches/sample.png".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_get_roundtrip() {
    let service = setup_service().await;

    let created = service
        .create(NewArtwork {
            title: "Harbor".to_string(),
            description: "Ink wash".to_string(),
            image_url: Some("/uploads/images/harbor.jpg".to_string()),
            video_url: None,
            sketch_url: Some("/uploads/sketches/harbor.png".to_string()),
            for_sale: true,
            is_sold: false,
            price: Some(350.0),
        })
        .await
        .unwrap();

    assert!(Uuid::parse_str(&created.id).is_ok());

    let fetched = service.get(&created.id, false).await.unwrap();
    assert_eq!(fetched.title, "Harbor");
    assert_eq!(fetched.description, "Ink wash");
    assert_eq!(fetched.image_url.as_deref(), Some("/uploads/images/harbor.jpg"));
    assert_eq!(fetched.video_url, None);
    assert_eq!(fetched.sketch_url, "/uploads/sketches/harbor.png");
    assert!(fetched.for_sale);
    assert!(!fetched.is_sold);
    assert_eq!(fetched.price, 350.0);
    assert!(!fetched.is_deleted);
    assert_eq!(fetched.deleted_at, None);
}

#[tokio::test]
async fn test_create_applies_default_price() {
    let service = setup_service().await;
    let created = service.create(sample("Untitled")).await.unwrap();
    assert_eq!(created.price, DEFAULT_PRICE);
}

#[tokio::test]
async fn test_create_validates_required_fields() {
    let service = setup_service().await;

    let missing_title = NewArtwork {
        title: "  ".to_string(),
        ..sample("ignored")
    };
    assert!(matches!(
        service.create(missing_title).await,
        Err(AppError::Validation(_))
    ));

    let missing_sketch = NewArtwork {
        sketch_url: None,
        ..sample("No sketch")
    };
    assert!(matches!(
        service.create(missing_sketch).await,
        Err(AppError::Validation(_))
    ));

    let bad_price = NewArtwork {
        price: Some(-5.0),
        ..sample("Priced wrong")
    };
    assert!(matches!(
        service.create(bad_price).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_get_rejects_malformed_id() {
    let service = setup_service().await;
    assert!(matches!(
        service.get("not-a-uuid", false).await,
        Err(AppError::InvalidId(_))
    ));
}

#[tokio::test]
async fn test_soft_delete_and_restore_cycle() {
    let service = setup_service().await;
    let created = service.create(sample("Cycle")).await.unwrap();

    service.soft_delete(&created.id).await.unwrap();

    // Default fetch misses it, opted-in fetch still sees it
    assert!(matches!(
        service.get(&created.id, false).await,
        Err(AppError::NotFound(_))
    ));
    let deleted = service.get(&created.id, true).await.unwrap();
    assert!(deleted.is_deleted);
    assert!(deleted.deleted_at.is_some());

    // Double soft delete is a state mismatch
    assert!(matches!(
        service.soft_delete(&created.id).await,
        Err(AppError::NotFound(_))
    ));

    service.restore(&created.id).await.unwrap();
    let restored = service.get(&created.id, false).await.unwrap();
    assert!(!restored.is_deleted);
    assert_eq!(restored.deleted_at, None);
    assert_eq!(restored.title, created.title);
    assert_eq!(restored.price, created.price);
    assert_eq!(restored.created_at, created.created_at);

    // Restoring an active record is also a state mismatch
    assert!(matches!(
        service.restore(&created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_hard_delete_is_terminal() {
    let service = setup_service().await;
    let created = service.create(sample("Doomed")).await.unwrap();

    service.soft_delete(&created.id).await.unwrap();
    // Hard delete works regardless of soft-delete state
    service.hard_delete(&created.id).await.unwrap();

    assert!(matches!(
        service.get(&created.id, true).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.hard_delete(&created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_applies_only_provided_fields() {
    let service = setup_service().await;
    let created = service.create(sample("Patchwork")).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let updated = service
        .update(
            &created.id,
            ArtworkPatch {
                price: Some(42.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.price, 42.0);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.sketch_url, created.sketch_url);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // Updating a missing record is NotFound
    assert!(matches!(
        service
            .update(
                &Uuid::new_v4().to_string(),
                ArtworkPatch {
                    price: Some(1.0),
                    ..Default::default()
                }
            )
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_rejects_invalid_patch() {
    let service = setup_service().await;
    let created = service.create(sample("Strict")).await.unwrap();

    assert!(matches!(
        service
            .update(
                &created.id,
                ArtworkPatch {
                    title: Some("".to_string()),
                    ..Default::default()
                }
            )
            .await,
        Err(AppError::Validation(_))
    ));

    assert!(matches!(
        service
            .update(
                &created.id,
                ArtworkPatch {
                    price: Some(0.0),
                    ..Default::default()
                }
            )
            .await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_list_filters_and_order() {
    let service = setup_service().await;

    let first = service.create(sample("First")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = service.create(sample("Second")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let third = service.create(sample("Third")).await.unwrap();

    service.soft_delete(&second.id).await.unwrap();

    let active = service.list(ListFilter::default()).await.unwrap();
    assert_eq!(
        active.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
        vec![first.id.as_str(), third.id.as_str()]
    );

    let only_deleted = service
        .list(ListFilter {
            only_deleted: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(only_deleted.len(), 1);
    assert_eq!(only_deleted[0].id, second.id);

    let everything = service
        .list(ListFilter {
            include_deleted: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);

    let paged = service
        .list(ListFilter {
            include_deleted: true,
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].id, second.id);
}

use std::sync::Arc;

use catalyst_common::icon::Icon;
use catalyst_common::settings::{HeroSettings, SiteSetting, SiteSettings};
use catalyst_common::types::{ContactStatus, ContentTable};
use object_store::memory::InMemory;
use sea_orm::{ActiveValue::Set, EntityTrait, PaginatorTrait};
use serde_json::json;
use tempfile::TempDir;

use crate::entities::site_setting;
use crate::error::StorageError;
use crate::media::MediaLibrary;
use crate::store::{
    BlogPostUpdate, ContentStore, NewBlogPost, NewCareer, NewContactSubmission, NewService,
    ServiceUpdate,
};

async fn setup() -> (TempDir, ContentStore) {
    catalyst_common::id::init(1, 1);
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    let store = ContentStore::new(&url).await.unwrap();
    (dir, store)
}

fn draft(title: &str) -> NewBlogPost {
    serde_json::from_value(json!({ "title": title, "excerpt": "x", "category": "AI" })).unwrap()
}

#[tokio::test]
async fn service_defaults_apply_on_insert() {
    let (_dir, store) = setup().await;
    let new: NewService =
        serde_json::from_value(json!({"title": "Lead Gen", "description": "Pipelines"})).unwrap();
    let row = store.insert_service(new).await.unwrap();
    assert_eq!(row.icon, Icon::Zap);
    assert_eq!(row.sort_order, 0);
    assert!(row.is_active);
}

#[tokio::test]
async fn active_services_are_filtered_and_sorted() {
    let (_dir, store) = setup().await;
    for (title, order, active) in [("c", 3, true), ("a", 1, true), ("hidden", 0, false)] {
        store
            .insert_service(NewService {
                title: title.into(),
                description: String::new(),
                icon: Icon::Bot,
                sort_order: order,
                is_active: active,
            })
            .await
            .unwrap();
    }
    let active = store.list_active_services().await.unwrap();
    let titles: Vec<_> = active.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "c"]);
    assert_eq!(store.list_services(100, 0).await.unwrap().len(), 3);
    assert_eq!(store.count_services().await.unwrap(), 3);
}

#[tokio::test]
async fn partial_update_keeps_absent_fields() {
    let (_dir, store) = setup().await;
    let row = store
        .insert_service(NewService {
            title: "Old".into(),
            description: "Keep me".into(),
            icon: Icon::Brain,
            sort_order: 2,
            is_active: true,
        })
        .await
        .unwrap();
    let updated = store
        .update_service(
            &row.id,
            ServiceUpdate {
                title: Some("New".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.description, "Keep me");
    assert_eq!(updated.icon, Icon::Brain);
    assert!(store
        .update_service("missing", ServiceUpdate::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn delete_reports_whether_a_row_existed() {
    let (_dir, store) = setup().await;
    let new: NewService =
        serde_json::from_value(json!({"title": "t", "description": "d"})).unwrap();
    let row = store.insert_service(new).await.unwrap();
    assert!(store.delete_service(&row.id).await.unwrap());
    assert!(!store.delete_service(&row.id).await.unwrap());
    assert!(store.get_service(&row.id).await.unwrap().is_none());
}

#[tokio::test]
async fn unpublished_posts_stay_private() {
    let (_dir, store) = setup().await;
    let row = store.insert_blog_post(draft("Draft Post")).await.unwrap();
    assert_eq!(row.slug, "draft-post");
    assert!(row.published_at.is_none());
    assert_eq!(row.read_time.as_deref(), Some("5 min read"));

    assert!(store.list_published_blog_posts().await.unwrap().is_empty());
    assert!(store
        .get_published_blog_post("draft-post")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn publish_transition_stamps_and_clears_published_at() {
    let (_dir, store) = setup().await;
    let row = store.insert_blog_post(draft("Launch")).await.unwrap();

    let publish = BlogPostUpdate {
        is_published: Some(true),
        ..Default::default()
    };
    let published = store
        .update_blog_post(&row.id, publish.clone())
        .await
        .unwrap()
        .unwrap();
    let stamp = published.published_at.expect("stamped on publish");

    let resaved = store
        .update_blog_post(&row.id, publish)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resaved.published_at, Some(stamp));
    assert_eq!(store.list_published_blog_posts().await.unwrap().len(), 1);

    let unpublished = store
        .update_blog_post(
            &row.id,
            BlogPostUpdate {
                is_published: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(unpublished.published_at.is_none());
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict() {
    let (_dir, store) = setup().await;
    store.insert_blog_post(draft("Same Title")).await.unwrap();
    let err = store.insert_blog_post(draft("Same Title")).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)), "{err:?}");
}

#[tokio::test]
async fn career_requirements_round_trip_normalized() {
    let (_dir, store) = setup().await;
    let new: NewCareer = serde_json::from_value(json!({
        "title": "Engineer",
        "department": "Eng",
        "location": "Remote",
        "description": "Build",
        "requirements": [" Rust ", "", "SQL"]
    }))
    .unwrap();
    let row = store.insert_career(new).await.unwrap();
    assert_eq!(row.employment_type, "Full-time");
    let fetched = store.get_career(&row.id).await.unwrap().unwrap();
    assert_eq!(fetched.requirements, vec!["Rust", "SQL"]);
}

#[tokio::test]
async fn contact_status_updates_and_counts() {
    let (_dir, store) = setup().await;
    let row = store
        .insert_contact_submission(NewContactSubmission {
            name: "Jane".into(),
            email: "jane@x.com".into(),
            message: "Hi".into(),
            status: ContactStatus::New,
        })
        .await
        .unwrap();
    assert_eq!(
        store
            .count_contact_submissions(Some(ContactStatus::New))
            .await
            .unwrap(),
        1
    );
    let updated = store
        .update_contact_status(&row.id, ContactStatus::Replied)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, ContactStatus::Replied);
    let counts = store.dashboard_counts().await.unwrap();
    assert_eq!(counts.new_contact_submissions, 0);
    assert_eq!(counts.contact_submissions, 1);
}

#[tokio::test]
async fn settings_round_trip_and_fall_back_to_defaults() {
    let (_dir, store) = setup().await;
    assert_eq!(store.load_site_settings().await.unwrap(), SiteSettings::default());

    let hero = HeroSettings {
        title: "Grow".into(),
        subtitle: "Faster".into(),
        cta_text: "Talk".into(),
    };
    store
        .upsert_setting(&SiteSetting::Hero(hero.clone()))
        .await
        .unwrap();
    // second write replaces rather than duplicating
    store
        .upsert_setting(&SiteSetting::Hero(hero.clone()))
        .await
        .unwrap();
    assert_eq!(
        site_setting::Entity::find().count(store.db()).await.unwrap(),
        1
    );

    let loaded = store.load_site_settings().await.unwrap();
    assert_eq!(loaded.hero, hero);
    assert_eq!(loaded.contact, SiteSettings::default().contact);
}

#[tokio::test]
async fn unknown_setting_keys_are_ignored() {
    let (_dir, store) = setup().await;
    let now = chrono::Utc::now().fixed_offset();
    site_setting::Entity::insert(site_setting::ActiveModel {
        id: Set("legacy".into()),
        key: Set("footer".into()),
        value_json: Set("{\"text\":\"old\"}".into()),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .exec(store.db())
    .await
    .unwrap();

    let loaded = store.load_site_settings().await.unwrap();
    assert_eq!(loaded, SiteSettings::default());
}

#[tokio::test]
async fn import_keeps_ids_and_is_atomic() {
    let (_dir, store) = setup().await;
    let rows = vec![
        json!({"id": "svc-1", "title": "A", "description": "a", "created_at": "2024-01-02T03:04:05Z"}),
        json!({"title": "B", "description": "b", "icon": "Rocket"}),
    ];
    let inserted = store
        .import_rows(ContentTable::Services, rows)
        .await
        .unwrap();
    assert_eq!(inserted, 2);
    let kept = store.get_service("svc-1").await.unwrap().unwrap();
    assert_eq!(kept.created_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");

    // the duplicate id fails the whole chunk
    let rows = vec![
        json!({"id": "svc-2", "title": "C", "description": "c"}),
        json!({"id": "svc-1", "title": "D", "description": "d"}),
    ];
    let err = store
        .import_rows(ContentTable::Services, rows)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)), "{err:?}");
    assert!(store.get_service("svc-2").await.unwrap().is_none());
}

#[tokio::test]
async fn import_names_the_bad_row() {
    let (_dir, store) = setup().await;
    let rows = vec![
        json!({"name": "Ann", "email": "a@x.com", "message": "hi"}),
        json!({"name": "Bob"}),
    ];
    let err = store
        .import_rows(ContentTable::ContactSubmissions, rows)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidRow { index: 1, .. }), "{err:?}");
    assert_eq!(store.count_contact_submissions(None).await.unwrap(), 0);
}

#[tokio::test]
async fn import_site_settings_rejects_unknown_keys() {
    let (_dir, store) = setup().await;
    let ok = vec![json!({"key": "social", "value": {"github": "https://github.com/c"}})];
    assert_eq!(
        store
            .import_rows(ContentTable::SiteSettings, ok)
            .await
            .unwrap(),
        1
    );
    let loaded = store.load_site_settings().await.unwrap();
    assert_eq!(loaded.social.github, "https://github.com/c");

    let bad = vec![json!({"key": "footer", "value": {}})];
    assert!(store
        .import_rows(ContentTable::SiteSettings, bad)
        .await
        .is_err());
}

#[tokio::test]
async fn empty_import_is_a_no_op() {
    let (_dir, store) = setup().await;
    assert_eq!(
        store
            .import_rows(ContentTable::Careers, Vec::new())
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn media_upload_list_fetch_remove() {
    let (_dir, store) = setup().await;
    let library = MediaLibrary::new(
        Arc::new(InMemory::new()),
        Arc::new(store),
        "http://localhost:8080/",
    );

    let item = library
        .upload("logo.svg", "image/svg+xml", bytes::Bytes::from_static(b"<svg/>"))
        .await
        .unwrap();
    assert!(item.file.name.ends_with(".svg"));
    assert_eq!(item.file.size, 6);
    assert_eq!(
        item.url,
        format!("http://localhost:8080/media/{}", item.file.name)
    );

    let listed = library.list().await.unwrap();
    assert_eq!(listed.len(), 1);

    let (row, bytes) = library.fetch(&item.file.name).await.unwrap().unwrap();
    assert_eq!(row.mime_type, "image/svg+xml");
    assert_eq!(&bytes[..], b"<svg/>");

    assert!(library.remove(&item.file.name).await.unwrap());
    assert!(library.list().await.unwrap().is_empty());
    assert!(library.fetch(&item.file.name).await.unwrap().is_none());
    assert!(!library.remove(&item.file.name).await.unwrap());
}

#[tokio::test]
async fn removing_unindexed_media_reports_missing() {
    let (_dir, store) = setup().await;
    let library = MediaLibrary::new(Arc::new(InMemory::new()), Arc::new(store), "");

    // InMemory, like S3, accepts deletes of absent keys.
    assert!(!library.remove("1700000000000-abcdefg.png").await.unwrap());
}

#[tokio::test]
async fn indexed_media_without_blob_is_not_found() {
    let (_dir, store) = setup().await;
    let store = Arc::new(store);
    store
        .insert_media_file("1700000000000-abcdefg.png", "image/png", 3)
        .await
        .unwrap();
    let library = MediaLibrary::new(Arc::new(InMemory::new()), store.clone(), "");

    assert!(library.fetch("1700000000000-abcdefg.png").await.unwrap().is_none());
    // the dangling row can still be cleaned up
    assert!(library.remove("1700000000000-abcdefg.png").await.unwrap());
    assert!(store
        .get_media_file("1700000000000-abcdefg.png")
        .await
        .unwrap()
        .is_none());
}

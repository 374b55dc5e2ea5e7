mod common;

use blog_service::models::{CreatePostRequest, Post, UpdatePostRequest};
use common::harness;
use entity_repository::{ListQuery, RequestContext};
use kv_store::KeyValueStore;

fn create_req(title: &str) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        content: format!("{title} body"),
        author_id: "u1".to_string(),
        author_name: "Ada".to_string(),
    }
}

#[tokio::test]
async fn create_then_read_round_trips() {
    let h = harness(1_000);
    let ctx = RequestContext::new();

    let created = h.services.posts.create(&ctx, create_req("Hello")).await.unwrap();

    assert_eq!(created.id, "1");
    assert_eq!(created.created_at, 1_000);
    assert_eq!(created.updated_at, 1_000);
    assert!(created.link_preview.is_none());
    assert!(created.tags.is_empty());

    let read = h.services.posts.read(&ctx, &created.id).await.unwrap();
    assert_eq!(read, Some(created));
}

#[tokio::test]
async fn record_is_stored_under_post_key() {
    let h = harness(1_000);
    let ctx = RequestContext::new();
    h.services.posts.create(&ctx, create_req("Hello")).await.unwrap();

    let raw = h.engine.get("post-1").await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(json["title"], "Hello");
    assert_eq!(json["author_name"], "Ada");
    assert!(json.get("tags").is_none());
    assert!(json.get("link_preview").is_none());
}

#[tokio::test]
async fn update_preserves_created_at_across_many_updates() {
    let h = harness(1_000);
    let ctx = RequestContext::new();
    let created = h.services.posts.create(&ctx, create_req("v0")).await.unwrap();

    for round in 1..=5 {
        h.clock.advance(10);
        let updated = h
            .services
            .posts
            .update(
                &ctx,
                UpdatePostRequest {
                    id: created.id.clone(),
                    title: format!("v{round}"),
                    content: String::new(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.created_at, 1_000);
        assert_eq!(updated.updated_at, 1_000 + 10 * round);
        assert_eq!(updated.content, "");
    }

    let stored = h.services.posts.read(&ctx, &created.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "v5");
    assert_eq!(stored.created_at, created.created_at);
    assert_eq!(stored.id, created.id);
}

#[tokio::test]
async fn update_missing_post_is_none() {
    let h = harness(1_000);
    let ctx = RequestContext::new();

    let result = h
        .services
        .posts
        .update(
            &ctx,
            UpdatePostRequest {
                id: "ghost".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(h.engine.is_empty());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let h = harness(1_000);
    let ctx = RequestContext::new();
    let post = h.services.posts.create(&ctx, create_req("Bye")).await.unwrap();

    h.services.posts.delete(&ctx, &post.id).await.unwrap();
    h.services.posts.delete(&ctx, &post.id).await.unwrap();
    h.services.posts.delete(&ctx, "never-existed").await.unwrap();

    assert_eq!(h.services.posts.read(&ctx, &post.id).await.unwrap(), None);
}

#[tokio::test]
async fn list_is_newest_first_and_skips_corrupt_records() {
    let h = harness(100);
    let ctx = RequestContext::new();

    h.services.posts.create(&ctx, create_req("old")).await.unwrap();
    h.clock.set(300);
    h.services.posts.create(&ctx, create_req("newest")).await.unwrap();
    h.clock.set(200);
    h.services.posts.create(&ctx, create_req("middle")).await.unwrap();
    h.engine
        .put("post-corrupt", b"{\"title\": 42".to_vec())
        .await
        .unwrap();

    let listing = h
        .services
        .posts
        .list(&ctx, ListQuery { page: 2, limit: 10 })
        .await
        .unwrap();

    let titles: Vec<&str> = listing.records.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["newest", "middle", "old"]);
    assert_eq!(listing.total, 3);
    assert_eq!((listing.page, listing.limit), (2, 10));
}

#[tokio::test]
async fn list_of_empty_store() {
    let h = harness(100);
    let listing = h
        .services
        .posts
        .list(&RequestContext::new(), ListQuery::default())
        .await
        .unwrap();

    assert!(listing.records.is_empty());
    assert_eq!(listing.total, 0);
}

#[tokio::test]
async fn read_of_corrupt_record_is_absent() {
    let h = harness(100);
    h.engine.put("post-bad", b"not json".to_vec()).await.unwrap();

    let read: Option<Post> = h
        .services
        .posts
        .read(&RequestContext::new(), "bad")
        .await
        .unwrap();
    assert!(read.is_none());
}

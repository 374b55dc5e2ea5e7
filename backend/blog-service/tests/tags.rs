mod common;

use blog_service::models::CreatePostRequest;
use common::harness;
use entity_repository::RequestContext;
use std::collections::HashSet;

async fn new_post(h: &common::Harness, title: &str) -> String {
    h.services
        .posts
        .create(
            &RequestContext::new(),
            CreatePostRequest {
                title: title.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn tags_keep_insertion_order() {
    let h = harness(10);
    let ctx = RequestContext::new();
    let id = new_post(&h, "p").await;

    h.services.posts.tag_post(&ctx, &id, "b").await.unwrap();
    let post = h.services.posts.tag_post(&ctx, &id, "a").await.unwrap().unwrap();

    assert_eq!(post.tags, ["b", "a"]);
    assert_eq!(
        h.services.posts.list_tags(&ctx, Some(&id)).await.unwrap(),
        ["b", "a"]
    );
}

#[tokio::test]
async fn global_tags_are_sorted_union() {
    let h = harness(10);
    let ctx = RequestContext::new();
    let first = new_post(&h, "first").await;
    let second = new_post(&h, "second").await;

    h.services.posts.tag_post(&ctx, &first, "b").await.unwrap();
    h.services.posts.tag_post(&ctx, &first, "a").await.unwrap();
    h.services.posts.tag_post(&ctx, &second, "c").await.unwrap();
    h.services.posts.tag_post(&ctx, &second, "a").await.unwrap();

    assert_eq!(
        h.services.posts.list_tags(&ctx, None).await.unwrap(),
        ["a", "b", "c"]
    );
    assert_eq!(
        h.services.posts.list_tags(&ctx, Some("")).await.unwrap(),
        ["a", "b", "c"]
    );
}

#[tokio::test]
async fn tagging_twice_is_idempotent() {
    let h = harness(10);
    let ctx = RequestContext::new();
    let id = new_post(&h, "p").await;

    h.clock.set(20);
    let once = h.services.posts.tag_post(&ctx, &id, "x").await.unwrap().unwrap();
    h.clock.set(30);
    let twice = h.services.posts.tag_post(&ctx, &id, "x").await.unwrap().unwrap();

    assert_eq!(twice.tags, ["x"]);
    assert_eq!(once.updated_at, 20);
    assert_eq!(twice.updated_at, 20);
}

#[tokio::test]
async fn untag_absent_tag_changes_nothing() {
    let h = harness(10);
    let ctx = RequestContext::new();
    let id = new_post(&h, "p").await;
    h.services.posts.tag_post(&ctx, &id, "keep").await.unwrap();

    h.clock.set(99);
    let post = h.services.posts.untag_post(&ctx, &id, "missing").await.unwrap().unwrap();

    assert_eq!(post.tags, ["keep"]);
    assert_eq!(post.updated_at, 10);
    let stored = h.services.posts.read(&ctx, &id).await.unwrap().unwrap();
    assert_eq!(stored.updated_at, 10);
}

#[tokio::test]
async fn untag_removes_and_bumps_updated_at() {
    let h = harness(10);
    let ctx = RequestContext::new();
    let id = new_post(&h, "p").await;
    for tag in ["a", "b", "c"] {
        h.services.posts.tag_post(&ctx, &id, tag).await.unwrap();
    }

    h.clock.set(50);
    let post = h.services.posts.untag_post(&ctx, &id, "b").await.unwrap().unwrap();

    assert_eq!(post.tags, ["a", "c"]);
    assert_eq!(post.updated_at, 50);
    assert_eq!(post.created_at, 10);
}

#[tokio::test]
async fn empty_arguments_are_noops() {
    let h = harness(10);
    let ctx = RequestContext::new();
    let id = new_post(&h, "p").await;

    assert!(h.services.posts.tag_post(&ctx, "", "x").await.unwrap().is_none());
    assert!(h.services.posts.untag_post(&ctx, "", "x").await.unwrap().is_none());

    h.clock.set(40);
    let post = h.services.posts.tag_post(&ctx, &id, "").await.unwrap().unwrap();
    assert!(post.tags.is_empty());
    assert_eq!(post.updated_at, 10);

    let post = h.services.posts.untag_post(&ctx, &id, "").await.unwrap().unwrap();
    assert_eq!(post.updated_at, 10);
}

#[tokio::test]
async fn missing_post_yields_nothing() {
    let h = harness(10);
    let ctx = RequestContext::new();

    assert!(h.services.posts.tag_post(&ctx, "ghost", "x").await.unwrap().is_none());
    assert!(h.services.posts.untag_post(&ctx, "ghost", "x").await.unwrap().is_none());
    assert!(h
        .services
        .posts
        .list_tags(&ctx, Some("ghost"))
        .await
        .unwrap()
        .is_empty());
    assert!(h.engine.is_empty());
}

#[tokio::test]
async fn concurrent_tagging_loses_no_tag() {
    let h = harness(10);
    let id = new_post(&h, "busy").await;

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let posts = h.services.posts.clone();
            let id = id.clone();
            tokio::spawn(async move {
                posts
                    .tag_post(&RequestContext::new(), &id, &format!("tag-{i:02}"))
                    .await
                    .unwrap();
            })
        })
        .collect();
    for result in futures::future::join_all(tasks).await {
        result.unwrap();
    }

    let tags = h
        .services
        .posts
        .list_tags(&RequestContext::new(), Some(&id))
        .await
        .unwrap();
    let unique: HashSet<&String> = tags.iter().collect();
    assert_eq!(tags.len(), 20);
    assert_eq!(unique.len(), 20);
}

#[tokio::test]
async fn tag_and_update_interleave_safely() {
    let h = harness(10);
    let id = new_post(&h, "p").await;

    let tagger = {
        let posts = h.services.posts.clone();
        let id = id.clone();
        tokio::spawn(async move {
            for i in 0..10 {
                posts
                    .tag_post(&RequestContext::new(), &id, &format!("t{i}"))
                    .await
                    .unwrap();
            }
        })
    };
    let editor = {
        let posts = h.services.posts.clone();
        let id = id.clone();
        tokio::spawn(async move {
            for i in 0..10 {
                posts
                    .update(
                        &RequestContext::new(),
                        blog_service::models::UpdatePostRequest {
                            id: id.clone(),
                            title: format!("rev {i}"),
                            content: String::new(),
                        },
                    )
                    .await
                    .unwrap();
            }
        })
    };
    tagger.await.unwrap();
    editor.await.unwrap();

    let post = h
        .services
        .posts
        .read(&RequestContext::new(), &id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(post.tags.len(), 10);
    assert_eq!(post.title, "rev 9");
}

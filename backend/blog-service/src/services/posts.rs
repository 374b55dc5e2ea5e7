use crate::error::ServiceResult;
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};
use crate::services::{enrich, Dependencies};
use crate::tags::{add_tag, remove_tag, union_sorted};
use entity_repository::{
    Clock, IdGenerator, ListQuery, Listing, Repository, RequestContext,
};
use link_preview::LinkPreviewer;
use std::sync::Arc;
use tracing::{debug, info};

/// Posts plus the per-post tag set
#[derive(Clone)]
pub struct PostService {
    repo: Repository<Post>,
    previewer: LinkPreviewer,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl PostService {
    pub fn new(deps: Dependencies) -> Self {
        Self {
            repo: Repository::new(deps.store),
            previewer: deps.previewer,
            clock: deps.clock,
            ids: deps.ids,
        }
    }

    /// Build, enrich and persist a new post.
    ///
    /// The post is returned even when the write did not reach the store.
    pub async fn create(&self, ctx: &RequestContext, req: CreatePostRequest) -> ServiceResult<Post> {
        let now = self.clock.now();
        let link_preview = enrich(&self.previewer, ctx, &req.content).await?;

        let post = Post {
            id: self.ids.next_id(),
            title: req.title,
            content: req.content,
            author_id: req.author_id,
            author_name: req.author_name,
            created_at: now,
            updated_at: now,
            link_preview,
            tags: Vec::new(),
        };

        let stored = self.repo.insert(ctx, &post).await?;
        info!(
            post_id = %post.id,
            author_id = %post.author_id,
            stored,
            has_preview = post.link_preview.is_some(),
            "Post created"
        );
        Ok(post)
    }

    pub async fn read(&self, ctx: &RequestContext, id: &str) -> ServiceResult<Option<Post>> {
        Ok(self.repo.read(ctx, id).await?)
    }

    /// Replace title and content; `created_at` and the preview are kept
    pub async fn update(
        &self,
        ctx: &RequestContext,
        req: UpdatePostRequest,
    ) -> ServiceResult<Option<Post>> {
        let UpdatePostRequest { id, title, content } = req;
        let clock = &self.clock;

        let updated = self
            .repo
            .modify(ctx, &id, move |post| {
                post.title = title;
                post.content = content;
                post.updated_at = clock.now();
                true
            })
            .await?;

        debug!(post_id = %id, found = updated.is_some(), "Post update");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> ServiceResult<()> {
        self.repo.delete(ctx, id).await?;
        Ok(())
    }

    /// Newest first; page and limit are echoed, not applied
    pub async fn list(&self, ctx: &RequestContext, query: ListQuery) -> ServiceResult<Listing<Post>> {
        Ok(self.repo.list(ctx, query, |_| true).await?)
    }

    /// Append `tag` to the post's tags.
    ///
    /// Empty `post_id` yields `None`; empty `tag` returns the post untouched.
    /// A tag already present leaves the record and `updated_at` alone.
    pub async fn tag_post(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        tag: &str,
    ) -> ServiceResult<Option<Post>> {
        if post_id.is_empty() {
            return Ok(None);
        }
        if tag.is_empty() {
            return self.read(ctx, post_id).await;
        }

        let clock = &self.clock;
        let post = self
            .repo
            .modify(ctx, post_id, |post| {
                let changed = add_tag(&mut post.tags, tag);
                if changed {
                    post.updated_at = clock.now();
                }
                changed
            })
            .await?;

        debug!(post_id = %post_id, tag = %tag, found = post.is_some(), "Tag post");
        Ok(post)
    }

    /// Remove `tag` from the post's tags, same empty-argument rules as
    /// [`PostService::tag_post`]
    pub async fn untag_post(
        &self,
        ctx: &RequestContext,
        post_id: &str,
        tag: &str,
    ) -> ServiceResult<Option<Post>> {
        if post_id.is_empty() {
            return Ok(None);
        }
        if tag.is_empty() {
            return self.read(ctx, post_id).await;
        }

        let clock = &self.clock;
        let post = self
            .repo
            .modify(ctx, post_id, |post| {
                let changed = remove_tag(&mut post.tags, tag);
                if changed {
                    post.updated_at = clock.now();
                }
                changed
            })
            .await?;

        debug!(post_id = %post_id, tag = %tag, found = post.is_some(), "Untag post");
        Ok(post)
    }

    /// One post's tags in insertion order, or every post's tags as a sorted set.
    ///
    /// An absent post yields an empty list.
    pub async fn list_tags(
        &self,
        ctx: &RequestContext,
        post_id: Option<&str>,
    ) -> ServiceResult<Vec<String>> {
        match post_id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(self
                .repo
                .read(ctx, id)
                .await?
                .map(|post| post.tags)
                .unwrap_or_default()),
            None => {
                let listing = self.repo.list(ctx, ListQuery::default(), |_| true).await?;
                Ok(union_sorted(
                    listing.records.iter().map(|post| post.tags.as_slice()),
                ))
            }
        }
    }
}

use crate::error::ServiceResult;
use crate::models::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::services::{enrich, Dependencies};
use entity_repository::{Clock, IdGenerator, ListQuery, Listing, Repository, RequestContext};
use link_preview::LinkPreviewer;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct CommentService {
    repo: Repository<Comment>,
    previewer: LinkPreviewer,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl CommentService {
    pub fn new(deps: Dependencies) -> Self {
        Self {
            repo: Repository::new(deps.store),
            previewer: deps.previewer,
            clock: deps.clock,
            ids: deps.ids,
        }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateCommentRequest,
    ) -> ServiceResult<Comment> {
        let created_at = self.clock.now();
        let link_preview = enrich(&self.previewer, ctx, &req.content).await?;

        let comment = Comment {
            id: self.ids.next_id(),
            content: req.content,
            author_id: req.author_id,
            author_name: req.author_name,
            post_id: req.post_id,
            created_at,
            link_preview,
        };

        let stored = self.repo.insert(ctx, &comment).await?;
        info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            stored,
            has_preview = comment.link_preview.is_some(),
            "Comment created"
        );
        Ok(comment)
    }

    pub async fn read(&self, ctx: &RequestContext, id: &str) -> ServiceResult<Option<Comment>> {
        Ok(self.repo.read(ctx, id).await?)
    }

    /// Replace content and post, and take the author from `user_id`
    pub async fn update(
        &self,
        ctx: &RequestContext,
        req: UpdateCommentRequest,
    ) -> ServiceResult<Option<Comment>> {
        let UpdateCommentRequest {
            id,
            content,
            user_id,
            post_id,
        } = req;

        let updated = self
            .repo
            .modify(ctx, &id, move |comment| {
                comment.content = content;
                comment.author_id = user_id;
                comment.post_id = post_id;
                true
            })
            .await?;

        debug!(comment_id = %id, found = updated.is_some(), "Comment update");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> ServiceResult<()> {
        self.repo.delete(ctx, id).await?;
        Ok(())
    }

    /// Newest first, optionally only the comments of `post_id`.
    ///
    /// An empty `post_id` means no filter.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        post_id: Option<&str>,
        query: ListQuery,
    ) -> ServiceResult<Listing<Comment>> {
        let post_id = post_id.filter(|id| !id.is_empty());
        Ok(self
            .repo
            .list(ctx, query, |comment| {
                post_id.map_or(true, |id| comment.post_id == id)
            })
            .await?)
    }
}

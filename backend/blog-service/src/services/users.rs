use crate::error::ServiceResult;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::services::Dependencies;
use entity_repository::{IdGenerator, ListQuery, Listing, Repository, RequestContext};
use std::sync::Arc;
use tracing::{debug, info};

/// Users have no content to enrich and no timestamps
#[derive(Clone)]
pub struct UserService {
    repo: Repository<User>,
    ids: Arc<dyn IdGenerator>,
}

impl UserService {
    pub fn new(deps: Dependencies) -> Self {
        Self {
            repo: Repository::new(deps.store),
            ids: deps.ids,
        }
    }

    /// `password` must already be a hash; it is stored as given
    pub async fn create(&self, ctx: &RequestContext, req: CreateUserRequest) -> ServiceResult<User> {
        let user = User {
            id: self.ids.next_id(),
            name: req.name,
            email: req.email,
            password: req.password,
        };

        let stored = self.repo.insert(ctx, &user).await?;
        info!(user_id = %user.id, stored, "User created");
        Ok(user)
    }

    pub async fn read(&self, ctx: &RequestContext, id: &str) -> ServiceResult<Option<User>> {
        Ok(self.repo.read(ctx, id).await?)
    }

    /// Replace name and email; the password hash is never touched here
    pub async fn update(
        &self,
        ctx: &RequestContext,
        req: UpdateUserRequest,
    ) -> ServiceResult<Option<User>> {
        let UpdateUserRequest { id, name, email } = req;

        let updated = self
            .repo
            .modify(ctx, &id, move |user| {
                user.name = name;
                user.email = email;
                true
            })
            .await?;

        debug!(user_id = %id, found = updated.is_some(), "User update");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> ServiceResult<()> {
        self.repo.delete(ctx, id).await?;
        Ok(())
    }

    /// Store order (ascending key)
    pub async fn list(&self, ctx: &RequestContext, query: ListQuery) -> ServiceResult<Listing<User>> {
        Ok(self.repo.list(ctx, query, |_| true).await?)
    }
}

//! Me Use Case
//!
//! Current user of the session, if any. Never changes the session.

use std::sync::Arc;

use crate::application::session::SessionContext;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub struct MeUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> MeUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, ctx: &SessionContext) -> AuthResult<Option<User>> {
        match ctx.user_id() {
            Some(user_id) => self.user_repo.find_by_id(user_id).await,
            None => Ok(None),
        }
    }
}

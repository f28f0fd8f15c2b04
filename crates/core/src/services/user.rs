//! User administration service (directory listing and role changes).

use chrono::Utc;
use hotdeals_common::{AppError, AppResult};
use hotdeals_db::{
    entities::user::{self, Role},
    repositories::UserRepository,
};
use sea_orm::Set;

use crate::{pagination, pagination::Page};

/// User administration service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// List users newest-first (paginated).
    pub async fn list(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> AppResult<Page<user::Model>> {
        let (page, limit, offset) = pagination::normalize(page, limit);

        let total = self.user_repo.count_all().await?;
        let users = self.user_repo.find_page(limit, offset).await?;

        Ok(Page::new(page, limit, total, users))
    }

    /// Change a user's role.
    pub async fn set_role(&self, user_id: &str, role: &str) -> AppResult<user::Model> {
        let role =
            Role::parse(role).ok_or_else(|| AppError::Validation("Invalid role".to_string()))?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.role = Set(role);
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, role: Role) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: MockDatabase) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_set_role_rejects_unknown_role() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.set_role("u1", "superadmin").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_role_missing_user_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let result = service.set_role("missing", "moderator").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_set_role_promotes_user() {
        let before = test_user("u1", Role::User);
        let after = test_user("u1", Role::Moderator);

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[before]])
                .append_query_results([[after]]),
        );

        let user = service.set_role("u1", "moderator").await.unwrap();

        assert_eq!(user.role, Role::Moderator);
    }

    #[tokio::test]
    async fn test_list_builds_page() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .append_query_results([[test_user("u1", Role::User), test_user("u2", Role::User)]]),
        );

        let page = service.list(None, None).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.data.len(), 2);
    }
}

//! Vote repository.

use std::sync::Arc;

use crate::entities::{Vote, vote};
use hotdeals_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, SqlErr,
};

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a vote by voter and deal.
    pub async fn find_by_voter_and_deal(
        &self,
        voter_id: &str,
        deal_id: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find()
            .filter(vote::Column::VoterId.eq(voter_id))
            .filter(vote::Column::DealId.eq(deal_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new vote.
    ///
    /// The (voter, deal) unique index turns a concurrent duplicate insert into
    /// `Conflict`; the caller re-reads the winning row and proceeds as an update.
    pub async fn create(&self, model: vote::ActiveModel) -> AppResult<vote::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Vote already exists".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })
    }

    /// Update a vote.
    pub async fn update(&self, model: vote::ActiveModel) -> AppResult<vote::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a vote.
    pub async fn delete(&self, model: vote::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count votes of one kind on a deal.
    pub async fn count_by_deal_and_kind(
        &self,
        deal_id: &str,
        kind: vote::VoteKind,
    ) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::DealId.eq(deal_id))
            .filter(vote::Column::Kind.eq(kind))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::vote::VoteKind;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_vote(id: &str, voter_id: &str, deal_id: &str, kind: VoteKind) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            kind,
            voter_id: voter_id.to_string(),
            deal_id: deal_id.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_voter_and_deal_found() {
        let vote = create_test_vote("v1", "u1", "d1", VoteKind::Hot);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[vote.clone()]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let result = repo.find_by_voter_and_deal("u1", "d1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().kind, VoteKind::Hot);
    }

    #[tokio::test]
    async fn test_find_by_voter_and_deal_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<vote::Model>::new()])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let result = repo.find_by_voter_and_deal("u1", "d1").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_count_by_deal_and_kind() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let result = repo.count_by_deal_and_kind("d1", VoteKind::Hot).await.unwrap();

        assert_eq!(result, 4);
    }
}

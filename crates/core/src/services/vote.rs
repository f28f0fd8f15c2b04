//! Vote aggregator service.
//!
//! One vote per (voter, deal). A repeat vote of the same kind is a no-op, a
//! vote of the other kind flips the stored row in place, and every mutation
//! recomputes the deal's cached temperature from the current counts.

use chrono::Utc;
use hotdeals_common::{AppError, AppResult, IdGenerator};
use hotdeals_db::{
    entities::vote::{self, VoteKind},
    repositories::{DealRepository, VoteRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Outcome of a vote mutation: the recomputed temperature and raw counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteStats {
    pub temperature: i32,
    pub hot_count: u64,
    pub cold_count: u64,
}

/// What a cast should do given the voter's prior vote on the deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VotePlan {
    Create,
    Noop,
    Flip,
}

fn plan_vote(existing: Option<VoteKind>, requested: VoteKind) -> VotePlan {
    match existing {
        None => VotePlan::Create,
        Some(kind) if kind == requested => VotePlan::Noop,
        Some(_) => VotePlan::Flip,
    }
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    deal_repo: DealRepository,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub fn new(vote_repo: VoteRepository, deal_repo: DealRepository) -> Self {
        Self {
            vote_repo,
            deal_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Cast (or restate, or flip) a vote on a deal.
    pub async fn cast(&self, voter_id: &str, deal_id: &str, kind: VoteKind) -> AppResult<VoteStats> {
        self.deal_repo.get_by_id(deal_id).await?;

        let existing = self.vote_repo.find_by_voter_and_deal(voter_id, deal_id).await?;

        match plan_vote(existing.as_ref().map(|v| v.kind), kind) {
            VotePlan::Create => self.create_vote(voter_id, deal_id, kind).await?,
            VotePlan::Noop => {}
            VotePlan::Flip => {
                // plan_vote only returns Flip when a prior vote exists
                if let Some(vote) = existing {
                    self.flip_vote(vote, kind).await?;
                }
            }
        }

        self.recompute(deal_id).await
    }

    /// Remove the voter's vote from a deal.
    pub async fn retract(&self, voter_id: &str, deal_id: &str) -> AppResult<VoteStats> {
        self.deal_repo.get_by_id(deal_id).await?;

        let vote = self
            .vote_repo
            .find_by_voter_and_deal(voter_id, deal_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vote not found".to_string()))?;

        self.vote_repo.delete(vote).await?;
        self.recompute(deal_id).await
    }

    async fn create_vote(&self, voter_id: &str, deal_id: &str, kind: VoteKind) -> AppResult<()> {
        let model = vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            kind: Set(kind),
            voter_id: Set(voter_id.to_string()),
            deal_id: Set(deal_id.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match self.vote_repo.create(model).await {
            Ok(_) => Ok(()),
            // Lost a concurrent first-vote race: another request inserted the
            // row between our read and this insert. Re-read the winner and
            // continue as an update instead of surfacing the storage error.
            Err(AppError::Conflict(_)) => {
                let winner = self
                    .vote_repo
                    .find_by_voter_and_deal(voter_id, deal_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal("Vote disappeared after insert conflict".to_string())
                    })?;

                if winner.kind != kind {
                    self.flip_vote(winner, kind).await?;
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn flip_vote(&self, vote: vote::Model, kind: VoteKind) -> AppResult<()> {
        let mut active: vote::ActiveModel = vote.into();
        active.kind = Set(kind);
        active.updated_at = Set(Some(Utc::now().into()));
        self.vote_repo.update(active).await?;
        Ok(())
    }

    /// Recompute temperature = hot − cold and persist it on the deal.
    async fn recompute(&self, deal_id: &str) -> AppResult<VoteStats> {
        let hot_count = self
            .vote_repo
            .count_by_deal_and_kind(deal_id, VoteKind::Hot)
            .await?;
        let cold_count = self
            .vote_repo
            .count_by_deal_and_kind(deal_id, VoteKind::Cold)
            .await?;

        let temperature = (hot_count as i64 - cold_count as i64) as i32;
        self.deal_repo.set_temperature(deal_id, temperature).await?;

        Ok(VoteStats {
            temperature,
            hot_count,
            cold_count,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hotdeals_db::entities::deal::{self, Category, Status};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_deal(id: &str) -> deal::Model {
        deal::Model {
            id: id.to_string(),
            title: "A deal worth voting on".to_string(),
            description: "Longer description here".to_string(),
            price: 10.0,
            original_price: None,
            url: None,
            category: Category::Autre,
            status: Status::Approved,
            temperature: 0,
            author_id: "author".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_vote(id: &str, voter_id: &str, deal_id: &str, kind: VoteKind) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            kind,
            voter_id: voter_id.to_string(),
            deal_id: deal_id.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }]
    }

    fn deal_db_with_update() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_deal("d1")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
    }

    fn service_with(vote_db: MockDatabase, deal_db: MockDatabase) -> VoteService {
        VoteService::new(
            VoteRepository::new(Arc::new(vote_db.into_connection())),
            DealRepository::new(Arc::new(deal_db.into_connection())),
        )
    }

    #[test]
    fn test_plan_vote() {
        assert_eq!(plan_vote(None, VoteKind::Hot), VotePlan::Create);
        assert_eq!(plan_vote(Some(VoteKind::Hot), VoteKind::Hot), VotePlan::Noop);
        assert_eq!(plan_vote(Some(VoteKind::Hot), VoteKind::Cold), VotePlan::Flip);
        assert_eq!(plan_vote(Some(VoteKind::Cold), VoteKind::Hot), VotePlan::Flip);
    }

    #[tokio::test]
    async fn test_cast_on_missing_deal_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<deal::Model>::new()]),
        );

        let result = service.cast("u1", "missing", VoteKind::Hot).await;

        assert!(matches!(result, Err(AppError::DealNotFound(_))));
    }

    #[tokio::test]
    async fn test_first_vote_counts_hot() {
        let created = test_vote("v1", "u1", "d1", VoteKind::Hot);
        let vote_db = MockDatabase::new(DatabaseBackend::Postgres)
            // no prior vote
            .append_query_results([Vec::<vote::Model>::new()])
            // insert returning
            .append_query_results([[created]])
            // hot count, then cold count
            .append_query_results([count_result(1)])
            .append_query_results([count_result(0)]);

        let service = service_with(vote_db, deal_db_with_update());
        let stats = service.cast("u1", "d1", VoteKind::Hot).await.unwrap();

        assert_eq!(
            stats,
            VoteStats {
                temperature: 1,
                hot_count: 1,
                cold_count: 0
            }
        );
    }

    #[tokio::test]
    async fn test_same_kind_vote_is_idempotent() {
        let existing = test_vote("v1", "u1", "d1", VoteKind::Hot);
        // No insert or update is mocked: if the service tried either, the
        // mock would fail the test.
        let vote_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_query_results([count_result(1)])
            .append_query_results([count_result(0)]);

        let service = service_with(vote_db, deal_db_with_update());
        let stats = service.cast("u1", "d1", VoteKind::Hot).await.unwrap();

        assert_eq!(
            stats,
            VoteStats {
                temperature: 1,
                hot_count: 1,
                cold_count: 0
            }
        );
    }

    #[tokio::test]
    async fn test_flip_moves_temperature_by_two() {
        let existing = test_vote("v1", "u1", "d1", VoteKind::Hot);
        let flipped = test_vote("v1", "u1", "d1", VoteKind::Cold);
        let vote_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            // update returning
            .append_query_results([[flipped]])
            .append_query_results([count_result(0)])
            .append_query_results([count_result(1)]);

        let service = service_with(vote_db, deal_db_with_update());
        let stats = service.cast("u1", "d1", VoteKind::Cold).await.unwrap();

        // Was +1 with the hot vote; one flip moves it to −1
        assert_eq!(
            stats,
            VoteStats {
                temperature: -1,
                hot_count: 0,
                cold_count: 1
            }
        );
    }

    #[tokio::test]
    async fn test_retract_missing_vote_is_not_found() {
        let vote_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vote::Model>::new()]);

        let service = service_with(vote_db, deal_db_with_update());
        let result = service.retract("u1", "d1").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_retract_recomputes_temperature() {
        let existing = test_vote("v1", "u1", "d1", VoteKind::Cold);
        let vote_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([count_result(0)])
            .append_query_results([count_result(0)]);

        let service = service_with(vote_db, deal_db_with_update());
        let stats = service.retract("u1", "d1").await.unwrap();

        assert_eq!(
            stats,
            VoteStats {
                temperature: 0,
                hot_count: 0,
                cold_count: 0
            }
        );
    }
}

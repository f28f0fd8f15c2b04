//! Moderation workflow: the pending queue and the approve/reject transition.

use std::collections::HashMap;

use chrono::Utc;
use hotdeals_common::{AppError, AppResult};
use hotdeals_db::{
    entities::{
        deal::{self, Status},
        user,
    },
    repositories::{DealRepository, UserRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Author projection for the moderation queue (includes contact email).
#[derive(Debug, Clone, Serialize)]
pub struct AuthorContact {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&user::Model> for AuthorContact {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// A pending deal with its author contact projection.
#[derive(Debug, Clone)]
pub struct PendingDealView {
    pub deal: deal::Model,
    pub author: Option<AuthorContact>,
}

/// Moderation service for business logic.
#[derive(Clone)]
pub struct ModerationService {
    deal_repo: DealRepository,
    user_repo: UserRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(deal_repo: DealRepository, user_repo: UserRepository) -> Self {
        Self {
            deal_repo,
            user_repo,
        }
    }

    /// The moderation queue: pending deals newest-first.
    pub async fn pending(&self) -> AppResult<Vec<PendingDealView>> {
        let deals = self.deal_repo.find_pending().await?;

        let mut author_ids: Vec<String> = deals.iter().map(|d| d.author_id.clone()).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<String, AuthorContact> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id.clone(), AuthorContact::from(u)))
            .collect();

        Ok(deals
            .into_iter()
            .map(|deal| {
                let author = authors.get(&deal.author_id).cloned();
                PendingDealView { deal, author }
            })
            .collect())
    }

    /// Decide a deal: the requested status must be exactly approved or
    /// rejected. There is no transition back to pending.
    pub async fn moderate(&self, deal_id: &str, status: &str) -> AppResult<deal::Model> {
        let status = match Status::parse(status) {
            Some(s @ (Status::Approved | Status::Rejected)) => s,
            _ => {
                return Err(AppError::Validation(
                    "Invalid status (approved or rejected)".to_string(),
                ));
            }
        };

        let deal = self.deal_repo.get_by_id(deal_id).await?;

        let mut active: deal::ActiveModel = deal.into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now().into()));

        self.deal_repo.update(active).await
    }
}

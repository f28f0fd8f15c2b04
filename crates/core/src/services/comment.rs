//! Comment service.

use std::collections::HashMap;

use chrono::Utc;
use hotdeals_common::{AppResult, IdGenerator};
use hotdeals_db::{
    entities::{comment, user},
    repositories::{CommentRepository, DealRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::{policy, services::deal::AuthorView};

/// A comment together with its resolved author projection.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: comment::Model,
    pub author: Option<AuthorView>,
}

/// Input for creating or editing a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(min = 3, max = 500, message = "Content must be 3-500 characters"))]
    pub content: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    deal_repo: DealRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        deal_repo: DealRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            deal_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List the comments on a deal, newest-first.
    pub async fn list_for_deal(&self, deal_id: &str) -> AppResult<Vec<CommentView>> {
        let comments = self.comment_repo.find_by_deal(deal_id).await?;
        self.with_authors(comments).await
    }

    /// Comment on an existing deal.
    pub async fn create(
        &self,
        deal_id: &str,
        author_id: &str,
        input: CommentInput,
    ) -> AppResult<CommentView> {
        input.validate()?;

        // The deal must exist; commenting does not resurrect deleted deals
        self.deal_repo.get_by_id(deal_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            deal_id: Set(deal_id.to_string()),
            author_id: Set(author_id.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let comment = self.comment_repo.create(model).await?;
        self.with_author(comment).await
    }

    /// Edit a comment (author only).
    pub async fn update(
        &self,
        comment_id: &str,
        actor: &user::Model,
        input: CommentInput,
    ) -> AppResult<CommentView> {
        input.validate()?;

        let comment = self.comment_repo.get_by_id(comment_id).await?;
        policy::check_comment_edit(&comment, actor)?;

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(input.content);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.comment_repo.update(active).await?;
        self.with_author(updated).await
    }

    /// Delete a comment (author or admin).
    pub async fn delete(&self, comment_id: &str, actor: &user::Model) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        policy::check_comment_delete(&comment, actor)?;
        self.comment_repo.delete(comment).await
    }

    async fn with_author(&self, comment: comment::Model) -> AppResult<CommentView> {
        let author = self
            .user_repo
            .find_by_id(&comment.author_id)
            .await?
            .as_ref()
            .map(AuthorView::from);

        Ok(CommentView { comment, author })
    }

    async fn with_authors(&self, comments: Vec<comment::Model>) -> AppResult<Vec<CommentView>> {
        let mut author_ids: Vec<String> = comments.iter().map(|c| c.author_id.clone()).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<String, AuthorView> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id.clone(), AuthorView::from(u)))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned();
                CommentView { comment, author }
            })
            .collect())
    }
}

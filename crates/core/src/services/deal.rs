//! Deal service.

use std::collections::HashMap;

use chrono::Utc;
use hotdeals_common::{AppError, AppResult, IdGenerator};
use hotdeals_db::{
    entities::{
        deal::{self, Category, Status},
        user,
    },
    repositories::{DealRepository, UserRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{pagination, pagination::Page, policy};

/// Reduced author projection embedded in deal and comment responses.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: String,
    pub username: String,
}

impl From<&user::Model> for AuthorView {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

/// A deal together with its resolved author projection.
#[derive(Debug, Clone)]
pub struct DealView {
    pub deal: deal::Model,
    pub author: Option<AuthorView>,
}

/// Input for creating a deal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealInput {
    #[validate(length(min = 5, max = 100, message = "Title must be 5-100 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 500, message = "Description must be 10-500 characters"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: f64,

    #[validate(range(min = 0.0, message = "Original price must be non-negative"))]
    pub original_price: Option<f64>,

    #[validate(length(max = 1024))]
    pub url: Option<String>,

    /// Wire category label; defaults to "Autre" when absent.
    pub category: Option<String>,
}

/// Input for editing a deal. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealInput {
    #[validate(length(min = 5, max = 100, message = "Title must be 5-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 500, message = "Description must be 10-500 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: Option<f64>,

    #[validate(range(min = 0.0, message = "Original price must be non-negative"))]
    pub original_price: Option<f64>,

    #[validate(length(max = 1024))]
    pub url: Option<String>,

    pub category: Option<String>,
}

/// Deal service for business logic.
#[derive(Clone)]
pub struct DealService {
    deal_repo: DealRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl DealService {
    /// Create a new deal service.
    #[must_use]
    pub fn new(deal_repo: DealRepository, user_repo: UserRepository) -> Self {
        Self {
            deal_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new deal. It enters the moderation queue as pending.
    pub async fn create(&self, author_id: &str, input: CreateDealInput) -> AppResult<DealView> {
        input.validate()?;

        let category = parse_category(input.category.as_deref())?;

        let model = deal::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            price: Set(input.price),
            original_price: Set(input.original_price),
            url: Set(input.url),
            category: Set(category),
            status: Set(Status::Pending),
            temperature: Set(0),
            author_id: Set(author_id.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let deal = self.deal_repo.create(model).await?;
        self.with_author(deal).await
    }

    /// Fetch one deal, applying the visibility policy.
    ///
    /// Hidden deals read as not-found so their existence is not confirmed.
    pub async fn get(&self, id: &str, viewer: Option<&user::Model>) -> AppResult<DealView> {
        let deal = self.deal_repo.get_by_id(id).await?;

        if !policy::can_view_deal(&deal, viewer) {
            return Err(AppError::DealNotFound(id.to_string()));
        }

        self.with_author(deal).await
    }

    /// List deals newest-first in the viewer's status scope.
    pub async fn list(
        &self,
        viewer: Option<&user::Model>,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> AppResult<Page<DealView>> {
        let (page, limit, offset) = pagination::normalize(page, limit);
        let all_statuses = policy::sees_all_statuses(viewer);

        let total = self.deal_repo.count(all_statuses).await?;
        let deals = self.deal_repo.find_page(all_statuses, limit, offset).await?;
        let views = self.with_authors(deals).await?;

        Ok(Page::new(page, limit, total, views))
    }

    /// Case-insensitive substring search in the viewer's status scope.
    pub async fn search(
        &self,
        viewer: Option<&user::Model>,
        query: &str,
    ) -> AppResult<Vec<DealView>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation(
                "Query parameter 'q' is required".to_string(),
            ));
        }

        let all_statuses = policy::sees_all_statuses(viewer);
        let deals = self.deal_repo.search(query, all_statuses).await?;
        self.with_authors(deals).await
    }

    /// Edit a deal, subject to the edit policy.
    pub async fn update(
        &self,
        id: &str,
        actor: &user::Model,
        input: UpdateDealInput,
    ) -> AppResult<DealView> {
        input.validate()?;

        let deal = self.deal_repo.get_by_id(id).await?;
        policy::check_deal_edit(&deal, actor)?;

        let category = match input.category.as_deref() {
            Some(value) => Some(
                Category::parse(value)
                    .ok_or_else(|| AppError::Validation("Invalid category".to_string()))?,
            ),
            None => None,
        };

        let mut active: deal::ActiveModel = deal.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(original_price) = input.original_price {
            active.original_price = Set(Some(original_price));
        }
        if let Some(url) = input.url {
            active.url = Set(Some(url));
        }
        if let Some(category) = category {
            active.category = Set(category);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.deal_repo.update(active).await?;
        self.with_author(updated).await
    }

    /// Delete a deal (author or admin).
    pub async fn delete(&self, id: &str, actor: &user::Model) -> AppResult<()> {
        let deal = self.deal_repo.get_by_id(id).await?;
        policy::check_deal_delete(&deal, actor)?;
        self.deal_repo.delete(deal).await
    }

    /// Resolve the author projection for one deal.
    async fn with_author(&self, deal: deal::Model) -> AppResult<DealView> {
        let author = self
            .user_repo
            .find_by_id(&deal.author_id)
            .await?
            .as_ref()
            .map(AuthorView::from);

        Ok(DealView { deal, author })
    }

    /// Resolve author projections for a batch of deals with one lookup.
    async fn with_authors(&self, deals: Vec<deal::Model>) -> AppResult<Vec<DealView>> {
        let mut author_ids: Vec<String> = deals.iter().map(|d| d.author_id.clone()).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<String, AuthorView> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|u| (u.id.clone(), AuthorView::from(u)))
            .collect();

        Ok(deals
            .into_iter()
            .map(|deal| {
                let author = authors.get(&deal.author_id).cloned();
                DealView { deal, author }
            })
            .collect())
    }
}

fn parse_category(value: Option<&str>) -> AppResult<Category> {
    match value {
        None => Ok(Category::Autre),
        Some(v) => {
            Category::parse(v).ok_or_else(|| AppError::Validation("Invalid category".to_string()))
        }
    }
}

//! Deal repository.

use std::sync::Arc;

use crate::entities::{Deal, deal};
use hotdeals_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};

/// Deal repository for database operations.
#[derive(Clone)]
pub struct DealRepository {
    db: Arc<DatabaseConnection>,
}

impl DealRepository {
    /// Create a new deal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a deal by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<deal::Model>> {
        Deal::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a deal by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<deal::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DealNotFound(id.to_string()))
    }

    /// Create a new deal.
    pub async fn create(&self, model: deal::ActiveModel) -> AppResult<deal::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a deal.
    pub async fn update(&self, model: deal::ActiveModel) -> AppResult<deal::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a deal.
    pub async fn delete(&self, model: deal::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get deals newest-first (paginated).
    ///
    /// `all_statuses` widens the scope from approved-only to every status
    /// (moderator/admin listing).
    pub async fn find_page(
        &self,
        all_statuses: bool,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<deal::Model>> {
        let mut query = Deal::find();

        if !all_statuses {
            query = query.filter(deal::Column::Status.eq(deal::Status::Approved));
        }

        query
            .order_by_desc(deal::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count deals in the given status scope.
    pub async fn count(&self, all_statuses: bool) -> AppResult<u64> {
        let mut query = Deal::find();

        if !all_statuses {
            query = query.filter(deal::Column::Status.eq(deal::Status::Approved));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Case-insensitive substring search over title and description.
    pub async fn search(&self, query: &str, all_statuses: bool) -> AppResult<Vec<deal::Model>> {
        let pattern = format!(
            "%{}%",
            query.to_lowercase().replace('%', "\\%").replace('_', "\\_")
        );

        let keyword = Condition::any()
            .add(Expr::expr(Func::lower(Expr::col(deal::Column::Title))).like(pattern.as_str()))
            .add(
                Expr::expr(Func::lower(Expr::col(deal::Column::Description)))
                    .like(pattern.as_str()),
            );
        let mut condition = Condition::all().add(keyword);

        if !all_statuses {
            condition = condition.add(deal::Column::Status.eq(deal::Status::Approved));
        }

        Deal::find()
            .filter(condition)
            .order_by_desc(deal::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all pending deals newest-first (moderation queue).
    pub async fn find_pending(&self) -> AppResult<Vec<deal::Model>> {
        Deal::find()
            .filter(deal::Column::Status.eq(deal::Status::Pending))
            .order_by_desc(deal::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Persist a recomputed temperature (single UPDATE query, no fetch).
    pub async fn set_temperature(&self, deal_id: &str, temperature: i32) -> AppResult<()> {
        Deal::update_many()
            .col_expr(deal::Column::Temperature, Expr::value(temperature))
            .filter(deal::Column::Id.eq(deal_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

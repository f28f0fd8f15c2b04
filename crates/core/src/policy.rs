//! Visibility and authorization rules.
//!
//! Pure decisions over `(resource, actor)` pairs. Services and endpoints call
//! into this module instead of embedding role checks, so every rule lives in
//! one place:
//!
//! - Approved deals are visible to anyone; pending/rejected deals only to
//!   their author or moderator/admin. Everyone else sees not-found, never
//!   forbidden, so hidden deals are indistinguishable from nonexistent ones.
//! - Editing a deal is an ownership question *and* a state question: a
//!   non-author gets `Forbidden`, while the author of a non-pending deal gets
//!   a validation error (the action is invalid in this state, not forbidden).

use hotdeals_common::{AppError, AppResult};
use hotdeals_db::entities::{
    comment, deal,
    user::{self, Role},
};

/// Whether this user may moderate deals.
#[must_use]
pub const fn is_moderator(actor: &user::Model) -> bool {
    matches!(actor.role, Role::Moderator | Role::Admin)
}

/// Whether this viewer sees deals of every status when listing or searching.
#[must_use]
pub fn sees_all_statuses(viewer: Option<&user::Model>) -> bool {
    viewer.is_some_and(is_moderator)
}

/// Whether this viewer may see this deal at all.
#[must_use]
pub fn can_view_deal(deal: &deal::Model, viewer: Option<&user::Model>) -> bool {
    if deal.status == deal::Status::Approved {
        return true;
    }

    match viewer {
        Some(actor) => actor.id == deal.author_id || is_moderator(actor),
        None => false,
    }
}

/// Check that this actor may edit this deal.
///
/// Admins edit anything; the author only while the deal is still pending.
pub fn check_deal_edit(deal: &deal::Model, actor: &user::Model) -> AppResult<()> {
    if actor.role == Role::Admin {
        return Ok(());
    }

    if actor.id != deal.author_id {
        return Err(AppError::Forbidden("You cannot edit this deal".to_string()));
    }

    if deal.status != deal::Status::Pending {
        return Err(AppError::Validation(
            "Deals can only be edited while they are pending".to_string(),
        ));
    }

    Ok(())
}

/// Check that this actor may delete this deal (author or admin).
pub fn check_deal_delete(deal: &deal::Model, actor: &user::Model) -> AppResult<()> {
    if actor.id == deal.author_id || actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only delete your own deals".to_string(),
        ))
    }
}

/// Check that this actor may moderate deals (approve/reject, pending queue).
pub fn require_moderation(actor: &user::Model) -> AppResult<()> {
    if is_moderator(actor) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

/// Check that this actor may manage users (admin only).
pub fn require_admin(actor: &user::Model) -> AppResult<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

/// Check that this actor may edit this comment (author only).
pub fn check_comment_edit(comment: &comment::Model, actor: &user::Model) -> AppResult<()> {
    if actor.id == comment.author_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only edit your own comments".to_string(),
        ))
    }
}

/// Check that this actor may delete this comment (author or admin).
pub fn check_comment_delete(comment: &comment::Model, actor: &user::Model) -> AppResult<()> {
    if actor.id == comment.author_id || actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only delete your own comments".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hotdeals_db::entities::deal::{Category, Status};

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

    fn test_deal(id: &str, author_id: &str, status: Status) -> deal::Model {
        deal::Model {
            id: id.to_string(),
            title: "A deal worth seeing".to_string(),
            description: "Longer description here".to_string(),
            price: 10.0,
            original_price: None,
            url: None,
            category: Category::Autre,
            status,
            temperature: 0,
            author_id: author_id.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_comment(id: &str, author_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            content: "nice".to_string(),
            deal_id: "d1".to_string(),
            author_id: author_id.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_approved_deal_visible_to_everyone() {
        let deal = test_deal("d1", "author", Status::Approved);
        let stranger = test_user("stranger", Role::User);

        assert!(can_view_deal(&deal, None));
        assert!(can_view_deal(&deal, Some(&stranger)));
    }

    #[test]
    fn test_pending_deal_hidden_from_outsiders() {
        let deal = test_deal("d1", "author", Status::Pending);
        let stranger = test_user("stranger", Role::User);

        assert!(!can_view_deal(&deal, None));
        assert!(!can_view_deal(&deal, Some(&stranger)));
    }

    #[test]
    fn test_pending_deal_visible_to_author_and_staff() {
        let deal = test_deal("d1", "author", Status::Pending);
        let author = test_user("author", Role::User);
        let moderator = test_user("mod", Role::Moderator);
        let admin = test_user("admin", Role::Admin);

        assert!(can_view_deal(&deal, Some(&author)));
        assert!(can_view_deal(&deal, Some(&moderator)));
        assert!(can_view_deal(&deal, Some(&admin)));
    }

    #[test]
    fn test_rejected_deal_hidden_like_pending() {
        let deal = test_deal("d1", "author", Status::Rejected);
        let stranger = test_user("stranger", Role::User);
        let author = test_user("author", Role::User);

        assert!(!can_view_deal(&deal, Some(&stranger)));
        assert!(can_view_deal(&deal, Some(&author)));
    }

    #[test]
    fn test_listing_scope() {
        let plain = test_user("u", Role::User);
        let moderator = test_user("m", Role::Moderator);

        assert!(!sees_all_statuses(None));
        assert!(!sees_all_statuses(Some(&plain)));
        assert!(sees_all_statuses(Some(&moderator)));
    }

    #[test]
    fn test_author_edits_only_while_pending() {
        let author = test_user("author", Role::User);

        let pending = test_deal("d1", "author", Status::Pending);
        assert!(check_deal_edit(&pending, &author).is_ok());

        let approved = test_deal("d1", "author", Status::Approved);
        match check_deal_edit(&approved, &author) {
            Err(AppError::Validation(_)) => {}
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_author_edit_is_forbidden() {
        let deal = test_deal("d1", "author", Status::Pending);
        let other = test_user("other", Role::User);
        let moderator = test_user("mod", Role::Moderator);

        // A moderator moderates, they do not edit other people's deals
        assert!(matches!(
            check_deal_edit(&deal, &other),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            check_deal_edit(&deal, &moderator),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_edits_any_state() {
        let admin = test_user("admin", Role::Admin);
        let rejected = test_deal("d1", "author", Status::Rejected);

        assert!(check_deal_edit(&rejected, &admin).is_ok());
    }

    #[test]
    fn test_delete_gated_to_author_or_admin() {
        let deal = test_deal("d1", "author", Status::Approved);
        let author = test_user("author", Role::User);
        let admin = test_user("admin", Role::Admin);
        let moderator = test_user("mod", Role::Moderator);

        assert!(check_deal_delete(&deal, &author).is_ok());
        assert!(check_deal_delete(&deal, &admin).is_ok());
        assert!(matches!(
            check_deal_delete(&deal, &moderator),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_moderation_requires_moderator_or_admin() {
        assert!(require_moderation(&test_user("m", Role::Moderator)).is_ok());
        assert!(require_moderation(&test_user("a", Role::Admin)).is_ok());
        assert!(matches!(
            require_moderation(&test_user("u", Role::User)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_role_management_is_admin_only() {
        assert!(require_admin(&test_user("a", Role::Admin)).is_ok());
        assert!(matches!(
            require_admin(&test_user("m", Role::Moderator)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_comment_edit_is_author_only() {
        let comment = test_comment("c1", "author");
        let author = test_user("author", Role::User);
        let admin = test_user("admin", Role::Admin);

        assert!(check_comment_edit(&comment, &author).is_ok());
        // Even admins do not rewrite other people's words
        assert!(matches!(
            check_comment_edit(&comment, &admin),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_comment_delete_allows_admin() {
        let comment = test_comment("c1", "author");
        let author = test_user("author", Role::User);
        let admin = test_user("admin", Role::Admin);
        let other = test_user("other", Role::User);

        assert!(check_comment_delete(&comment, &author).is_ok());
        assert!(check_comment_delete(&comment, &admin).is_ok());
        assert!(matches!(
            check_comment_delete(&comment, &other),
            Err(AppError::Forbidden(_))
        ));
    }
}

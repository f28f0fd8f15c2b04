//! Business services.

pub mod auth;
pub mod comment;
pub mod deal;
pub mod moderation;
pub mod user;
pub mod vote;

pub use auth::{AuthService, LoginInput, RegisterInput};
pub use comment::{CommentInput, CommentService, CommentView};
pub use deal::{AuthorView, CreateDealInput, DealService, DealView, UpdateDealInput};
pub use moderation::{AuthorContact, ModerationService, PendingDealView};
pub use user::UserService;
pub use vote::{VoteService, VoteStats};

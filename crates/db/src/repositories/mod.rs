//! Repositories for database access.

pub mod comment;
pub mod deal;
pub mod user;
pub mod vote;

pub use comment::CommentRepository;
pub use deal::DealRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;

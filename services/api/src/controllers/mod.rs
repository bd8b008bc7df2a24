//! Controllers orchestrating validation outcomes, ownership checks,
//! repository calls, and domain error translation
//!
//! Read-check-write sequences (load, verify owner, mutate) run inside a
//! single transaction with the loaded row locked, so a concurrent mutation
//! cannot slip between the check and the write.

use chrono::NaiveDate;

pub mod account;
pub mod comment;
pub mod post;

pub use account::AccountsController;
pub use comment::CommentsController;
pub use post::PostsController;

/// Current date, the granularity the entity timestamps use
pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

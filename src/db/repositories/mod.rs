//! Table-level queries. Every repository borrows a connection or an open
//! transaction, so callers decide the transaction boundary.

pub mod comment;
pub mod post;
pub mod user;
pub mod vote;

pub use comment::CommentRepository;
pub use post::PostRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;

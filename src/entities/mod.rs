pub mod prelude;

pub mod comments;
pub mod posts;
pub mod users;
pub mod votes;

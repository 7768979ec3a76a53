mod like;
mod post;
mod user;

pub use like::Like;
pub use post::{Post, PostType};
pub use user::User;

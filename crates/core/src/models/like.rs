use serde::{Deserialize, Serialize};
use sns_database::SqlxObject;

use super::{Post, User};

/// One user's like of one post. The composite key allows a single row per pair.
#[derive(Debug, Serialize, Deserialize, Clone, Default, SqlxObject)]
#[table_name = "posts_users_users"]
#[primary_key(columns = "post_id, user_id")]
pub struct Like {
    #[column_name = "postsId"]
    #[indexed]
    #[foreign_key(referenced_table = "posts", related_rust_type = "Post", on_delete = "CASCADE", on_update = "CASCADE")]
    pub post_id: i32,

    #[column_name = "usersId"]
    #[indexed]
    #[foreign_key(referenced_table = "users", related_rust_type = "User")]
    pub user_id: i32,
}

impl Like {
    pub fn new(post_id: i32, user_id: i32) -> Self {
        Self { post_id, user_id }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use sns_database::SqlxObject;

use super::User;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Display, EnumString, Default)]
pub enum PostType {
    #[default]
    #[serde(rename = "post")]
    #[strum(serialize = "post")]
    Post,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, SqlxObject)]
#[table_name = "posts"]
pub struct Post {
    pub id: i32,

    #[column_type = "VARCHAR(255)"]
    pub content: String,

    #[column_name = "type"]
    #[column_default = "'post'"]
    #[check = "\"type\" IN ('post')"]
    pub post_type: PostType,

    #[column_default = "CURRENT_TIMESTAMP"]
    #[db_managed]
    pub posted_at: DateTime<Utc>,

    #[column_name = "userId"]
    #[foreign_key(referenced_table = "users", related_rust_type = "User")]
    pub user_id: i32,
}

impl Post {
    pub fn new(content: impl Into<String>, user_id: i32) -> Self {
        Self {
            content: content.into(),
            post_type: PostType::Post,
            user_id,
            ..Default::default()
        }
    }

    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sns_database::SqlxSchema;

    #[test]
    fn test_post_type_text() {
        assert_eq!(PostType::Post.to_string(), "post");
        assert_eq!("post".parse::<PostType>().unwrap(), PostType::Post);
        assert_eq!(serde_json::to_string(&PostType::Post).unwrap(), "\"post\"");
    }

    #[test]
    fn test_posts_table() {
        assert_eq!(Post::COLUMNS, &["id", "content", "type", "posted_at", "userId"]);
        let ddl = Post::create_table_sql();
        assert!(ddl.contains("\"type\" TEXT NOT NULL DEFAULT 'post' CHECK (\"type\" IN ('post'))"));
        assert!(ddl.contains("FOREIGN KEY (\"userId\") REFERENCES \"users\"(\"id\") ON DELETE NO ACTION ON UPDATE NO ACTION"));
        assert_eq!(
            Post::insert_sql(),
            "INSERT INTO \"posts\" (\"content\", \"type\", \"userId\") VALUES ($1, $2, $3) RETURNING \"id\", \"content\", \"type\", \"posted_at\", \"userId\""
        );
    }

    #[test]
    fn test_ownership() {
        let alice = User { id: 1, username: "alice".into(), ..Default::default() };
        let bob = User { id: 2, username: "bob".into(), ..Default::default() };
        let post = Post::new("hello world", alice.id);
        assert!(post.is_owned_by(&alice));
        assert!(!post.is_owned_by(&bob));
    }
}

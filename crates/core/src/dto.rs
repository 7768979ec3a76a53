use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::PostType;

pub const DEFAULT_LIST_OFFSET: i64 = 0;
pub const DEFAULT_LIST_LIMIT: i64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostUserDto {
    pub username: String,
    pub icon_image: String,
}

/// Wire view of a post, from the point of view of the requesting user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: i32,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub content: String,
    pub user: PostUserDto,
    pub posted_at: DateTime<Utc>,
    pub like_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostList {
    #[serde(rename = "Items")]
    pub items: Vec<PostDto>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeResult {
    pub like_count: i64,
    pub is_liked: bool,
}

/// `offset` / `limit` of a post listing. Missing or zero values fall back to the defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
    #[validate(range(min = 0))]
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset: Some(offset), limit: Some(limit) }
    }

    pub fn offset(&self) -> i64 {
        match self.offset {
            Some(offset) if offset > 0 => offset,
            _ => DEFAULT_LIST_OFFSET,
        }
    }

    pub fn limit(&self) -> i64 {
        match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_LIST_LIMIT,
        }
    }
}

/// Body of post creation and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostContentRequest {
    #[validate(length(min = 1, max = 255))]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct LikeRequest {
    #[validate(range(min = 1))]
    pub postid: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ProfileBody {
    #[validate(length(max = 1024))]
    pub profile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IconBody {
    pub icon_image: String,
}

mod cache;
mod client;
mod error;
mod hooks;
mod session;

pub use cache::{
    CacheKey, QueryCache, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, ICON, OWNER_POSTS, POSTS, PROFILE,
};
pub use client::ApiClient;
pub use error::ClientError;
pub use session::{is_owner, Session};

pub use sns_core::{IconBody, LikeResult, ListQuery, PostDto, PostList, PostUserDto, ProfileBody};

mod dto;
mod error;
mod icon_store;
mod models;

pub mod services;

pub use dto::*;
pub use error::SnsError;
pub use icon_store::{IconStore, MemoryIconStore};
pub use models::{Like, Post, PostType, User};

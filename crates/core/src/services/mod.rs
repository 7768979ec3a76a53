//! Operations behind the REST routes. Each takes the connection of the
//! caller's transaction; committing is left to the caller.

pub mod icons;
pub mod likes;
pub mod posts;
pub mod users;

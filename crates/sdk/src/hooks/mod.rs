//! Data-access calls behind the screens of the app: feed, posting, liking,
//! profile and icon editing. Reads go through the [`QueryCache`](crate::QueryCache);
//! mutations refresh or invalidate the entries they affect and then run the
//! caller's `on_success` callback, if any.

mod icons;
mod likes;
mod posts;
mod profiles;

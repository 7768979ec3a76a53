mod icon_bucket;
mod postgres;

pub use icon_bucket::{IconBucket, IconBucketClient};
pub use postgres::PostgresClient;

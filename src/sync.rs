pub mod feed_sync_job;
pub mod filter;
pub mod post_builder;
pub mod reader;

pub use feed_sync_job::{FeedSyncError, FeedSyncJob, SyncOutcome};
pub use reader::{FetchedFeed, FetchedFeedItem};

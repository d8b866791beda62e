pub mod fetcher;
pub mod models;
pub mod parser;

pub use fetcher::{FeedFetcher, FetchSource};
pub use models::{FetchedFeed, Item, Source};
pub use parser::parse_feed;

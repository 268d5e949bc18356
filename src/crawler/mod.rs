pub mod email_extractor;
pub mod fetcher;
pub mod path_prober;
pub mod site_crawler;
pub mod site_processor;
pub mod url_utils;

pub use fetcher::{FetchError, FetchedPage, PageFetcher};
pub use site_crawler::SiteCrawler;
pub use site_processor::SiteProcessor;

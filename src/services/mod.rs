pub mod allowlist;
pub mod canonical;
pub mod dates;
pub mod images;
pub mod news;

pub use news::NewsService;

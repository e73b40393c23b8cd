pub mod news;

pub use news::{NewsRecord, RawResult};

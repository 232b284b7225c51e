pub mod accumulator;
pub mod history;
pub mod source;

pub use accumulator::{CandleAccumulator, OverlapPolicy};
pub use history::{FetchConfig, HistoryFetcher, HistoryRequest};
pub use source::CandleSource;

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::coinbase;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Candle source error: {0}")]
    Source(#[from] coinbase::Error),
    #[error("No overlap with the last accumulated candle at {time2} in latest {market} candles")]
    NoOverlap { market: String, time2: String },
    #[error("Table error: {0}")]
    Table(#[from] PolarsError),
    #[error("Missing value in column {column} at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

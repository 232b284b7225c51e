use std::fmt;
use std::fs::File;
use std::path::Path;

use log::debug;
use polars::prelude::*;

use crate::models::Candle;
use crate::{Error, Result};

pub const INDEX: &str = "index";
pub const TIME: &str = "Time";
pub const LOW: &str = "Low";
pub const HIGH: &str = "High";
pub const OPEN: &str = "Open";
pub const CLOSE: &str = "Close";
pub const VOL: &str = "Vol";
pub const TIME2: &str = "Time2";

/// Assembled candles in tabular form, as written to and read from disk.
///
/// A table read from a file is kept verbatim; column presence is only
/// checked when the rows are consumed through [`CandleTable::candles`].
#[derive(Debug, Clone)]
pub struct CandleTable {
    frame: DataFrame,
}

impl CandleTable {
    pub fn from_candles(candles: &[Candle]) -> Result<Self> {
        let frame = df!(
            INDEX => (0..candles.len() as i64).collect::<Vec<i64>>(),
            TIME => candles.iter().map(|c| c.time).collect::<Vec<i64>>(),
            LOW => candles.iter().map(|c| c.low).collect::<Vec<f64>>(),
            HIGH => candles.iter().map(|c| c.high).collect::<Vec<f64>>(),
            OPEN => candles.iter().map(|c| c.open).collect::<Vec<f64>>(),
            CLOSE => candles.iter().map(|c| c.close).collect::<Vec<f64>>(),
            VOL => candles.iter().map(|c| c.volume).collect::<Vec<f64>>(),
            TIME2 => candles.iter().map(Candle::time2).collect::<Vec<Option<String>>>()
        )?;
        Ok(Self { frame })
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(file)
            .finish()?;
        debug!("Read {} rows from {}", frame.height(), path.display());
        Ok(Self { frame })
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        let mut frame = self.frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)?;
        debug!("Wrote {} rows to {}", frame.height(), path.display());
        Ok(())
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows as candles. Fails if any of the price columns is absent or holds nulls.
    pub fn candles(&self) -> Result<Vec<Candle>> {
        let time = self.int_column(TIME)?;
        let low = self.float_column(LOW)?;
        let high = self.float_column(HIGH)?;
        let open = self.float_column(OPEN)?;
        let close = self.float_column(CLOSE)?;
        let volume = self.float_column(VOL)?;

        Ok((0..time.len())
            .map(|i| Candle::new(time[i], low[i], high[i], open[i], close[i], volume[i]))
            .collect())
    }

    fn int_column(&self, name: &str) -> Result<Vec<i64>> {
        let series = self
            .frame
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Int64)?;
        series
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| value.ok_or_else(|| missing(name, row)))
            .collect()
    }

    fn float_column(&self, name: &str) -> Result<Vec<f64>> {
        let series = self
            .frame
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        series
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| value.ok_or_else(|| missing(name, row)))
            .collect()
    }
}

fn missing(column: &str, row: usize) -> Error {
    Error::MissingValue {
        column: column.to_string(),
        row,
    }
}

impl fmt::Display for CandleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

pub mod cli;
pub mod coinbase;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod services;

pub use errors::{Error, Result};

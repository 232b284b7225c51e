pub mod candle;
pub mod table;
pub mod window;

pub use candle::Candle;
pub use table::CandleTable;
pub use window::Window;

pub mod candle;
pub mod opportunity;

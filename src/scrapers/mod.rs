pub mod base;
pub mod holdings;
pub mod returns;
pub mod movers;
pub mod treasury;
pub mod currency;
pub mod dividends;

pub mod decimal;
pub mod types;

pub use decimal::Decimal;
pub use types::{Order, Side, TaskId, Trade, TradeParty, TypeError};

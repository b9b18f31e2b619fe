pub mod seat;
pub mod order;
pub mod buyer;

pub use seat::{Seat, SeatId};
pub use order::{format_price, OrderRecord, OrderSummary, OrderSummaryLine, PersistedSelection};
pub use buyer::{BuyerDetails, PaymentMethod};

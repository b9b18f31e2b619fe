pub mod selection;
pub mod notify;
pub mod checkout;

pub use selection::{EnginePhase, SeatSelectionEngine};
pub use notify::{LoggingObserver, NoopObserver, RecordingObserver, SelectionEvent, SelectionObserver};

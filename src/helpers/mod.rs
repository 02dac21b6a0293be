pub mod clock;
pub mod retry;
pub mod time_format;

pub use clock::{Clock, ManualClock, SystemClock};
pub use retry::{RetryHandler, RetryPolicy};

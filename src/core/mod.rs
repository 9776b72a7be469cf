pub mod scheduler;
pub mod time;
pub mod utils;

pub use scheduler::{MaterializedEntry, RunReport, Scheduler, TemplateFailure};
pub use time::{Clock, FixedClock, SystemClock};

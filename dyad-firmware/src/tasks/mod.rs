//! Async tasks, split by the core they run on.
//!
//! `producer` and `bootsel` run on core 0's executor; `indicator` runs on
//! core 1's.

mod bootsel;
mod indicator;
mod producer;

pub use bootsel::bootsel_task;
pub use indicator::indicator_task;
pub use producer::producer_task;

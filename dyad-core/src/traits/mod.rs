//! Hardware abstraction traits

pub mod display;
pub mod fifo;

pub use display::{DisplayError, TextPanel};
pub use fifo::{WordFifo, FIFO_DEPTH};

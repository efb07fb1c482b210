//! Board-agnostic core logic for the Dyad environmental monitor
//!
//! This crate contains all policy that does not touch RP2040 hardware:
//!
//! - Hardware abstraction traits (inter-core word FIFO, text panel)
//! - Producer sampling cycle (stale-value retention, validity gating)
//! - Consumer drain protocol for the edge-notified FIFO
//! - Cross-core health flag and indicator mapping
//! - Fixed-format display rendering
//!
//! Everything here runs on the host under `cargo test`; the test-only
//! `sim` module provides doubles with the hardware FIFO's depth and
//! notification semantics.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod drain;
pub mod health;
pub mod render;
pub mod sampler;
#[cfg(test)]
pub mod sim;
pub mod traits;

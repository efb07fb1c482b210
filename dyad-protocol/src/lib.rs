//! Inter-core FIFO message protocol
//!
//! This crate defines the word-level protocol the two RP2040 cores use to
//! exchange measurements over the SIO inter-core FIFO. The FIFO transports
//! bare 32-bit words, eight deep, strictly in order; everything above that
//! is defined here.
//!
//! # Protocol Overview
//!
//! Every message starts with a tagged word (tag in bits 31:28). Two shapes
//! exist:
//!
//! ```text
//! scalar sample:   ┌─────┬──────────────┬────────────┐
//!                  │ 0x1 │   reserved   │ raw (12 b) │   1 word
//!                  └─────┴──────────────┴────────────┘
//!
//! report burst:    ┌─────┬───────┬─────┬────┐
//!                  │ 0x2 │ count │ seq │ ok │   header
//!                  ├─────┴───────┴─────┴────┤
//!                  │ temperature (f32 bits) │
//!                  │ humidity    (f32 bits) │
//!                  │ pressure    (f32 bits) │
//!                  ├────────────────────────┤
//!                  │ XOR checksum           │   5 words total
//!                  └────────────────────────┘
//! ```
//!
//! The report burst copies the whole record *by value* into the channel.
//! An earlier revision of this design pushed a pointer to a producer-owned
//! struct instead; the consumer then raced the producer's next write and
//! could observe a torn record. Copy-on-push removes that hazard: once the
//! words are in the FIFO the producer may overwrite its record freely.
//!
//! A burst always fits the 8-deep hardware FIFO, and the single producer
//! pushes its words contiguously, so the decoder only has to survive being
//! woken mid-burst, not interleaving.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod codec;
pub mod message;
pub mod report;

pub use codec::{DecodeError, WordDecoder, WordEncoder};
pub use message::{Message, ADC_MAX_COUNT, MAX_MESSAGE_WORDS, REPORT_BURST_WORDS};
pub use report::SensorReport;

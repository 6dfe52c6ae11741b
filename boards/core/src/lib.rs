//! Core traits and types for the xmg-kb keyboard abstraction.
//!
//! This crate provides:
//! - The `Transport` trait, the two USB primitives the lighting protocol is built on
//! - Static device identity (`BoardInfo`)
//! - The shared error taxonomy (`KeyboardError`) and `Result` alias

mod board;
mod error;

pub use board::{BoardInfo, Transport, BULK_PAYLOAD_LEN, CONTROL_PACKET_LEN};
pub use error::{KeyboardError, Result};

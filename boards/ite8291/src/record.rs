//! In-memory transport that records transfers instead of sending them.
//!
//! Used for dry runs and for checking transfer ordering without hardware.

use std::fmt::Display;

use xmg_kb_core::{KeyboardError, Result, Transport, BULK_PAYLOAD_LEN, CONTROL_PACKET_LEN};

/// One recorded primitive call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Control([u8; CONTROL_PACKET_LEN]),
    Bulk {
        times: usize,
        payload: [u8; BULK_PAYLOAD_LEN],
    },
}

impl Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transfer::Control(packet) => write!(f, "control {}", hex(packet)),
            Transfer::Bulk { times, payload } => {
                write!(f, "bulk    {times}x {}", hex(&payload[..16]))?;
                write!(f, " ... ({} bytes)", payload.len())
            },
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Transport that keeps every transfer in order
#[derive(Debug, Default)]
pub struct Recorder {
    transfers: Vec<Transfer>,
    fail_at: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose `index`th primitive call (0 based) fails with a pipe error
    pub fn failing_at(index: usize) -> Self {
        Self {
            transfers: Vec::new(),
            fail_at: Some(index),
        }
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn into_transfers(self) -> Vec<Transfer> {
        self.transfers
    }

    fn push(&mut self, transfer: Transfer) -> Result<()> {
        if self.fail_at == Some(self.transfers.len()) {
            return Err(KeyboardError::TransferFailure(rusb::Error::Pipe));
        }
        self.transfers.push(transfer);
        Ok(())
    }
}

impl Transport for Recorder {
    fn control_write(&mut self, packet: &[u8; CONTROL_PACKET_LEN]) -> Result<()> {
        self.push(Transfer::Control(*packet))
    }

    fn bulk_write(&mut self, times: usize, payload: &[u8; BULK_PAYLOAD_LEN]) -> Result<()> {
        self.push(Transfer::Bulk {
            times,
            payload: *payload,
        })
    }
}

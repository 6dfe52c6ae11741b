//! rusb backed transport for the keyboard's lighting interface.

use std::time::Duration;

use rusb::{Device, DeviceHandle, Direction, GlobalContext, TransferType};
use tracing::{debug, info, warn};
use xmg_kb_core::{
    BoardInfo, KeyboardError, Result, Transport, BULK_PAYLOAD_LEN, CONTROL_PACKET_LEN,
};

use crate::abi;

/// Interface carrying the lighting endpoints
pub const INTERFACE: u8 = 1;

/// Per transfer timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Claimed lighting interface of one keyboard
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
    endpoint: u8,
    transfer_type: TransferType,
    timeout: Duration,
}

impl UsbTransport {
    /// Find the device matching `info`, detach any kernel driver and claim the lighting interface
    pub fn open(info: &BoardInfo, timeout: Duration) -> Result<Self> {
        let device = rusb::devices()
            .map_err(KeyboardError::Transport)?
            .iter()
            .find(|d| {
                d.device_descriptor().is_ok_and(|desc| {
                    desc.vendor_id() == info.vendor_id && desc.product_id() == info.product_id
                })
            })
            .ok_or(KeyboardError::DeviceNotFound {
                vendor_id: info.vendor_id,
                product_id: info.product_id,
            })?;

        let (endpoint, transfer_type) = out_endpoint(&device)?;
        let handle = device.open().map_err(KeyboardError::Transport)?;

        #[cfg(not(target_os = "windows"))]
        if handle.kernel_driver_active(INTERFACE).unwrap_or(false) {
            warn!(interface = INTERFACE, "detaching kernel driver");
            handle
                .detach_kernel_driver(INTERFACE)
                .map_err(KeyboardError::Transport)?;
        }
        handle
            .claim_interface(INTERFACE)
            .map_err(KeyboardError::Transport)?;

        info!(
            "opened {} ({:04x}:{:04x}), endpoint {endpoint:#04x}",
            info.name, info.vendor_id, info.product_id
        );
        Ok(Self {
            handle,
            endpoint,
            transfer_type,
            timeout,
        })
    }

    /// Release the claimed interface
    pub fn close(self) -> Result<()> {
        self.handle
            .release_interface(INTERFACE)
            .map_err(KeyboardError::Transport)?;
        info!("released interface {INTERFACE}");
        Ok(())
    }

    fn write_payload(&mut self, payload: &[u8]) -> rusb::Result<usize> {
        match self.transfer_type {
            TransferType::Interrupt => {
                self.handle
                    .write_interrupt(self.endpoint, payload, self.timeout)
            },
            _ => self.handle.write_bulk(self.endpoint, payload, self.timeout),
        }
    }
}

/// First outgoing endpoint of the lighting interface, with the transfer type it advertises
fn out_endpoint(device: &Device<GlobalContext>) -> Result<(u8, TransferType)> {
    let config = device
        .active_config_descriptor()
        .map_err(KeyboardError::Transport)?;
    for interface in config.interfaces().filter(|i| i.number() == INTERFACE) {
        for descriptor in interface.descriptors().filter(|d| d.setting_number() == 0) {
            if let Some(ep) = descriptor
                .endpoint_descriptors()
                .find(|ep| ep.direction() == Direction::Out)
            {
                return Ok((ep.address(), ep.transfer_type()));
            }
        }
    }
    Err(KeyboardError::Transport(rusb::Error::NotFound))
}

/// Treat a short write as an io failure
fn check_len(written: usize, expected: usize) -> Result<()> {
    if written == expected {
        Ok(())
    } else {
        Err(KeyboardError::TransferFailure(rusb::Error::Io))
    }
}

impl Transport for UsbTransport {
    fn control_write(&mut self, packet: &[u8; CONTROL_PACKET_LEN]) -> Result<()> {
        debug!("control {packet:02x?}");
        let written = self
            .handle
            .write_control(
                abi::REQUEST_TYPE,
                abi::REQUEST,
                abi::VALUE,
                abi::INDEX,
                packet,
                self.timeout,
            )
            .map_err(KeyboardError::TransferFailure)?;
        check_len(written, packet.len())
    }

    fn bulk_write(&mut self, times: usize, payload: &[u8; BULK_PAYLOAD_LEN]) -> Result<()> {
        debug!("bulk x{times} {payload:02x?}");
        for _ in 0..times {
            let written = self
                .write_payload(payload)
                .map_err(KeyboardError::TransferFailure)?;
            check_len(written, payload.len())?;
        }
        Ok(())
    }
}

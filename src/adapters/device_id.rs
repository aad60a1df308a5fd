//! Device identity.
//!
//! The assistant session registers this device instance under a short ID
//! and device actions are matched against it.  The ID is `VH-` followed by
//! the last three bytes of the factory eFuse MAC in uppercase hex, so it
//! survives reboots and reflashing.

use core::fmt::{self, Write};

use crate::drivers::hw_init::HwInitError;

pub const DEVICE_ID_PREFIX: &str = "VH-";

/// `VH-XXYYZZ`, with room to spare.
pub type DeviceIdString = heapless::String<16>;

pub type MacAddress = [u8; 6];

#[cfg(target_os = "espidf")]
pub fn read_mac() -> Result<MacAddress, HwInitError> {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: writes exactly 6 bytes into `mac`.
    let ret = unsafe { esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) };
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        return Err(HwInitError::MacReadFailed(ret));
    }
    Ok(mac)
}

/// Simulation: a fixed MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> Result<MacAddress, HwInitError> {
    Ok([0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE])
}

/// Format the device ID for `mac`.
pub fn device_id(mac: &MacAddress) -> Result<DeviceIdString, fmt::Error> {
    let mut id = DeviceIdString::new();
    id.write_str(DEVICE_ID_PREFIX)?;
    for byte in &mac[3..] {
        write!(id, "{byte:02X}")?;
    }
    Ok(id)
}

// Purpose - device output: cpal stream construction and lifecycle.

pub mod config;
pub mod device;

pub use config::OutputConfig;
pub use device::{list_output_devices, DeviceInfo, HapticOutput};

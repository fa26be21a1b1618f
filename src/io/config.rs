use serde::{Deserialize, Serialize};

/// Output device configuration.
///
/// The signal is mono; `channels` only controls how many copies of each
/// frame the adapter writes. Tactile transducers wired to a stereo amp
/// typically want 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output device name; `None` selects the system default.
    pub device: Option<String>,
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_size: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: 48_000,
            channels: 2,
            buffer_size: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_a_partial_document() {
        let config: OutputConfig =
            serde_json::from_str(r#"{ "device": "Bass Shaker" }"#).unwrap();
        assert_eq!(config.device.as_deref(), Some("Bass Shaker"));
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 2);
    }
}

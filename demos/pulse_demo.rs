//! Plays a handful of built-in patterns through the default output device.
//!
//! Run with: cargo run --example pulse_demo
//!
//! Hook a tactile transducer (or ordinary speakers, turned up) to the
//! default output and you should feel/hear an impact, a heartbeat, and a
//! thud-then-rumble sequence in order.

use std::thread;
use std::time::Duration;

use tactor_dsp::io::{list_output_devices, HapticOutput, OutputConfig};
use tactor_dsp::pattern::library::PatternLibrary;
use tactor_dsp::{Mixer, TactorError};

fn main() -> Result<(), TactorError> {
    env_logger::init();

    match list_output_devices() {
        Ok(devices) => {
            println!("output devices:");
            for device in &devices {
                let marker = if device.is_default { " (default)" } else { "" };
                println!("  {}{}", device.name, marker);
            }
        }
        Err(err) => println!("could not enumerate devices: {err}"),
    }

    let library = PatternLibrary::builtin();
    let mixer = Mixer::new(48_000.0).with_rate_limiter(Duration::from_millis(50));

    let mut output = match HapticOutput::open(mixer.clone(), OutputConfig::default()) {
        Ok(output) => output,
        Err(err) => {
            // Headless machines land here; nothing to demo without a device.
            println!("no usable output device: {err}");
            return Ok(());
        }
    };

    for name in ["impact", "heartbeat", "thud_then_rumble"] {
        let pattern = library
            .get(name)
            .ok_or_else(|| TactorError::UnknownPattern(name.to_string()))?;
        println!("playing '{name}' ({}ms)", pattern.duration_ms);
        output.trigger(pattern, Some(name))?;
        thread::sleep(Duration::from_millis(pattern.duration_ms as u64 + 400));
    }

    // Two overlapping triggers mix into one stream.
    println!("playing 'sustained' with an 'impact' on top");
    let sustained = library.get("sustained").cloned().unwrap_or_default();
    let impact = library.get("impact").cloned().unwrap_or_default();
    output.trigger(&sustained, Some("sustained"))?;
    thread::sleep(Duration::from_millis(500));
    output.trigger(&impact, Some("impact"))?;
    thread::sleep(Duration::from_millis(1500));

    output.stop()?;
    Ok(())
}

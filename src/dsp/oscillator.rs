use serde::{Deserialize, Serialize};

/*
Waveform Generation
===================

Every haptic voice bottoms out here: a single oscillator producing one
cycle-continuous mono sample stream at a fixed frequency and amplitude.

Vocabulary
----------

  phase         Where we are within the current cycle, measured in radians.
                phase = 2π · f · n / sample_rate + phase_offset

  cycle         One full period of the waveform. At 40 Hz and 48 kHz one
                cycle spans 1200 samples.

  phase offset  A constant added to the phase, set in degrees by pattern
                authors. Lets layered oscillators at the same frequency
                reinforce or cancel deliberately.

The oscillator advances a monotonic sample counter rather than accumulating
a phase increment. Accumulation drifts (floating point error compounds every
sample); a counter recomputes the exact phase each time, so layer alignment
stays sample-accurate over arbitrarily long patterns. The counter math runs
in f64 to keep the cycle fraction precise at large counts.

Waveform shapes, all in [-1, 1]:

  Sine       sin(phase). The default for tactile work - no harmonics means
             no audible buzz from the transducer.
  Square     sign(sin(phase)). Harsh, clicky. Good for ticks.
  Triangle   Piecewise-linear, continuous at the wrap point.
  Sawtooth   Linear ramp -1 → 1 over one period.
  Noise      Uniform random via xorshift32, frequency/phase independent.

All outputs are scaled by the clamped amplitude. There are no failure paths:
out-of-range construction inputs are clamped, never rejected.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Noise,
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Sine
    }
}

pub struct OscillatorBlock {
    waveform: Waveform,
    frequency: f32,
    amplitude: f32,
    /// Phase offset in radians.
    phase_offset: f64,
    sample_index: u64,
    noise_state: u32,
}

impl OscillatorBlock {
    /// Create an oscillator. Frequency, amplitude, and phase are clamped to
    /// sane ranges rather than rejected.
    pub fn new(waveform: Waveform, frequency: f32, amplitude: f32, phase_offset_deg: f32) -> Self {
        Self {
            waveform,
            frequency: frequency.clamp(0.0, 20_000.0),
            amplitude: amplitude.clamp(0.0, 1.0),
            phase_offset: (phase_offset_deg as f64).to_radians(),
            sample_index: 0,
            // Any non-zero seed works for xorshift; derive one from the
            // frequency so two noise layers don't emit identical streams.
            noise_state: 0x9E37_79B9 ^ (frequency.to_bits().wrapping_mul(2654435761)) | 1,
        }
    }

    pub fn sine(frequency: f32, amplitude: f32) -> Self {
        Self::new(Waveform::Sine, frequency, amplitude, 0.0)
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Produce the next mono sample and advance the internal counter.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let raw = match self.waveform {
            Waveform::Noise => self.next_noise(),
            _ => {
                let cycles = self.frequency as f64 * self.sample_index as f64
                    / sample_rate as f64
                    + self.phase_offset / std::f64::consts::TAU;
                // Fractional position within the current cycle, [0, 1).
                let frac = (cycles.fract() + 1.0).fract() as f32;
                match self.waveform {
                    Waveform::Sine => (std::f32::consts::TAU * frac).sin(),
                    Waveform::Square => (std::f32::consts::TAU * frac).sin().signum(),
                    Waveform::Triangle => {
                        if frac < 0.5 {
                            4.0 * frac - 1.0
                        } else {
                            3.0 - 4.0 * frac
                        }
                    }
                    Waveform::Sawtooth => 2.0 * frac - 1.0,
                    Waveform::Noise => unreachable!(),
                }
            }
        };
        self.sample_index = self.sample_index.wrapping_add(1);
        raw * self.amplitude
    }

    /// Fill the whole buffer. The stream is logically infinite; callers
    /// enforce duration.
    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }

    /// xorshift32, mapped to [-1, 1].
    #[inline]
    fn next_noise(&mut self) -> f32 {
        let mut x = self.noise_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise_state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

//! Naive waveform shapes driven by a wrapping phase accumulator.
//!
//! Shared by [`Voice`](super::voice::Voice) and [`Lfo`](super::lfo::Lfo):
//! both read the shape at the current phase, then step the phase by
//! `frequency / sample_rate`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Supported waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    #[serde(alias = "saw")]
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Value of this shape at `phase` in [0, 1). Output is in [-1, 1].
    #[inline]
    pub fn sample_at(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        }
    }
}

/// A phase accumulator reading one [`Waveform`].
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            phase: 0.0,
            sample_rate: sample_rate.max(1.0),
        }
    }

    /// Set the sample rate in Hz, floored at 1.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate.max(1.0);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Current phase, always in [0, 1).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Return the shape at the current phase, then advance by
    /// `frequency / sample_rate`. Negative frequencies sweep backwards.
    #[inline]
    pub fn next_sample(&mut self, frequency: f64) -> f64 {
        let value = self.waveform.sample_at(self.phase);
        self.phase = wrap_phase(self.phase + frequency / self.sample_rate);
        value
    }

    /// Reset oscillator phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Fold `phase` back into [0, 1).
///
/// A single add/subtract covers every increment smaller than one cycle;
/// larger jumps fall back to `rem_euclid`. Non-finite input restarts at 0.
#[inline]
fn wrap_phase(phase: f64) -> f64 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = if phase >= 1.0 {
        phase - 1.0
    } else if phase < 0.0 {
        phase + 1.0
    } else {
        return phase;
    };
    if (0.0..1.0).contains(&wrapped) {
        return wrapped;
    }
    // rem_euclid rounds tiny negatives up to exactly 1.0
    let folded = wrapped.rem_euclid(1.0);
    if folded >= 1.0 { 0.0 } else { folded }
}

/// Convert a MIDI note number to frequency using the given tuning pitch.
///
/// `tuning_pitch` is the frequency of A4 (MIDI 69).
/// Formula: `tuning_pitch * 2^((midi - 69) / 12)`
pub fn midi_to_frequency(midi: i32, tuning_pitch: f64) -> f64 {
    tuning_pitch * (2.0_f64).powf((midi as f64 - 69.0) / 12.0)
}

//! Low-frequency oscillator used as a modulation source.

use super::oscillator::{Oscillator, Waveform};

/// A free-running control oscillator producing values in [-1, 1].
///
/// Unlike a voice it has no envelope and its frequency is not clamped:
/// 0 Hz holds a constant value and a negative rate sweeps backwards.
#[derive(Debug, Clone)]
pub struct Lfo {
    oscillator: Oscillator,
    frequency: f64,
}

impl Lfo {
    pub fn new(sample_rate: f64) -> Self {
        Lfo {
            oscillator: Oscillator::new(Waveform::Sine, sample_rate),
            frequency: 1.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.oscillator.set_sample_rate(sample_rate);
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.oscillator.set_waveform(waveform);
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    pub fn phase(&self) -> f64 {
        self.oscillator.phase()
    }

    /// Value at the current phase, then step the phase.
    #[inline]
    pub fn compute_sample(&mut self) -> f64 {
        self.oscillator.next_sample(self.frequency)
    }
}

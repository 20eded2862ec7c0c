//! ADSR Envelope generator.
//!
//! Linear ramps stepped once per sample. Note-on re-enters Attack from
//! whatever level the envelope holds, so retriggering never clicks down to
//! zero first. Release falls at a rate fixed at note-off: the time to reach
//! silence scales with the level the envelope held at that moment.

use serde::{Deserialize, Serialize};

/// A level within this distance of a ramp target counts as having reached it.
///
/// Accumulated rounding would otherwise push a transition one sample late.
const RAMP_EPSILON: f64 = 1e-9;

/// Envelope stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
    Off,
}

/// ADSR settings as carried by configuration and commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level [0, 1].
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        EnvelopeConfig {
            attack: 0.05,
            decay: 0.05,
            sustain: 0.8,
            release: 0.1,
        }
    }
}

/// ADSR Envelope with linear attack/decay/release curves.
#[derive(Debug, Clone)]
pub struct Envelope {
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,

    stage: Stage,
    level: f64,
    sample_rate: f64,
    /// Per-sample decrement, captured at note-off.
    release_step: f64,
}

impl Envelope {
    pub fn new(sample_rate: f64) -> Self {
        Self::with_config(sample_rate, &EnvelopeConfig::default())
    }

    pub fn with_config(sample_rate: f64, config: &EnvelopeConfig) -> Self {
        let mut env = Envelope {
            attack: 0.0,
            decay: 0.0,
            sustain: 0.0,
            release: 0.0,
            stage: Stage::Off,
            level: 0.0,
            sample_rate: sample_rate.max(1.0),
            release_step: 0.0,
        };
        env.apply(config);
        env
    }

    /// Replace all four settings, clamping each.
    pub fn apply(&mut self, config: &EnvelopeConfig) {
        self.set_attack(config.attack);
        self.set_decay(config.decay);
        self.set_sustain(config.sustain);
        self.set_release(config.release);
    }

    pub fn config(&self) -> EnvelopeConfig {
        EnvelopeConfig {
            attack: self.attack,
            decay: self.decay,
            sustain: self.sustain,
            release: self.release,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate.max(1.0);
    }

    pub fn set_attack(&mut self, seconds: f64) {
        self.attack = seconds.max(0.0);
    }

    pub fn set_decay(&mut self, seconds: f64) {
        self.decay = seconds.max(0.0);
    }

    pub fn set_sustain(&mut self, level: f64) {
        self.sustain = clamp_unit(level);
    }

    pub fn set_release(&mut self, seconds: f64) {
        self.release = seconds.max(0.0);
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Current level in [0, 1].
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Trigger the envelope (note on). Keeps the current level.
    pub fn gate_on(&mut self) {
        self.stage = Stage::Attack;
    }

    /// Release the envelope (note off).
    pub fn gate_off(&mut self) {
        if self.release <= 0.0 {
            self.level = 0.0;
            self.stage = Stage::Off;
            return;
        }
        self.release_step = self.level / (self.release * self.sample_rate);
        self.stage = Stage::Release;
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        match self.stage {
            Stage::Attack => {
                if self.attack <= 0.0 {
                    self.enter_decay();
                } else {
                    self.level += 1.0 / (self.attack * self.sample_rate);
                    if self.level >= 1.0 - RAMP_EPSILON {
                        self.enter_decay();
                    }
                }
            }
            Stage::Decay => {
                if self.decay <= 0.0 {
                    self.enter_sustain();
                } else {
                    self.level -= (1.0 - self.sustain) / (self.decay * self.sample_rate);
                    if self.level <= self.sustain + RAMP_EPSILON {
                        self.enter_sustain();
                    }
                }
            }
            Stage::Sustain => {
                self.level = self.sustain;
            }
            Stage::Release => {
                self.level -= self.release_step;
                if self.level <= RAMP_EPSILON {
                    self.level = 0.0;
                    self.stage = Stage::Off;
                }
            }
            Stage::Off => {
                self.level = 0.0;
            }
        }
        self.level
    }

    /// Returns true once release has run out (or before the first note-on).
    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Off
    }

    fn enter_decay(&mut self) {
        self.level = 1.0;
        self.stage = Stage::Decay;
    }

    fn enter_sustain(&mut self) {
        self.level = self.sustain;
        self.stage = Stage::Sustain;
    }
}

/// Clamp into [0, 1]; NaN becomes 0.
fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adsr(attack: f64, decay: f64, sustain: f64, release: f64) -> EnvelopeConfig {
        EnvelopeConfig {
            attack,
            decay,
            sustain,
            release,
        }
    }

    #[test]
    fn starts_off() {
        let env = Envelope::new(44100.0);
        assert!(env.is_finished());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn setters_clamp() {
        let mut env = Envelope::new(48000.0);
        env.set_attack(-1.0);
        env.set_decay(-0.5);
        env.set_sustain(1.7);
        env.set_release(-3.0);
        assert_eq!(env.config(), adsr(0.0, 0.0, 1.0, 0.0));

        env.set_sustain(-0.2);
        assert_eq!(env.config().sustain, 0.0);
        env.set_sustain(f64::NAN);
        assert_eq!(env.config().sustain, 0.0);
    }

    #[test]
    fn attack_rises_at_fixed_rate() {
        let mut env = Envelope::with_config(1000.0, &adsr(0.1, 0.1, 0.5, 0.1));
        env.gate_on();
        let step = 1.0 / 100.0;
        let mut prev = env.level();
        for _ in 0..50 {
            let level = env.next_sample();
            assert!((level - prev - step).abs() < 1e-12, "step was {}", level - prev);
            prev = level;
        }
    }

    #[test]
    fn zero_attack_jumps_to_peak() {
        let mut env = Envelope::with_config(48000.0, &adsr(0.0, 0.1, 0.5, 0.1));
        env.gate_on();
        assert_eq!(env.next_sample(), 1.0);
        assert_eq!(env.stage(), Stage::Decay);
    }

    #[test]
    fn zero_decay_jumps_to_sustain() {
        let mut env = Envelope::with_config(48000.0, &adsr(0.0, 0.0, 0.3, 0.1));
        env.gate_on();
        env.next_sample();
        assert_eq!(env.next_sample(), 0.3);
        assert_eq!(env.stage(), Stage::Sustain);
    }

    #[test]
    fn decay_lands_exactly_on_sustain() {
        for sustain in [0.0, 0.1, 0.33, 0.5, 0.999] {
            let mut env = Envelope::with_config(44100.0, &adsr(0.001, 0.013, sustain, 0.1));
            env.gate_on();
            for _ in 0..2000 {
                let level = env.next_sample();
                if env.stage() == Stage::Decay {
                    assert!(level >= sustain, "undershot {sustain}: {level}");
                }
            }
            assert_eq!(env.stage(), Stage::Sustain);
            assert_eq!(env.level(), sustain);
        }
    }

    #[test]
    fn retrigger_keeps_current_level() {
        let mut env = Envelope::with_config(1000.0, &adsr(0.1, 0.1, 0.5, 0.5));
        env.gate_on();
        for _ in 0..300 {
            env.next_sample();
        }
        env.gate_off();
        for _ in 0..100 {
            env.next_sample();
        }
        let held = env.level();
        assert!(held > 0.0);

        env.gate_on();
        assert_eq!(env.stage(), Stage::Attack);
        assert_eq!(env.level(), held);
        let next = env.next_sample();
        assert!((next - (held + 0.01)).abs() < 1e-12);
    }

    #[test]
    fn release_duration_is_fixed_in_samples() {
        let mut env = Envelope::with_config(1000.0, &adsr(0.0, 0.0, 0.6, 0.25));
        env.gate_on();
        env.next_sample();
        env.next_sample();
        env.gate_off();
        for i in 0..249 {
            env.next_sample();
            assert_eq!(env.stage(), Stage::Release, "ended early at {i}");
        }
        assert_eq!(env.next_sample(), 0.0);
        assert_eq!(env.stage(), Stage::Off);
    }

    #[test]
    fn zero_release_is_immediate() {
        let mut env = Envelope::with_config(48000.0, &adsr(0.0, 0.0, 0.8, 0.0));
        env.gate_on();
        env.next_sample();
        env.gate_off();
        assert_eq!(env.stage(), Stage::Off);
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn gate_off_from_attack_releases_from_partial_level() {
        let mut env = Envelope::with_config(1000.0, &adsr(1.0, 0.1, 0.5, 0.1));
        env.gate_on();
        for _ in 0..200 {
            env.next_sample();
        }
        env.gate_off();
        assert_eq!(env.stage(), Stage::Release);
        for _ in 0..100 {
            env.next_sample();
        }
        assert!(env.is_finished());
    }

    #[test]
    fn full_cycle_range() {
        let mut env = Envelope::with_config(44100.0, &adsr(0.01, 0.05, 0.5, 0.1));
        env.gate_on();

        for _ in 0..10000 {
            let s = env.next_sample();
            assert!((0.0..=1.0).contains(&s), "Envelope out of range: {s}");
        }

        env.gate_off();
        for _ in 0..10000 {
            let s = env.next_sample();
            assert!((0.0..=1.0).contains(&s), "Envelope out of range after release: {s}");
        }

        assert!(env.is_finished());
    }
}

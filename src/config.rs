//! Engine configuration.
//!
//! Every field has a default, so a host can pass `{}` or only the keys it
//! cares about. Keys are camelCase to match the JSON a browser host sends.

use serde::{Deserialize, Serialize};

use crate::dsp::envelope::EnvelopeConfig;
use crate::dsp::oscillator::Waveform;
use crate::error::SynthError;
use crate::queue::MAX_QUEUE_CAPACITY;

/// Upper bound on `maxVoices`; the engine reserves this many slots at most.
pub const MAX_VOICES: usize = 4096;

// ── Voice template ──────────────────────────────────────────

/// Template for voices created by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub waveform: Waveform,
    pub envelope: EnvelopeConfig,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            waveform: Waveform::Sawtooth,
            envelope: EnvelopeConfig::default(),
        }
    }
}

// ── Engine ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthConfig {
    /// Sample rate in Hz (floored at 1).
    pub sample_rate: f64,
    /// Commands the control queue can hold before `enqueue` starts failing.
    pub queue_capacity: usize,
    /// Voice slots reserved up front; AddVoice beyond this is ignored.
    pub max_voices: usize,
    /// Initial master pitch in Hz.
    pub master_pitch: f32,
    /// Initial LFO rate in Hz.
    pub lfo_rate: f32,
    /// Initial LFO depth in Hz.
    pub lfo_depth: f32,
    pub lfo_waveform: Waveform,
    /// Template for the initial voice and every added voice.
    pub voice: VoiceConfig,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            sample_rate: 48000.0,
            queue_capacity: 256,
            max_voices: 64,
            master_pitch: 440.0,
            lfo_rate: 2.0,
            lfo_depth: 5.0,
            lfo_waveform: Waveform::Sine,
            voice: VoiceConfig::default(),
        }
    }
}

impl SynthConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, SynthError> {
        let config: SynthConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-finite numbers and allocation sizes past the hard limits.
    /// Other out-of-range finite values are clamped later by the setters that
    /// consume them.
    pub fn validate(&self) -> Result<(), SynthError> {
        let env = &self.voice.envelope;
        let fields = [
            ("sampleRate", self.sample_rate),
            ("masterPitch", f64::from(self.master_pitch)),
            ("lfoRate", f64::from(self.lfo_rate)),
            ("lfoDepth", f64::from(self.lfo_depth)),
            ("voice.envelope.attack", env.attack),
            ("voice.envelope.decay", env.decay),
            ("voice.envelope.sustain", env.sustain),
            ("voice.envelope.release", env.release),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SynthError::InvalidConfig {
                    field,
                    reason: format!("expected a finite number, got {value}"),
                });
            }
        }

        let sizes = [
            ("queueCapacity", self.queue_capacity, MAX_QUEUE_CAPACITY),
            ("maxVoices", self.max_voices, MAX_VOICES),
        ];
        for (field, value, limit) in sizes {
            if value > limit {
                return Err(SynthError::InvalidConfig {
                    field,
                    reason: format!("{value} exceeds the limit of {limit}"),
                });
            }
        }
        Ok(())
    }
}

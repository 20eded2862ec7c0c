pub mod command;
pub mod config;
pub mod control;
pub mod dsp;
pub mod error;
pub mod params;
pub mod queue;

pub use crate::command::Command;
pub use crate::config::{SynthConfig, VoiceConfig};
pub use crate::control::SynthController;
pub use crate::dsp::engine::SynthEngine;
pub use crate::dsp::envelope::{EnvelopeConfig, Stage};
pub use crate::dsp::oscillator::Waveform;
pub use crate::error::SynthError;

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the voicebank version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed synth for an AudioWorklet host.
///
/// The worklet is single-threaded, so one object holds both the engine and
/// its controller; commands still go through the queue and take effect at
/// the next `fill`.
#[wasm_bindgen]
pub struct WasmSynth {
    engine: SynthEngine,
    control: SynthController,
}

#[wasm_bindgen]
impl WasmSynth {
    /// Build from a config object (camelCase keys), or defaults when
    /// `undefined`/`null`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmSynth, JsValue> {
        let config: SynthConfig = if config.is_undefined() || config.is_null() {
            SynthConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        config.validate().map_err(to_js_error)?;
        let (engine, control) = SynthEngine::new(&config);
        Ok(WasmSynth { engine, control })
    }

    /// Render one block into `output`.
    pub fn fill(&mut self, output: &mut [f32]) {
        self.engine.fill(output);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.engine.set_sample_rate(sample_rate);
    }

    pub fn add_voice(&mut self) -> bool {
        self.control.add_voice()
    }

    pub fn remove_voice(&mut self, position: usize) -> bool {
        self.control.remove_voice(position)
    }

    pub fn set_voice_frequency(&mut self, position: usize, frequency: f64) -> bool {
        self.control.set_voice_frequency(position, frequency)
    }

    pub fn note_on(&mut self, position: usize, frequency: f64) -> bool {
        self.control.note_on(position, frequency)
    }

    pub fn note_off(&mut self, position: usize) -> bool {
        self.control.note_off(position)
    }

    /// `waveform` is one of "sine", "square", "sawtooth" ("saw"), "triangle".
    pub fn set_voice_waveform(&mut self, position: usize, waveform: JsValue) -> Result<bool, JsValue> {
        let waveform: Waveform = serde_wasm_bindgen::from_value(waveform).map_err(to_js_error)?;
        Ok(self.control.set_voice_waveform(position, waveform))
    }

    /// `envelope` is `{ attack, decay, sustain, release }`; missing keys take
    /// the defaults.
    pub fn set_voice_envelope(&mut self, position: usize, envelope: JsValue) -> Result<bool, JsValue> {
        let envelope: EnvelopeConfig =
            serde_wasm_bindgen::from_value(envelope).map_err(to_js_error)?;
        Ok(self.control.set_voice_envelope(position, envelope))
    }

    pub fn master_pitch(&self) -> f32 {
        self.control.master_pitch()
    }

    pub fn set_master_pitch(&self, hz: f32) {
        self.control.set_master_pitch(hz);
    }

    pub fn lfo_rate(&self) -> f32 {
        self.control.lfo_rate()
    }

    pub fn set_lfo_rate(&self, hz: f32) {
        self.control.set_lfo_rate(hz);
    }

    pub fn lfo_depth(&self) -> f32 {
        self.control.lfo_depth()
    }

    pub fn set_lfo_depth(&self, hz: f32) {
        self.control.set_lfo_depth(hz);
    }

    pub fn voice_count(&self) -> usize {
        self.engine.voice_count()
    }

    /// Bounce `seconds` of audio from the current state to a mono WAV.
    pub fn render_wav(&mut self, seconds: f64) -> Result<Vec<u8>, JsValue> {
        dsp::renderer::render_wav(&mut self.engine, seconds).map_err(to_js_error)
    }
}

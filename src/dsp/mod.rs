//! DSP — oscillators, envelopes, and the block renderer.
//!
//! Everything here runs on the render thread except construction and
//! [`engine::SynthEngine::set_sample_rate`].

pub mod engine;
pub mod envelope;
pub mod lfo;
pub mod oscillator;
pub mod renderer;
pub mod voice;

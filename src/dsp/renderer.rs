//! Offline renderer — drives a [`SynthEngine`] block by block without an
//! audio device, for bouncing to WAV and for tests.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::engine::SynthEngine;
use crate::error::SynthError;

/// Block size used by [`render_wav`], matching a typical device callback.
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Render `frames` samples through the normal block path.
///
/// Commands queued before the call are picked up at the first block; the
/// queue is drained again at every `block_size` boundary.
pub fn render_samples(engine: &mut SynthEngine, frames: usize, block_size: usize) -> Vec<f32> {
    let mut output = vec![0.0_f32; frames];
    for block in output.chunks_mut(block_size.max(1)) {
        engine.fill(block);
    }
    output
}

/// Render `seconds` of audio to a 16-bit mono PCM WAV, returned as bytes.
pub fn render_wav(engine: &mut SynthEngine, seconds: f64) -> Result<Vec<u8>, SynthError> {
    let sample_rate = engine.sample_rate();
    let frames = (seconds.max(0.0) * sample_rate) as usize;
    let samples = render_samples(engine, frames, DEFAULT_BLOCK_SIZE);

    let spec = WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(44 + frames * 2));
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for &s in &samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

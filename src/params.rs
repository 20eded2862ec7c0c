//! Scalars shared directly between the control and render threads.
//!
//! Each value is independently atomic with relaxed ordering: last write wins
//! per scalar, and there is no consistency between scalars.

use std::sync::atomic::{AtomicUsize, Ordering};

use atomic_float::AtomicF32;

#[derive(Debug)]
pub struct SharedParams {
    /// Master pitch in Hz.
    master_pitch: AtomicF32,
    /// LFO rate in Hz.
    lfo_rate: AtomicF32,
    /// LFO depth in Hz of frequency offset.
    lfo_depth: AtomicF32,
    /// Voice count as of the render thread's last drain.
    voice_count: AtomicUsize,
}

impl SharedParams {
    pub fn new(master_pitch: f32, lfo_rate: f32, lfo_depth: f32) -> Self {
        SharedParams {
            master_pitch: AtomicF32::new(master_pitch),
            lfo_rate: AtomicF32::new(lfo_rate),
            lfo_depth: AtomicF32::new(lfo_depth),
            voice_count: AtomicUsize::new(0),
        }
    }

    pub fn master_pitch(&self) -> f32 {
        self.master_pitch.load(Ordering::Relaxed)
    }

    pub fn set_master_pitch(&self, hz: f32) {
        self.master_pitch.store(hz, Ordering::Relaxed);
    }

    pub fn lfo_rate(&self) -> f32 {
        self.lfo_rate.load(Ordering::Relaxed)
    }

    pub fn set_lfo_rate(&self, hz: f32) {
        self.lfo_rate.store(hz, Ordering::Relaxed);
    }

    pub fn lfo_depth(&self) -> f32 {
        self.lfo_depth.load(Ordering::Relaxed)
    }

    pub fn set_lfo_depth(&self, hz: f32) {
        self.lfo_depth.store(hz, Ordering::Relaxed);
    }

    pub fn voice_count(&self) -> usize {
        self.voice_count.load(Ordering::Relaxed)
    }

    pub(crate) fn publish_voice_count(&self, count: usize) {
        self.voice_count.store(count, Ordering::Relaxed);
    }
}

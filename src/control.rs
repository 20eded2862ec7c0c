//! Control-thread handle for a running [`SynthEngine`](crate::dsp::engine::SynthEngine).

use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::Command;
use crate::dsp::envelope::EnvelopeConfig;
use crate::dsp::oscillator::Waveform;
use crate::params::SharedParams;
use crate::queue::CommandSender;

/// The control surface's view of the engine: parameter stores and the
/// producer end of the command queue.
///
/// Commands are fire-and-forget. `true` means the command was queued, not
/// that it was (or will be) valid when the render thread applies it.
pub struct SynthController {
    commands: CommandSender,
    params: Arc<SharedParams>,
}

impl SynthController {
    pub(crate) fn new(commands: CommandSender, params: Arc<SharedParams>) -> Self {
        SynthController { commands, params }
    }

    /// Queue a command for the next rendered block. Returns `false` and
    /// drops the command when the queue is full.
    pub fn enqueue(&mut self, command: Command) -> bool {
        let queued = self.commands.push(command);
        if queued {
            debug!(command = command.name(), "command queued");
        } else {
            warn!(
                command = command.name(),
                capacity = self.commands.capacity(),
                "command queue full, dropping command"
            );
        }
        queued
    }

    pub fn add_voice(&mut self) -> bool {
        self.enqueue(Command::AddVoice)
    }

    pub fn remove_voice(&mut self, position: usize) -> bool {
        self.enqueue(Command::RemoveVoice { position })
    }

    pub fn set_voice_frequency(&mut self, position: usize, frequency: f64) -> bool {
        self.enqueue(Command::SetVoiceFrequency {
            position,
            frequency,
        })
    }

    pub fn note_on(&mut self, position: usize, frequency: f64) -> bool {
        self.enqueue(Command::NoteOn {
            position,
            frequency,
        })
    }

    pub fn note_off(&mut self, position: usize) -> bool {
        self.enqueue(Command::NoteOff { position })
    }

    pub fn set_voice_waveform(&mut self, position: usize, waveform: Waveform) -> bool {
        self.enqueue(Command::SetVoiceWaveform { position, waveform })
    }

    pub fn set_voice_envelope(&mut self, position: usize, envelope: EnvelopeConfig) -> bool {
        self.enqueue(Command::SetVoiceEnvelope { position, envelope })
    }

    /// Commands waiting for the render thread.
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    pub fn master_pitch(&self) -> f32 {
        self.params.master_pitch()
    }

    pub fn set_master_pitch(&self, hz: f32) {
        debug!(hz, "master pitch");
        self.params.set_master_pitch(hz);
    }

    pub fn lfo_rate(&self) -> f32 {
        self.params.lfo_rate()
    }

    pub fn set_lfo_rate(&self, hz: f32) {
        debug!(hz, "lfo rate");
        self.params.set_lfo_rate(hz);
    }

    pub fn lfo_depth(&self) -> f32 {
        self.params.lfo_depth()
    }

    pub fn set_lfo_depth(&self, hz: f32) {
        debug!(hz, "lfo depth");
        self.params.set_lfo_depth(hz);
    }

    /// Voice count as of the last block the render thread started.
    pub fn voice_count(&self) -> usize {
        self.params.voice_count()
    }
}

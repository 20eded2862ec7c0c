//! Structural edits sent from the control thread to the render thread.

use crate::dsp::envelope::EnvelopeConfig;
use crate::dsp::oscillator::Waveform;

/// A mutation request for the voice bank.
///
/// `position` is the voice's index in the bank at the moment the command is
/// applied, not a stable identity: a removal shifts every later voice down by
/// one. Commands naming a position past the end are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Append a voice built from the engine's voice template, sounding at
    /// the current master pitch.
    AddVoice,
    RemoveVoice { position: usize },
    SetVoiceFrequency { position: usize, frequency: f64 },
    /// Retrigger the voice's envelope at a new frequency.
    NoteOn { position: usize, frequency: f64 },
    NoteOff { position: usize },
    SetVoiceWaveform { position: usize, waveform: Waveform },
    SetVoiceEnvelope { position: usize, envelope: EnvelopeConfig },
}

impl Command {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddVoice => "add_voice",
            Command::RemoveVoice { .. } => "remove_voice",
            Command::SetVoiceFrequency { .. } => "set_voice_frequency",
            Command::NoteOn { .. } => "note_on",
            Command::NoteOff { .. } => "note_off",
            Command::SetVoiceWaveform { .. } => "set_voice_waveform",
            Command::SetVoiceEnvelope { .. } => "set_voice_envelope",
        }
    }
}

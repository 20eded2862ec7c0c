//! Synth Engine — the render-thread side of the voice bank.
//!
//! The engine owns the voices and the LFO outright. The control thread never
//! touches them; it reaches the engine through the [`SynthController`]
//! returned alongside it, which writes the shared scalars and queues
//! [`Command`]s. The engine drains that queue once at the start of every
//! block, so a command takes effect from sample 0 of the block that picked
//! it up, never mid-block.
//!
//! Everything reachable from [`SynthEngine::fill`] is allocation-free and
//! lock-free: a bounded number of queue pops, three atomic loads, and a
//! fixed amount of arithmetic per voice per sample.

use std::sync::Arc;

use tracing::info;

use crate::command::Command;
use crate::config::{MAX_VOICES, SynthConfig, VoiceConfig};
use crate::control::SynthController;
use crate::params::SharedParams;
use crate::queue::{CommandReceiver, command_queue};

use super::lfo::Lfo;
use super::voice::Voice;

/// The audio rendering engine.
pub struct SynthEngine {
    sample_rate: f64,
    voices: Vec<Voice>,
    /// Capacity reserved in `voices`; AddVoice past this is ignored.
    max_voices: usize,
    voice_template: VoiceConfig,
    lfo: Lfo,
    params: Arc<SharedParams>,
    commands: CommandReceiver,
}

impl SynthEngine {
    /// Build the engine with one sounding voice, plus the controller that
    /// drives it. Hand the engine to the audio device layer and the
    /// controller to the control surface.
    pub fn new(config: &SynthConfig) -> (SynthEngine, SynthController) {
        let sample_rate = config.sample_rate.max(1.0);
        let max_voices = config.max_voices.clamp(1, MAX_VOICES);
        let params = Arc::new(SharedParams::new(
            config.master_pitch,
            config.lfo_rate,
            config.lfo_depth,
        ));
        let (sender, receiver) = command_queue(config.queue_capacity);

        let mut lfo = Lfo::new(sample_rate);
        lfo.set_waveform(config.lfo_waveform);
        lfo.set_frequency(f64::from(config.lfo_rate));

        let mut engine = SynthEngine {
            sample_rate,
            voices: Vec::with_capacity(max_voices),
            max_voices,
            voice_template: config.voice,
            lfo,
            params: params.clone(),
            commands: receiver,
        };
        engine.add_voice();
        engine.params.publish_voice_count(engine.voices.len());

        info!(
            sample_rate,
            max_voices,
            queue_capacity = sender.capacity(),
            "synth engine created"
        );

        (engine, SynthController::new(sender, params))
    }

    /// Set the sample rate on the engine, every voice, and the LFO.
    ///
    /// Takes `&mut self`, so it can only run while the caller still owns the
    /// engine, before it has been moved into the audio callback.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate.max(1.0);
        for voice in &mut self.voices {
            voice.set_sample_rate(self.sample_rate);
        }
        self.lfo.set_sample_rate(self.sample_rate);
        info!(sample_rate = self.sample_rate, "sample rate changed");
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn lfo(&self) -> &Lfo {
        &self.lfo
    }

    /// Apply every command queued before the drain began.
    ///
    /// Pops at most one ring's worth, so a producer pushing concurrently
    /// cannot keep the render thread here indefinitely.
    pub fn apply_pending_commands(&mut self) {
        for _ in 0..self.commands.capacity() {
            let Some(command) = self.commands.pop() else {
                break;
            };
            self.apply(command);
        }
        self.params.publish_voice_count(self.voices.len());
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::AddVoice => self.add_voice(),
            Command::RemoveVoice { position } => {
                if position < self.voices.len() {
                    self.voices.remove(position);
                }
            }
            Command::SetVoiceFrequency {
                position,
                frequency,
            } => {
                if let Some(voice) = self.voices.get_mut(position) {
                    voice.set_frequency(frequency);
                }
            }
            Command::NoteOn {
                position,
                frequency,
            } => {
                if let Some(voice) = self.voices.get_mut(position) {
                    voice.note_on(frequency);
                }
            }
            Command::NoteOff { position } => {
                if let Some(voice) = self.voices.get_mut(position) {
                    voice.note_off();
                }
            }
            Command::SetVoiceWaveform { position, waveform } => {
                if let Some(voice) = self.voices.get_mut(position) {
                    voice.set_waveform(waveform);
                }
            }
            Command::SetVoiceEnvelope { position, envelope } => {
                if let Some(voice) = self.voices.get_mut(position) {
                    voice.set_envelope(&envelope);
                }
            }
        }
    }

    fn add_voice(&mut self) {
        // Never grow past the reserved capacity from the render thread.
        if self.voices.len() >= self.max_voices {
            return;
        }
        let mut voice = Voice::with_config(self.sample_rate, &self.voice_template);
        voice.note_on(f64::from(self.params.master_pitch()));
        self.voices.push(voice);
    }

    /// Render `frame_count` samples into `output` (clipped to its length).
    ///
    /// Pending commands are applied once, up front. Each sample then takes
    /// one LFO value, scales it by the depth into a Hz offset from the master
    /// pitch, and sums every voice at that frequency. The sum is not
    /// normalised; louder with more voices.
    pub fn render_block(&mut self, output: &mut [f32], frame_count: usize) {
        self.apply_pending_commands();

        let pitch = f64::from(self.params.master_pitch());
        let depth = f64::from(self.params.lfo_depth());
        self.lfo.set_frequency(f64::from(self.params.lfo_rate()));

        for out in output.iter_mut().take(frame_count) {
            let frequency = pitch + self.lfo.compute_sample() * depth;
            let mut sum = 0.0;
            for voice in self.voices.iter_mut() {
                sum += voice.process_sample(frequency);
            }
            *out = sum as f32;
        }
    }

    /// Audio callback entry point: fill the whole buffer.
    #[inline]
    pub fn fill(&mut self, output: &mut [f32]) {
        let frames = output.len();
        self.render_block(output, frames);
    }
}

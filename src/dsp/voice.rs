//! Voice — one oscillator shaped by an ADSR envelope.

use crate::config::VoiceConfig;

use super::envelope::{Envelope, EnvelopeConfig, Stage};
use super::oscillator::{Oscillator, Waveform, midi_to_frequency};

/// Fixed per-voice attenuation so several voices can sum without clipping.
pub const VOICE_GAIN: f64 = 0.2;

/// Lowest frequency a voice will play, in Hz.
pub const MIN_FREQUENCY: f64 = 1.0;

/// A single voice: one oscillator shaped by an ADSR envelope.
#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: Oscillator,
    envelope: Envelope,
    /// Target frequency in Hz, set by note-on.
    frequency: f64,
}

impl Voice {
    pub fn new(sample_rate: f64) -> Self {
        Self::with_config(sample_rate, &VoiceConfig::default())
    }

    /// Create a voice from a waveform + envelope template. The voice starts
    /// silent; call [`note_on`](Self::note_on) to sound it.
    pub fn with_config(sample_rate: f64, config: &VoiceConfig) -> Self {
        Voice {
            oscillator: Oscillator::new(config.waveform, sample_rate),
            envelope: Envelope::with_config(sample_rate, &config.envelope),
            frequency: 440.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.oscillator.set_sample_rate(sample_rate);
        self.envelope.set_sample_rate(sample_rate);
    }

    pub fn sample_rate(&self) -> f64 {
        self.oscillator.sample_rate()
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.oscillator.set_waveform(waveform);
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    pub fn set_attack(&mut self, seconds: f64) {
        self.envelope.set_attack(seconds);
    }

    pub fn set_decay(&mut self, seconds: f64) {
        self.envelope.set_decay(seconds);
    }

    pub fn set_sustain(&mut self, level: f64) {
        self.envelope.set_sustain(level);
    }

    pub fn set_release(&mut self, seconds: f64) {
        self.envelope.set_release(seconds);
    }

    pub fn set_envelope(&mut self, config: &EnvelopeConfig) {
        self.envelope.apply(config);
    }

    pub fn envelope_config(&self) -> EnvelopeConfig {
        self.envelope.config()
    }

    /// Set the target frequency, floored at [`MIN_FREQUENCY`].
    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency.max(MIN_FREQUENCY);
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Start (or retrigger) a note. The envelope ramps up from its current
    /// level rather than restarting at zero.
    pub fn note_on(&mut self, frequency: f64) {
        self.set_frequency(frequency);
        self.envelope.gate_on();
    }

    /// Start a note by MIDI number at A4 = 440 Hz.
    pub fn note_on_midi(&mut self, note: u8) {
        self.note_on(midi_to_frequency(i32::from(note), 440.0));
    }

    /// Release the note.
    pub fn note_off(&mut self) {
        self.envelope.gate_off();
    }

    /// Render one sample at `frequency` (the target frequency plus any
    /// modulation, as chosen by the caller).
    #[inline]
    pub fn process_sample(&mut self, frequency: f64) -> f64 {
        let osc = self.oscillator.next_sample(frequency.max(MIN_FREQUENCY));
        let env = self.envelope.next_sample();
        osc * env * VOICE_GAIN
    }

    /// Render the voice on its own at its target frequency.
    pub fn process_block(&mut self, out: &mut [f32]) {
        let frequency = self.frequency;
        for sample in out.iter_mut() {
            *sample = self.process_sample(frequency) as f32;
        }
    }

    pub fn stage(&self) -> Stage {
        self.envelope.stage()
    }

    pub fn level(&self) -> f64 {
        self.envelope.level()
    }

    pub fn phase(&self) -> f64 {
        self.oscillator.phase()
    }

    /// Is this voice silent (envelope off)?
    pub fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_voice() -> Voice {
        let config = VoiceConfig {
            waveform: Waveform::Square,
            envelope: EnvelopeConfig {
                attack: 0.1,
                decay: 0.1,
                sustain: 0.5,
                release: 0.2,
            },
        };
        Voice::with_config(48000.0, &config)
    }

    #[test]
    fn full_adsr_scenario_at_48k() {
        let mut v = scenario_voice();
        v.note_on(100.0);

        for _ in 0..4800 {
            v.process_sample(100.0);
        }
        assert_eq!(v.level(), 1.0);
        assert_eq!(v.stage(), Stage::Decay);

        for _ in 0..4800 {
            v.process_sample(100.0);
        }
        assert_eq!(v.level(), 0.5);
        assert_eq!(v.stage(), Stage::Sustain);

        v.note_off();
        for _ in 0..9600 {
            v.process_sample(100.0);
        }
        assert_eq!(v.level(), 0.0);
        assert_eq!(v.stage(), Stage::Off);
    }

    #[test]
    fn attack_not_finished_one_sample_early() {
        let mut v = scenario_voice();
        v.note_on(100.0);
        for _ in 0..4799 {
            v.process_sample(100.0);
        }
        assert_eq!(v.stage(), Stage::Attack);
        assert!(v.level() < 1.0);
    }

    #[test]
    fn output_is_waveform_times_level_times_gain() {
        let mut v = scenario_voice();
        v.set_attack(0.0);
        v.note_on(100.0);
        // square at phase 0 is +1, level jumps to 1 on this sample
        let s = v.process_sample(100.0);
        assert!((s - VOICE_GAIN).abs() < 1e-12, "got {s}");
    }

    #[test]
    fn silent_before_note_on() {
        let mut v = Voice::new(44100.0);
        for _ in 0..100 {
            assert_eq!(v.process_sample(440.0), 0.0);
        }
        assert!(v.is_finished());
    }

    #[test]
    fn voice_produces_sound() {
        let mut v = Voice::new(44100.0);
        v.note_on(440.0);

        let mut buf = vec![0.0_f32; 4410];
        v.process_block(&mut buf);
        assert!(buf.iter().any(|s| s.abs() > 0.001), "Voice should produce non-zero output");
    }

    #[test]
    fn note_on_from_every_stage_enters_attack() {
        let mut v = scenario_voice();
        v.note_on(100.0);
        let mut seen = Vec::new();
        for _ in 0..20_000 {
            v.process_sample(100.0);
            let stage = v.stage();
            if !seen.contains(&stage) {
                seen.push(stage);
                let mut retriggered = v.clone();
                retriggered.note_on(220.0);
                assert_eq!(retriggered.stage(), Stage::Attack);
            }
            if stage == Stage::Sustain {
                v.note_off();
            }
        }
        assert!(seen.contains(&Stage::Off));
    }

    #[test]
    fn zero_release_goes_off_at_once() {
        let mut v = scenario_voice();
        v.set_release(0.0);
        v.note_on(100.0);
        for _ in 0..100 {
            v.process_sample(100.0);
        }
        v.note_off();
        assert_eq!(v.stage(), Stage::Off);
        assert_eq!(v.process_sample(100.0), 0.0);
    }

    #[test]
    fn frequency_floored() {
        let mut v = Voice::new(48000.0);
        v.note_on(-20.0);
        assert_eq!(v.frequency(), MIN_FREQUENCY);
        v.set_frequency(0.0);
        assert_eq!(v.frequency(), MIN_FREQUENCY);
        for _ in 0..1000 {
            v.process_sample(-500.0);
            assert!((0.0..1.0).contains(&v.phase()));
        }
    }

    #[test]
    fn note_on_midi_sets_equal_tempered_frequency() {
        let mut v = Voice::new(48000.0);
        v.note_on_midi(69);
        assert!((v.frequency() - 440.0).abs() < 1e-9);
        v.note_on_midi(81);
        assert!((v.frequency() - 880.0).abs() < 1e-9);
    }

    #[test]
    fn voice_output_range() {
        let mut v = Voice::new(44100.0);
        v.note_on(880.0);

        for _ in 0..44100 {
            let s = v.process_sample(880.0);
            assert!(s.abs() <= VOICE_GAIN + 1e-12, "Voice output should be within gain, got {s}");
        }
    }
}

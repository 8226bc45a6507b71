//! Sequencer — lays the voices out on a four-on-the-floor beat grid.
//!
//! Every beat gets a kick on the beat, a hi-hat on the off-beat and a bass
//! note; the lead joins from `intro_beats` on. Pitches are read cyclically
//! from the pattern tables by beat index.

use std::collections::HashMap;

use tracing::debug;

use crate::config::LoopConfig;

use super::mixer::Mixer;
use super::oscillator::NoiseSource;
use super::timing::TimingModel;
use super::voice::{Synth, VoiceKind, VoiceRender};

/// What an event plays. Bass and lead carry their pitch in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Note {
    Kick,
    Hat,
    Bass(f64),
    Lead(f64),
}

impl Note {
    pub fn voice(self) -> VoiceKind {
        match self {
            Note::Kick => VoiceKind::Kick,
            Note::Hat => VoiceKind::Hat,
            Note::Bass(_) => VoiceKind::Bass,
            Note::Lead(_) => VoiceKind::Lead,
        }
    }

    pub fn frequency(self) -> Option<f64> {
        match self {
            Note::Kick | Note::Hat => None,
            Note::Bass(freq) | Note::Lead(freq) => Some(freq),
        }
    }
}

/// One voice firing on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencedEvent {
    pub note: Note,
    pub beat: u32,
    /// Position in the master buffer.
    pub start_sample: usize,
    pub gain: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Sequencer<'a> {
    config: &'a LoopConfig,
    timing: TimingModel,
}

impl<'a> Sequencer<'a> {
    pub fn new(config: &'a LoopConfig, timing: TimingModel) -> Self {
        Sequencer { config, timing }
    }

    /// The full schedule, beat by beat.
    pub fn events(&self) -> Vec<SequencedEvent> {
        let gains = &self.config.gains;
        let total_beats = self.timing.total_beats();
        let half_beat = self.timing.half_beat_samples();
        let mut events = Vec::with_capacity(total_beats as usize * VoiceKind::ALL.len());

        for beat in 0..total_beats {
            let start = self.timing.beat_start(beat);
            let mut push = |note: Note, start_sample: usize| {
                events.push(SequencedEvent {
                    note,
                    beat,
                    start_sample,
                    gain: gains.gain(note.voice()),
                })
            };

            push(Note::Kick, start);
            push(Note::Hat, start + half_beat);
            push(Note::Bass(self.config.bass_pattern.at(beat)), start);
            if beat >= self.config.intro_beats {
                push(Note::Lead(self.config.lead_pattern.at(beat)), start);
            }
        }

        debug!(
            beats = total_beats,
            bars = self.timing.bars(),
            events = events.len(),
            "sequenced loop"
        );
        events
    }

    /// Render every event and mix it into `mixer`.
    ///
    /// Kick and hat are rendered once and reused for every hit; each
    /// distinct bass or lead pitch is rendered once.
    pub fn perform(&self, mixer: &mut Mixer, noise: &mut NoiseSource) {
        let synth = Synth::new(self.timing);
        let lengths = &self.config.lengths;

        let kick = synth.kick(lengths.kick);
        let hat = synth.hat(lengths.hat, noise);
        let mut notes: HashMap<(VoiceKind, u64), VoiceRender> = HashMap::new();

        for event in self.events() {
            let render: &VoiceRender = match event.note {
                Note::Kick => &kick,
                Note::Hat => &hat,
                Note::Bass(freq) => notes
                    .entry((VoiceKind::Bass, freq.to_bits()))
                    .or_insert_with(|| synth.bass_note(freq, lengths.bass)),
                Note::Lead(freq) => notes
                    .entry((VoiceKind::Lead, freq.to_bits()))
                    .or_insert_with(|| synth.lead_note(freq, lengths.lead)),
            };
            mixer.mix(render.samples(), event.start_sample, event.gain);
        }

        debug!(
            pitches = notes.len(),
            dropped = mixer.dropped(),
            "mixed all voices"
        );
    }
}

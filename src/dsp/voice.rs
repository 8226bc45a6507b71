//! Voice synthesizers — one rendered hit or note per call.
//!
//! Each voice is a pure function of its length (and pitch, for the tonal
//! voices). Only the hi-hat draws from a [`NoiseSource`], so its output
//! depends on where that source is in its stream.

use std::fmt;

use super::envelope::{attack_ramp, exp_decay};
use super::oscillator::{NoiseSource, Partial, additive, pitch_sweep, sine};
use super::timing::TimingModel;

const KICK_START_HZ: f64 = 120.0;
const KICK_END_HZ: f64 = 40.0;
const KICK_PITCH_DECAY: f64 = 6.0;
const KICK_AMP_DECAY: f64 = 8.0;

const HAT_DECAY: f64 = 10.0;

const BASS_DECAY: f64 = 4.0;
const BASS_ATTACK_SECONDS: f64 = 0.02;
const BASS_OVERTONE: f64 = 0.3;

const LEAD_DECAY: f64 = 3.0;
const LEAD_ATTACK_SECONDS: f64 = 0.03;
/// Soft saw approximation.
const LEAD_PARTIALS: [Partial; 3] = [
    Partial::new(1, 0.7),
    Partial::new(2, 0.25),
    Partial::new(3, 0.12),
];

/// The instruments of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceKind {
    Kick,
    Hat,
    Bass,
    Lead,
}

impl VoiceKind {
    pub const ALL: [VoiceKind; 4] = [
        VoiceKind::Kick,
        VoiceKind::Hat,
        VoiceKind::Bass,
        VoiceKind::Lead,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VoiceKind::Kick => "kick",
            VoiceKind::Hat => "hat",
            VoiceKind::Bass => "bass",
            VoiceKind::Lead => "lead",
        }
    }
}

impl fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rendered note, starting at sample 0. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceRender {
    samples: Box<[f64]>,
}

impl VoiceRender {
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<f64>> for VoiceRender {
    fn from(samples: Vec<f64>) -> Self {
        VoiceRender {
            samples: samples.into_boxed_slice(),
        }
    }
}

/// Renders voices on a fixed timing grid.
#[derive(Debug, Clone, Copy)]
pub struct Synth {
    timing: TimingModel,
}

impl Synth {
    pub fn new(timing: TimingModel) -> Self {
        Synth { timing }
    }

    /// Evaluate `f(t, length_seconds)` for each sample of a note `beats` long.
    fn render_with(&self, beats: f64, mut f: impl FnMut(f64, f64) -> f64) -> VoiceRender {
        let length = self.timing.beats_to_seconds(beats);
        let num_samples = self.timing.beats_to_samples(beats);
        let sample_rate = self.timing.sample_rate();
        (0..num_samples)
            .map(|n| f(n as f64 / sample_rate, length))
            .collect::<Vec<_>>()
            .into()
    }

    /// Sine with a falling pitch and fast decay. No attack ramp: the
    /// onset transient is the point.
    pub fn kick(&self, beats: f64) -> VoiceRender {
        self.render_with(beats, |t, length| {
            let freq = pitch_sweep(
                KICK_START_HZ,
                KICK_END_HZ,
                exp_decay(t, length, KICK_PITCH_DECAY),
            );
            sine(freq, t) * exp_decay(t, length, KICK_AMP_DECAY)
        })
    }

    /// Noise burst with a very fast decay.
    pub fn hat(&self, beats: f64, noise: &mut NoiseSource) -> VoiceRender {
        self.render_with(beats, |t, length| {
            noise.next_sample() * exp_decay(t, length, HAT_DECAY)
        })
    }

    /// Sine plus a quieter second harmonic, with a 20 ms attack.
    pub fn bass_note(&self, frequency: f64, beats: f64) -> VoiceRender {
        self.render_with(beats, |t, length| {
            let env = exp_decay(t, length, BASS_DECAY) * attack_ramp(t, BASS_ATTACK_SECONDS);
            let tone = sine(frequency, t) + BASS_OVERTONE * sine(frequency * 2.0, t);
            tone * env
        })
    }

    /// Three-partial tone with a slower decay and a 30 ms attack.
    pub fn lead_note(&self, frequency: f64, beats: f64) -> VoiceRender {
        self.render_with(beats, |t, length| {
            let env = exp_decay(t, length, LEAD_DECAY) * attack_ramp(t, LEAD_ATTACK_SECONDS);
            additive(frequency, t, &LEAD_PARTIALS) * env
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoopConfig;

    fn synth() -> Synth {
        Synth::new(TimingModel::new(&LoopConfig::default()).unwrap())
    }

    #[test]
    fn lengths_follow_beats() {
        let s = synth();
        // 0.5 beat at 128 BPM = 0.234375s = 10335.9375 samples
        assert_eq!(s.kick(0.5).len(), 10336);
        assert_eq!(s.hat(0.125, &mut NoiseSource::new(Some(1))).len(), 2584);
        assert_eq!(s.bass_note(110.0, 1.0).len(), 20672);
        assert_eq!(s.lead_note(440.0, 1.0).len(), 20672);
    }

    #[test]
    fn kick_starts_at_zero_and_decays() {
        let kick = synth().kick(0.5);
        let samples = kick.samples();
        assert_eq!(samples[0], 0.0);
        let head = samples[..1000].iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        let tail = samples[samples.len() - 1000..]
            .iter()
            .fold(0.0_f64, |m, s| m.max(s.abs()));
        assert!(head > 0.5, "Kick should hit hard, peak {head}");
        assert!(tail < 0.01, "Kick tail should have decayed, got {tail}");
    }

    #[test]
    fn hat_bounded_by_envelope() {
        let s = synth();
        let timing = TimingModel::new(&LoopConfig::default()).unwrap();
        let length = timing.beats_to_seconds(0.125);
        let hat = s.hat(0.125, &mut NoiseSource::new(None));
        for (n, &v) in hat.samples().iter().enumerate() {
            let t = n as f64 / timing.sample_rate();
            let bound = exp_decay(t, length, HAT_DECAY) + 1e-12;
            assert!(v.abs() <= bound, "Hat sample {v} exceeds envelope {bound} at {n}");
        }
    }

    #[test]
    fn seeded_hats_match() {
        let s = synth();
        let a = s.hat(0.125, &mut NoiseSource::new(Some(5)));
        let b = s.hat(0.125, &mut NoiseSource::new(Some(5)));
        assert_eq!(a, b);
    }

    #[test]
    fn pitched_voices_are_deterministic() {
        let s = synth();
        assert_eq!(s.bass_note(130.81, 1.0), s.bass_note(130.81, 1.0));
        assert_eq!(s.lead_note(493.88, 1.0), s.lead_note(493.88, 1.0));
    }

    #[test]
    fn pitched_voices_start_silent() {
        let s = synth();
        assert_eq!(s.bass_note(110.0, 1.0).samples()[0], 0.0);
        assert_eq!(s.lead_note(440.0, 1.0).samples()[0], 0.0);
    }

    #[test]
    fn attack_limits_first_milliseconds() {
        // 1 ms into a 20 ms attack the envelope is at most 0.05
        let bass = synth().bass_note(110.0, 1.0);
        let early = bass.samples()[..44].iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        assert!(early <= 0.05 * 1.3, "Bass onset should ramp in, got {early}");
    }

    #[test]
    fn output_ranges() {
        let s = synth();
        for &v in s.bass_note(98.0, 1.0).samples() {
            assert!(v.abs() <= 1.3 + 1e-9, "Bass out of range: {v}");
        }
        for &v in s.lead_note(392.0, 1.0).samples() {
            assert!(v.abs() <= 1.07 + 1e-9, "Lead out of range: {v}");
        }
        for &v in s.kick(0.5).samples() {
            assert!(v.abs() <= 1.0, "Kick out of range: {v}");
        }
    }

    #[test]
    fn different_pitches_differ() {
        let s = synth();
        assert_ne!(s.bass_note(110.0, 1.0), s.bass_note(98.0, 1.0));
    }
}

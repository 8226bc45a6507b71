//! Loop configuration.
//!
//! A [`LoopConfig`] is the only input to the synthesis pipeline. Its
//! `Default` is the reference track: 128 BPM, 64 seconds at 44.1 kHz, an
//! A-minor bass line and a lead that enters after two bars. Every field is
//! optional in the JSON form and falls back to that default.


use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use serde::{Deserialize, Serialize};

use crate::dsp::pitch::note_to_frequency;
use crate::dsp::timing::TimingModel;
use crate::dsp::voice::VoiceKind;
use crate::error::{ConfigError, LoopError};

/// Complete description of one loop to synthesize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoopConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Total loop length in seconds.
    pub duration_seconds: f64,
    pub beats_per_bar: u32,
    /// Peak level of the normalized output, below 1.0.
    pub master_gain: f64,
    pub gains: GainConfig,
    pub fades: FadeConfig,
    pub lengths: VoiceLengths,
    /// Beats of drums and bass before the lead enters.
    pub intro_beats: u32,
    pub bass_pattern: PatternTable,
    pub lead_pattern: PatternTable,
    /// Seed for the hi-hat noise. Unset means a fresh seed every run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            sample_rate: 44100,
            bpm: 128.0,
            duration_seconds: 64.0,
            beats_per_bar: 4,
            master_gain: 0.85,
            gains: GainConfig::default(),
            fades: FadeConfig::default(),
            lengths: VoiceLengths::default(),
            intro_beats: 8,
            // A A C A | G G A G
            bass_pattern: PatternTable(vec![110.0, 110.0, 130.81, 110.0, 98.0, 98.0, 110.0, 98.0]),
            // A4 A4 B4 A4 | A4 G4 A4 G4
            lead_pattern: PatternTable(vec![
                440.0, 440.0, 493.88, 440.0, 440.0, 392.0, 440.0, 392.0,
            ]),
            seed: None,
        }
    }
}

/// Per-voice mix gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainConfig {
    pub kick: f64,
    pub hat: f64,
    pub bass: f64,
    pub lead: f64,
}

impl GainConfig {
    pub fn gain(&self, voice: VoiceKind) -> f64 {
        match voice {
            VoiceKind::Kick => self.kick,
            VoiceKind::Hat => self.hat,
            VoiceKind::Bass => self.bass,
            VoiceKind::Lead => self.lead,
        }
    }
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            kick: 0.9,
            hat: 0.4,
            bass: 0.6,
            lead: 0.35,
        }
    }
}

/// Edge fades applied to the finished buffer, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FadeConfig {
    pub fade_in_ms: f64,
    pub fade_out_ms: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: 15.0,
            fade_out_ms: 15.0,
        }
    }
}

/// Note lengths per voice, in beats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceLengths {
    pub kick: f64,
    pub hat: f64,
    pub bass: f64,
    pub lead: f64,
}

impl VoiceLengths {
    pub fn beats(&self, voice: VoiceKind) -> f64 {
        match voice {
            VoiceKind::Kick => self.kick,
            VoiceKind::Hat => self.hat,
            VoiceKind::Bass => self.bass,
            VoiceKind::Lead => self.lead,
        }
    }
}

impl Default for VoiceLengths {
    fn default() -> Self {
        Self {
            kick: 0.5,
            hat: 0.125,
            bass: 1.0,
            lead: 1.0,
        }
    }
}

/// One step of a pattern as written in a config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PatternStep {
    Hz(f64),
    Note(String),
}

impl PatternStep {
    fn frequency(&self) -> Result<f64, ConfigError> {
        match self {
            PatternStep::Hz(hz) => Ok(*hz),
            PatternStep::Note(name) => {
                note_to_frequency(name).ok_or_else(|| ConfigError::UnknownNote(name.clone()))
            }
        }
    }
}

/// A non-empty cycle of positive frequencies, indexed modulo its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PatternStep>", into = "Vec<f64>")]
pub struct PatternTable(Vec<f64>);

impl PatternTable {
    pub fn new(frequencies: Vec<f64>) -> Result<Self, ConfigError> {
        if frequencies.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        if let Some(&bad) = frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            return Err(ConfigError::Frequency(bad));
        }
        Ok(PatternTable(frequencies))
    }

    /// Frequency for a beat, wrapping around the table.
    pub fn at(&self, beat: u32) -> f64 {
        self.0[beat as usize % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<PatternStep>> for PatternTable {
    type Error = ConfigError;

    fn try_from(steps: Vec<PatternStep>) -> Result<Self, Self::Error> {
        let frequencies = steps
            .iter()
            .map(PatternStep::frequency)
            .collect::<Result<Vec<_>, _>>()?;
        PatternTable::new(frequencies)
    }
}

impl From<PatternTable> for Vec<f64> {
    fn from(table: PatternTable) -> Self {
        table.0
    }
}

impl LoopConfig {
    /// Check every precondition of the pipeline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = TimingModel::new(self)?;

        if !(self.master_gain > 0.0 && self.master_gain < 1.0) {
            return Err(ConfigError::MasterGain(self.master_gain));
        }

        for voice in VoiceKind::ALL {
            let gain = self.gains.gain(voice);
            if !(0.0..=1.0).contains(&gain) {
                return Err(ConfigError::VoiceGain {
                    voice: voice.name(),
                    gain,
                });
            }

            let beats = self.lengths.beats(voice);
            if !(beats.is_finite() && beats > 0.0) || timing.beats_to_samples(beats) == 0 {
                return Err(ConfigError::VoiceLength {
                    voice: voice.name(),
                    beats,
                });
            }
        }

        let FadeConfig {
            fade_in_ms,
            fade_out_ms,
        } = self.fades;
        let fades_valid = fade_in_ms.is_finite()
            && fade_out_ms.is_finite()
            && fade_in_ms >= 0.0
            && fade_out_ms >= 0.0;
        if !fades_valid
            || timing.ms_to_samples(fade_in_ms) + timing.ms_to_samples(fade_out_ms)
                > timing.total_samples()
        {
            return Err(ConfigError::Fade {
                fade_in_ms,
                fade_out_ms,
                samples: timing.total_samples(),
            });
        }

        Ok(())
    }

    /// Parse a JSON config and validate it.
    pub fn from_json_str(source: &str) -> Result<Self, LoopError> {
        let config: LoopConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, LoopError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render a JSON error against its source as a plain-text report.
pub fn json_diagnostic(name: &str, source: &str, err: &serde_json::Error) -> String {
    let offset = byte_offset(source, err.line(), err.column());
    let span = offset..(offset + 1).min(source.len());

    let mut out = Vec::new();
    let written = Report::build(ReportKind::Error, (name, span.clone()))
        .with_config(
            Config::default()
                .with_color(false)
                .with_index_type(IndexType::Byte),
        )
        .with_message("invalid loop config")
        .with_label(Label::new((name, span)).with_message(err.to_string()))
        .finish()
        .write((name, Source::from(source)), &mut out);

    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("{name}: {err}"),
    }
}

/// Byte offset of a 1-based line and column as reported by serde_json.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

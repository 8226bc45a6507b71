//! Timing model — derives the beat grid from tempo, duration and sample rate.
//!
//! The loop keeps its full configured length; the grid is floored to whole
//! bars, so a duration that is not a multiple of the bar length leaves a
//! short tail after the last bar that only the previous notes ring into.

use crate::config::LoopConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingModel {
    sample_rate: f64,
    beat_seconds: f64,
    beats_per_bar: u32,
    bars: u32,
    total_samples: usize,
}

impl TimingModel {
    pub fn new(config: &LoopConfig) -> Result<Self, ConfigError> {
        if config.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        if !(config.bpm.is_finite() && config.bpm > 0.0) {
            return Err(ConfigError::Tempo(config.bpm));
        }
        if !(config.duration_seconds.is_finite() && config.duration_seconds > 0.0) {
            return Err(ConfigError::Duration(config.duration_seconds));
        }
        if config.beats_per_bar == 0 {
            return Err(ConfigError::BeatsPerBar);
        }

        let sample_rate = config.sample_rate as f64;
        let beat_seconds = 60.0 / config.bpm;
        if beat_seconds * sample_rate < 1.0 {
            return Err(ConfigError::BeatTooShort(config.bpm));
        }
        let bar_seconds = beat_seconds * config.beats_per_bar as f64;
        let bars = (config.duration_seconds / bar_seconds).floor();
        if bars < 1.0 {
            return Err(ConfigError::NoWholeBar {
                duration: config.duration_seconds,
                bar_seconds,
            });
        }

        Ok(TimingModel {
            sample_rate,
            beat_seconds,
            beats_per_bar: config.beats_per_bar,
            bars: bars.min(u32::MAX as f64) as u32,
            total_samples: (sample_rate * config.duration_seconds).round() as usize,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn beats_per_second(&self) -> f64 {
        1.0 / self.beat_seconds
    }

    pub fn beat_seconds(&self) -> f64 {
        self.beat_seconds
    }

    /// Whole bars that fit in the loop.
    pub fn bars(&self) -> u32 {
        self.bars
    }

    /// Beats on the grid: always a whole number of bars.
    pub fn total_beats(&self) -> u32 {
        self.bars.saturating_mul(self.beats_per_bar)
    }

    /// Length of the master buffer.
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn beats_to_seconds(&self, beats: f64) -> f64 {
        beats * self.beat_seconds
    }

    /// Rendered length of a note lasting `beats`.
    pub fn beats_to_samples(&self, beats: f64) -> usize {
        (self.sample_rate * self.beats_to_seconds(beats)).round() as usize
    }

    pub fn ms_to_samples(&self, ms: f64) -> usize {
        (self.sample_rate * ms / 1000.0) as usize
    }

    /// First sample of a beat, truncated onto the sample grid.
    pub fn beat_start(&self, beat: u32) -> usize {
        (beat as f64 * self.beat_seconds * self.sample_rate) as usize
    }

    /// Offset of the off-beat within a beat.
    pub fn half_beat_samples(&self) -> usize {
        (0.5 * self.beat_seconds * self.sample_rate) as usize
    }
}

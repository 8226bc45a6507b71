//! Loop Engine — runs the full synthesis pipeline for one [`LoopConfig`].
//!
//! validate → sequence and mix every voice → edge fades → peak
//! normalization. Nothing touches the filesystem here; the finished buffer
//! is handed to the renderer only once it is final.

use tracing::{debug, info};

use crate::config::LoopConfig;
use crate::error::LoopError;

use super::mixer::Mixer;
use super::oscillator::NoiseSource;
use super::post::{edge_fade, normalize};
use super::sequencer::Sequencer;
use super::timing::TimingModel;

/// A finished, normalized loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLoop {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
    /// Beats on the grid (whole bars only).
    pub total_beats: u32,
    /// Peak of the mix before normalization.
    pub raw_peak: f64,
}

impl RenderedLoop {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoopEngine<'a> {
    config: &'a LoopConfig,
}

impl<'a> LoopEngine<'a> {
    pub fn new(config: &'a LoopConfig) -> Self {
        LoopEngine { config }
    }

    pub fn render(&self) -> Result<RenderedLoop, LoopError> {
        let config = self.config;
        config.validate()?;
        let timing = TimingModel::new(config)?;

        info!(
            bpm = config.bpm,
            beats = timing.total_beats(),
            samples = timing.total_samples(),
            "sequencing loop"
        );
        let mut mixer = Mixer::new(timing.total_samples());
        let mut noise = NoiseSource::new(config.seed);
        Sequencer::new(config, timing).perform(&mut mixer, &mut noise);

        let mut samples = mixer.into_buffer();
        let fade_in = timing.ms_to_samples(config.fades.fade_in_ms);
        let fade_out = timing.ms_to_samples(config.fades.fade_out_ms);
        edge_fade(&mut samples, fade_in, fade_out);
        let raw_peak = normalize(&mut samples, config.master_gain);
        info!(raw_peak, master_gain = config.master_gain, "post-processed loop");
        debug!(fade_in, fade_out, "applied edge fades");

        Ok(RenderedLoop {
            samples,
            sample_rate: config.sample_rate,
            total_beats: timing.total_beats(),
            raw_peak,
        })
    }
}

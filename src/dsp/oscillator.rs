//! Oscillator primitives: sines, pitch sweeps, additive partials and noise.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Sine at `frequency` Hz, `t` seconds after onset.
pub fn sine(frequency: f64, t: f64) -> f64 {
    (TAU * frequency * t).sin()
}

/// Blend from `start` down (or up) to `end` Hz.
///
/// `weight` is 1.0 at onset and falls toward 0.0; a decay envelope makes
/// the pitch glide continuously toward `end`.
pub fn pitch_sweep(start: f64, end: f64, weight: f64) -> f64 {
    end + (start - end) * weight
}

/// One harmonic of an additive tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Integer multiple of the fundamental.
    pub harmonic: u32,
    pub amplitude: f64,
}

impl Partial {
    pub const fn new(harmonic: u32, amplitude: f64) -> Self {
        Partial {
            harmonic,
            amplitude,
        }
    }
}

/// Sum of sine partials over `fundamental`.
pub fn additive(fundamental: f64, t: f64, partials: &[Partial]) -> f64 {
    partials
        .iter()
        .map(|p| p.amplitude * sine(fundamental * p.harmonic as f64, t))
        .sum()
}

/// Uniform white noise in [-1, 1].
///
/// There is no spectral shaping; callers give it character with an
/// amplitude envelope only.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: Pcg64,
}

impl NoiseSource {
    /// A fixed seed reproduces the same draws; `None` seeds from the thread RNG.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_rng(&mut rand::rng()),
        };
        NoiseSource { rng }
    }

    pub fn next_sample(&mut self) -> f64 {
        self.rng.random_range(-1.0..=1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_zero_at_start() {
        assert_eq!(sine(440.0, 0.0), 0.0);
    }

    #[test]
    fn sine_quarter_period_peaks() {
        let s = sine(100.0, 0.0025);
        assert!((s - 1.0).abs() < 1e-12, "Quarter period should peak, got {s}");
    }

    #[test]
    fn sweep_endpoints() {
        assert_eq!(pitch_sweep(120.0, 40.0, 1.0), 120.0);
        assert_eq!(pitch_sweep(120.0, 40.0, 0.0), 40.0);
        assert_eq!(pitch_sweep(120.0, 40.0, 0.5), 80.0);
    }

    #[test]
    fn additive_single_partial_is_scaled_sine() {
        let partials = [Partial::new(1, 0.5)];
        for n in 0..100 {
            let t = n as f64 / 44100.0;
            assert!((additive(220.0, t, &partials) - 0.5 * sine(220.0, t)).abs() < 1e-12);
        }
    }

    #[test]
    fn additive_bounded_by_amplitude_sum() {
        let partials = [Partial::new(1, 0.7), Partial::new(2, 0.25), Partial::new(3, 0.12)];
        for n in 0..44100 {
            let t = n as f64 / 44100.0;
            let s = additive(440.0, t, &partials);
            assert!(s.abs() <= 1.07 + 1e-12, "Additive out of range: {s}");
        }
    }

    #[test]
    fn noise_range() {
        let mut noise = NoiseSource::new(None);
        for _ in 0..10000 {
            let s = noise.next_sample();
            assert!((-1.0..=1.0).contains(&s), "Noise out of range: {s}");
        }
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let mut a = NoiseSource::new(Some(1234));
        let mut b = NoiseSource::new(Some(1234));
        let xs: Vec<f64> = (0..256).map(|_| a.next_sample()).collect();
        let ys: Vec<f64> = (0..256).map(|_| b.next_sample()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn noise_is_roughly_centered() {
        let mut noise = NoiseSource::new(Some(99));
        let mean: f64 = (0..20000).map(|_| noise.next_sample()).sum::<f64>() / 20000.0;
        assert!(mean.abs() < 0.05, "Noise mean should be near 0, got {mean}");
    }
}

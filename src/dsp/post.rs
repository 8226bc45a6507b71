//! Post-processing of the finished mix: loop-edge fades and peak normalization.

/// Peak substituted for an all-silent buffer so normalization never divides by zero.
pub const PEAK_FLOOR: f64 = 1e-6;

/// Ramp the first `fade_in` samples up from 0 and the last `fade_out`
/// samples down to 0.
///
/// The first and last samples come out exactly zero, so playing the last
/// sample straight into the first does not click.
pub fn edge_fade(buffer: &mut [f64], fade_in: usize, fade_out: usize) {
    let len = buffer.len();

    let fade_in = fade_in.min(len);
    for (i, s) in buffer[..fade_in].iter_mut().enumerate() {
        *s *= i as f64 / fade_in as f64;
    }

    let fade_out = fade_out.min(len);
    for (j, s) in buffer[len - fade_out..].iter_mut().rev().enumerate() {
        *s *= j as f64 / fade_out as f64;
    }
}

/// Largest absolute sample value, 0.0 for an empty buffer.
pub fn peak(buffer: &[f64]) -> f64 {
    buffer.iter().fold(0.0_f64, |m, s| m.max(s.abs()))
}

/// Scale the buffer so its peak lands on `target`. Returns the peak found
/// before scaling.
pub fn normalize(buffer: &mut [f64], target: f64) -> f64 {
    let found = peak(buffer);
    let scale = target / found.max(PEAK_FLOOR);
    for s in buffer.iter_mut() {
        *s *= scale;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_zeroes_both_ends() {
        let mut buffer = vec![1.0; 100];
        edge_fade(&mut buffer, 10, 10);
        assert_eq!(buffer[0], 0.0);
        assert_eq!(buffer[99], 0.0);
        assert!((buffer[1] - 0.1).abs() < 1e-12);
        assert!((buffer[98] - 0.1).abs() < 1e-12);
        assert_eq!(buffer[10], 1.0);
        assert_eq!(buffer[89], 1.0);
        assert!(buffer[10..90].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn fade_ramps_monotonically() {
        let mut buffer = vec![1.0; 50];
        edge_fade(&mut buffer, 20, 20);
        for w in buffer[..20].windows(2) {
            assert!(w[1] > w[0], "Fade-in should rise");
        }
        for w in buffer[30..].windows(2) {
            assert!(w[1] < w[0], "Fade-out should fall");
        }
    }

    #[test]
    fn zero_length_fade_is_identity() {
        let mut buffer = vec![0.5, -0.5, 0.25];
        edge_fade(&mut buffer, 0, 0);
        assert_eq!(buffer, vec![0.5, -0.5, 0.25]);
    }

    #[test]
    fn oversized_fade_is_clamped() {
        let mut buffer = vec![1.0; 4];
        edge_fade(&mut buffer, 10, 0);
        assert_eq!(buffer, vec![0.0, 0.25, 0.5, 0.75]);

        let mut empty: Vec<f64> = Vec::new();
        edge_fade(&mut empty, 5, 5);
        assert!(empty.is_empty());
    }

    #[test]
    fn normalize_hits_target_peak() {
        let mut buffer = vec![0.5, -2.0, 1.0];
        let found = normalize(&mut buffer, 0.85);
        assert_eq!(found, 2.0);
        assert!((peak(&buffer) - 0.85).abs() < 1e-12);
        assert!((buffer[0] - 0.2125).abs() < 1e-12);
        assert!((buffer[1] + 0.85).abs() < 1e-12);
    }

    #[test]
    fn normalize_silence_stays_silent() {
        let mut buffer = vec![0.0; 64];
        let found = normalize(&mut buffer, 0.85);
        assert_eq!(found, 0.0);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn normalize_quiet_signal_is_boosted() {
        let mut buffer = vec![1e-3, -5e-4];
        normalize(&mut buffer, 0.5);
        assert!((buffer[0] - 0.5).abs() < 1e-12);
        assert!((buffer[1] + 0.25).abs() < 1e-12);
    }
}

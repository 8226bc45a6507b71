//! Mixer — accumulates positioned voice renders into one master buffer.

/// Add `part * gain` into `buffer` starting at `start`.
///
/// Samples that fall past the end of `buffer` are dropped. Returns how many
/// samples were actually written.
pub fn mix_into(buffer: &mut [f64], part: &[f64], start: usize, gain: f64) -> usize {
    let Some(dest) = buffer.get_mut(start..) else {
        return 0;
    };
    let written = dest.len().min(part.len());
    for (out, &s) in dest.iter_mut().zip(part) {
        *out += s * gain;
    }
    written
}

/// A summing mixer over a fixed-length buffer.
#[derive(Debug, Clone)]
pub struct Mixer {
    buffer: Vec<f64>,
    /// Samples lost off the end of the buffer.
    dropped: usize,
}

impl Mixer {
    /// A silent buffer of `num_samples`.
    pub fn new(num_samples: usize) -> Self {
        Mixer {
            buffer: vec![0.0; num_samples],
            dropped: 0,
        }
    }

    /// Mix a whole render at `start` with `gain`.
    pub fn mix(&mut self, part: &[f64], start: usize, gain: f64) {
        let written = mix_into(&mut self.buffer, part, start, gain);
        self.dropped += part.len() - written;
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    pub fn into_buffer(self) -> Vec<f64> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

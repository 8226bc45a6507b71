//! Amplitude envelopes, evaluated at a position within a note.

/// Exponential decay `exp(-rate * t / length)`.
///
/// Starts at 1.0 and falls toward 0.0 without reaching it. `length` is the
/// note duration in seconds, so `rate` is the number of time constants that
/// fit in the note.
pub fn exp_decay(t: f64, length: f64, rate: f64) -> f64 {
    (-rate * t / length).exp()
}

/// Linear ramp from 0.0 at onset to 1.0 after `attack` seconds.
pub fn attack_ramp(t: f64, attack: f64) -> f64 {
    if attack <= 0.0 {
        return 1.0;
    }
    (t / attack).min(1.0)
}

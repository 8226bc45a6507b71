//! DSP — sample-by-sample synthesis of the loop.
//!
//! Primitives (envelopes, oscillators) feed the voice synthesizers; the
//! sequencer places voices on the beat grid through the mixer, and the
//! engine finishes the buffer with fades and normalization before the
//! renderer encodes it.

pub mod engine;
pub mod envelope;
pub mod mixer;
pub mod oscillator;
pub mod pitch;
pub mod post;
pub mod renderer;
pub mod sequencer;
pub mod timing;
pub mod voice;

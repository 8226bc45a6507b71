pub mod config;
pub mod dsp;
pub mod error;

use std::path::Path;

use wasm_bindgen::prelude::*;

pub use crate::config::LoopConfig;
pub use crate::dsp::engine::{LoopEngine, RenderedLoop};
pub use crate::error::{ConfigError, LoopError};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where the CLI writes the loop when no output path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "assets/audio/music/bgm_techno_loop.wav";

/// Synthesize the loop described by `config`.
pub fn render_loop(config: &LoopConfig) -> Result<RenderedLoop, LoopError> {
    LoopEngine::new(config).render()
}

/// Synthesize the loop and write it to `path` as 16-bit mono WAV.
///
/// Nothing is written unless synthesis succeeds.
pub fn generate(config: &LoopConfig, path: impl AsRef<Path>) -> Result<RenderedLoop, LoopError> {
    let rendered = render_loop(config)?;
    dsp::renderer::write_wav(path, &rendered.samples, rendered.sample_rate)?;
    Ok(rendered)
}

/// WASM-exposed: return the crate version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn config_from_js(value: JsValue) -> Result<LoopConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(LoopConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render the loop to a WAV byte array.
/// `undefined` or `null` renders the default loop.
#[wasm_bindgen]
pub fn render_loop_wav(config: JsValue) -> Result<Vec<u8>, JsValue> {
    let config = config_from_js(config)?;
    let rendered = render_loop(&config).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    dsp::renderer::encode_wav(&rendered.samples, rendered.sample_rate)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render the loop to mono f32 samples for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_loop_samples(config: JsValue) -> Result<Vec<f32>, JsValue> {
    let config = config_from_js(config)?;
    let rendered = render_loop(&config).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(rendered.samples.iter().map(|&s| s as f32).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavReader};

    #[test]
    fn generate_writes_reference_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_PATH);
        let config = LoopConfig {
            seed: Some(2024),
            ..LoopConfig::default()
        };

        let rendered = generate(&config, &path).unwrap();
        assert_eq!(rendered.samples.len(), 44100 * 64);

        let mut reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.sample_format, SampleFormat::Int);
        assert_eq!(reader.duration(), 44100 * 64);

        // 0.85 * 32767 truncates to 27851
        let peak = reader
            .samples::<i16>()
            .map(|s| s.unwrap().unsigned_abs())
            .max()
            .unwrap();
        assert_eq!(peak, 27851);
    }

    #[test]
    fn generate_writes_nothing_on_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.wav");
        let config = LoopConfig {
            master_gain: 1.5,
            ..LoopConfig::default()
        };

        let err = generate(&config, &path).unwrap_err();
        assert!(matches!(err, LoopError::Config(ConfigError::MasterGain(_))), "got {err:?}");
        assert!(!path.exists());
        assert!(!dir.path().join("loop.wav.part").exists());
    }

    #[test]
    fn version_is_set() {
        assert_eq!(core_version(), VERSION);
        assert!(!VERSION.is_empty());
    }
}

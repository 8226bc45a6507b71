//! WAV renderer — 16-bit mono PCM via `hound`.

use std::ffi::OsString;
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, info};

use crate::error::LoopError;

/// Mono, 16-bit signed integer PCM.
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Clamp to [-1, 1] and scale to i16, truncating toward zero.
pub fn to_pcm_i16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f64) as i16)
        .collect()
}

fn write_samples<W: Write + Seek>(mut writer: WavWriter<W>, samples: &[f64]) -> Result<(), hound::Error> {
    for sample in to_pcm_i16(samples) {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

/// Encode to an in-memory WAV file.
pub fn encode_wav(samples: &[f64], sample_rate: u32) -> Result<Vec<u8>, LoopError> {
    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    write_samples(WavWriter::new(&mut cursor, wav_spec(sample_rate))?, samples)?;
    Ok(cursor.into_inner())
}

/// Sibling path the file is staged at until it is complete.
fn staging_path(path: &Path) -> PathBuf {
    let mut staged = OsString::from(path.as_os_str());
    staged.push(".part");
    PathBuf::from(staged)
}

/// Write a WAV file, creating missing parent directories.
///
/// The data goes to a `.part` file first and is renamed over `path` only
/// once it is finalized, so a failed write never leaves a truncated WAV at
/// `path`.
pub fn write_wav(path: impl AsRef<Path>, samples: &[f64], sample_rate: u32) -> Result<(), LoopError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staged = staging_path(path);
    let written = WavWriter::create(&staged, wav_spec(sample_rate))
        .and_then(|writer| write_samples(writer, samples));
    if let Err(err) = written {
        // Best effort; the write error is the one worth reporting.
        let _ = fs::remove_file(&staged);
        return Err(err.into());
    }
    debug!(staged = %staged.display(), "finalized staged WAV");

    if let Err(err) = fs::rename(&staged, path) {
        let _ = fs::remove_file(&staged);
        return Err(err.into());
    }
    info!(path = %path.display(), samples = samples.len(), "wrote WAV");
    Ok(())
}

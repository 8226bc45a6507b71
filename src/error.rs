use thiserror::Error;

/// Top-level failure of a loop generation run.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("invalid loop configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV encoding error: {0}")]
    Wav(hound::Error),
}

impl From<hound::Error> for LoopError {
    /// OS failures surface as [`LoopError::Io`]; only format errors stay `Wav`.
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(err) => LoopError::Io(err),
            err => LoopError::Wav(err),
        }
    }
}

/// A precondition on [`crate::config::LoopConfig`] that does not hold.
///
/// These are raised before any synthesis work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be positive")]
    SampleRate,
    #[error("tempo must be a positive number of beats per minute, got {0}")]
    Tempo(f64),
    #[error("loop duration must be a positive number of seconds, got {0}")]
    Duration(f64),
    #[error("a beat at {0} BPM is shorter than one sample")]
    BeatTooShort(f64),
    #[error("beats per bar must be positive")]
    BeatsPerBar,
    #[error("a {duration}s loop cannot hold one whole {bar_seconds}s bar")]
    NoWholeBar { duration: f64, bar_seconds: f64 },
    #[error("master gain must lie in (0, 1) to leave headroom, got {0}")]
    MasterGain(f64),
    #[error("{voice} gain must lie in [0, 1], got {gain}")]
    VoiceGain { voice: &'static str, gain: f64 },
    #[error("{voice} length of {beats} beats renders no samples")]
    VoiceLength { voice: &'static str, beats: f64 },
    #[error("pattern table is empty")]
    EmptyPattern,
    #[error("pattern frequency must be finite and positive, got {0}")]
    Frequency(f64),
    #[error("unknown note name '{0}'")]
    UnknownNote(String),
    #[error("fade of {fade_in_ms}ms in / {fade_out_ms}ms out does not fit a {samples}-sample loop")]
    Fade {
        fade_in_ms: f64,
        fade_out_ms: f64,
        samples: usize,
    },
}

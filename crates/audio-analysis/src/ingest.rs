//! WAV ingestion.
//!
//! Decodes PCM or float WAV data, normalizes samples to `[-1.0, 1.0]` and
//! downmixes to mono.

use std::io::Read;
use std::path::Path;

use bowsync_common::error::{BowsyncError, BowsyncResult};
use hound::{SampleFormat, WavReader};

/// Mono audio ready for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Mono samples normalized to `[-1.0, 1.0]`.
    pub samples: Vec<f32>,

    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Load a WAV file as mono audio.
pub fn load_wav(path: &Path) -> BowsyncResult<AudioBuffer> {
    if !path.exists() {
        return Err(BowsyncError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let reader = WavReader::open(path)
        .map_err(|e| BowsyncError::audio(format!("{}: {e}", path.display())))?;
    let audio = decode(reader)?;

    tracing::debug!(
        path = %path.display(),
        sample_rate = audio.sample_rate,
        duration_secs = audio.duration_secs(),
        "Loaded audio"
    );
    Ok(audio)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> BowsyncResult<AudioBuffer> {
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => collect(reader.samples::<i8>(), |s| s as f32 / 128.0)?,
        (SampleFormat::Int, 16) => collect(reader.samples::<i16>(), |s| s as f32 / 32768.0)?,
        (SampleFormat::Int, 24) => collect(reader.samples::<i32>(), |s| s as f32 / 8388608.0)?,
        (SampleFormat::Int, 32) => {
            collect(reader.samples::<i32>(), |s| s as f32 / 2147483648.0)?
        }
        (SampleFormat::Float, 32) => collect(reader.samples::<f32>(), |s| s)?,
        (format, bits) => {
            return Err(BowsyncError::audio(format!(
                "unsupported WAV format: {format:?} {bits}-bit"
            )))
        }
    };

    Ok(AudioBuffer::new(
        downmix(&interleaved, channels),
        spec.sample_rate,
    ))
}

fn collect<S, I, F>(samples: I, convert: F) -> BowsyncResult<Vec<f32>>
where
    I: Iterator<Item = hound::Result<S>>,
    F: Fn(S) -> f32,
{
    samples
        .map(|s| s.map(&convert))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BowsyncError::audio(e.to_string()))
}

/// Average interleaved channels into one.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

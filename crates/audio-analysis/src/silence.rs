//! Silence detection strategies.
//!
//! A [`SilenceDetector`] produces one flag per pitch sample. The energy
//! strategy analyzes the raw waveform independently of the pitch estimator;
//! the confidence strategy trusts the estimator's voicing confidence.

use bowsync_common::config::{SilenceConfig, SilenceStrategy};
use bowsync_common::error::{BowsyncError, BowsyncResult};
use bowsync_session_model::pitch::PitchSample;
use realfft::RealFftPlanner;

use crate::ingest::AudioBuffer;

/// Decides which pitch samples are silent.
pub trait SilenceDetector: Send + Sync {
    /// One flag per sample, `true` meaning silent.
    ///
    /// The result may be shorter or longer than `samples` when the detector
    /// works from an independent signal; callers align by position.
    fn silence_flags(&self, samples: &[PitchSample]) -> Vec<bool>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Silent when the estimator's voicing confidence is below a threshold.
///
/// A NaN confidence never compares below, so it counts as voiced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceSilenceDetector {
    pub threshold: f64,
}

impl ConfidenceSilenceDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl SilenceDetector for ConfidenceSilenceDetector {
    fn silence_flags(&self, samples: &[PitchSample]) -> Vec<bool> {
        samples
            .iter()
            .map(|s| s.confidence < self.threshold)
            .collect()
    }

    fn name(&self) -> &'static str {
        "confidence"
    }
}

/// Silent when the normalized short-time spectral energy of the waveform
/// window aligned with a sample is below a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySilenceDetector {
    window_len: usize,
    energies: Vec<f32>,
    flags: Vec<bool>,
}

impl EnergySilenceDetector {
    /// Analyze a waveform in windows of `floor(sample_rate / target_fps)`
    /// samples, the hop of the pitch estimator at the same rate.
    pub fn analyze(audio: &AudioBuffer, target_fps: f64, threshold: f64) -> BowsyncResult<Self> {
        if audio.is_empty() {
            return Err(BowsyncError::empty_input("audio contains no samples"));
        }
        if audio.sample_rate == 0 {
            return Err(BowsyncError::config("audio sample rate must be positive"));
        }
        if !(target_fps.is_finite() && target_fps > 0.0) {
            return Err(BowsyncError::config(format!(
                "target fps must be positive, got {target_fps}"
            )));
        }

        let window_len = ((audio.sample_rate as f64 / target_fps) as usize).max(1);
        let energies = normalize(window_energies(&audio.samples, window_len)?);
        let flags: Vec<bool> = energies
            .iter()
            .map(|&e| (e as f64) < threshold)
            .collect();

        tracing::debug!(
            windows = flags.len(),
            window_len,
            silent = flags.iter().filter(|&&f| f).count(),
            threshold,
            "Computed energy silence flags"
        );

        Ok(Self {
            window_len,
            energies,
            flags,
        })
    }

    /// Samples per analysis window.
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Energy of every window, normalized to the loudest one.
    pub fn energies(&self) -> &[f32] {
        &self.energies
    }

    /// Flag of every window.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }
}

impl SilenceDetector for EnergySilenceDetector {
    fn silence_flags(&self, _samples: &[PitchSample]) -> Vec<bool> {
        self.flags.clone()
    }

    fn name(&self) -> &'static str {
        "energy"
    }
}

/// Spectral energy `Σ|X_k|²` of consecutive non-overlapping windows.
///
/// The trailing partial window is zero-padded.
pub fn window_energies(samples: &[f32], window_len: usize) -> BowsyncResult<Vec<f32>> {
    if window_len == 0 {
        return Err(BowsyncError::config("window length must be positive"));
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(window_len);
    let mut input = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();

    let mut energies = Vec::with_capacity(samples.len().div_ceil(window_len));
    for chunk in samples.chunks(window_len) {
        input[..chunk.len()].copy_from_slice(chunk);
        input[chunk.len()..].fill(0.0);
        fft.process(&mut input, &mut spectrum)
            .map_err(|e| BowsyncError::audio(format!("FFT failed: {e}")))?;
        energies.push(spectrum.iter().map(|c| c.norm_sqr()).sum());
    }
    Ok(energies)
}

/// Divide by the maximum; all-zero input stays all zero.
fn normalize(mut energies: Vec<f32>) -> Vec<f32> {
    let max = energies.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for e in &mut energies {
            *e /= max;
        }
    }
    energies
}

/// Build the configured detector.
///
/// The energy strategy requires audio; the confidence strategy ignores it.
pub fn detector_for(
    config: &SilenceConfig,
    audio: Option<&AudioBuffer>,
) -> BowsyncResult<Box<dyn SilenceDetector>> {
    match config.strategy {
        SilenceStrategy::ConfidenceBased => Ok(Box::new(ConfidenceSilenceDetector::new(
            config.confidence_threshold,
        ))),
        SilenceStrategy::EnergyBased => {
            let audio = audio.ok_or_else(|| {
                BowsyncError::config("energy-based silence detection requires audio")
            })?;
            Ok(Box::new(EnergySilenceDetector::analyze(
                audio,
                config.target_fps,
                config.energy_threshold,
            )?))
        }
    }
}

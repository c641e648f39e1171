//! Bow direction extraction: the "trajectory-to-stroke" classifier.
//!
//! # Algorithm
//!
//! 1. **Project** the keypoint cloud onto its dominant principal axis.
//! 2. **Classify** each consecutive pair of projected values as Up, Down or
//!    Stationary according to the configured polarity.
//! 3. **Smooth** the label sequence with a centered majority vote.
//! 4. **Emit** one segment per consecutive frame pair.

use bowsync_common::config::{DirectionConfig, DirectionPolarity};
use bowsync_common::error::{BowsyncError, BowsyncResult};
use bowsync_session_model::direction::{Direction, DirectionSegment};
use bowsync_session_model::trajectory::Trajectory;

use crate::pca::{ImageAxis, PrincipalAxes};
use crate::smoothing::majority_smooth;

/// Intermediate results of one extraction, for diagnostics and plotting.
#[derive(Debug, Clone)]
pub struct DirectionAnalysis {
    /// Principal axes of the trajectory.
    pub axes: PrincipalAxes,
    /// Dominant-axis coordinate of every trajectory sample.
    pub projection: Vec<f64>,
    /// Labels before smoothing.
    pub raw: Vec<Direction>,
    /// Final segments.
    pub segments: Vec<DirectionSegment>,
}

/// The bow direction extractor.
pub struct DirectionExtractor {
    config: DirectionConfig,
}

impl DirectionExtractor {
    /// Create a new extractor with the given configuration.
    pub fn new(config: DirectionConfig) -> Self {
        Self { config }
    }

    /// Create an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(DirectionConfig::default())
    }

    /// Classify a trajectory into `len - 1` direction segments.
    pub fn extract(&self, trajectory: &Trajectory) -> BowsyncResult<Vec<DirectionSegment>> {
        Ok(self.analyze(trajectory)?.segments)
    }

    /// Classify a trajectory and keep the intermediate signals.
    pub fn analyze(&self, trajectory: &Trajectory) -> BowsyncResult<DirectionAnalysis> {
        validate(trajectory)?;

        let points: Vec<(f64, f64)> = trajectory.points.iter().map(|p| (p.x, p.y)).collect();
        let axes = PrincipalAxes::fit(&points)
            .ok_or_else(|| BowsyncError::insufficient_data("trajectory needs at least 2 samples"))?;
        let projection = axes.project_dominant(&points);

        let polarity = self.effective_polarity(&axes);
        let raw = classify_steps(&projection, polarity);
        let smoothed = majority_smooth(&raw, self.config.window_size);

        let segments = trajectory
            .points
            .windows(2)
            .zip(smoothed)
            .map(|(pair, direction)| DirectionSegment::new(pair[0].frame, pair[1].frame, direction))
            .collect::<Vec<_>>();

        tracing::debug!(
            samples = trajectory.len(),
            segments = segments.len(),
            axis = ?axes.dominant_image_axis(),
            explained = axes.explained_ratio(),
            polarity = ?self.config.polarity,
            "Extracted bow directions"
        );

        Ok(DirectionAnalysis {
            axes,
            projection,
            raw,
            segments,
        })
    }

    /// Decreasing-means-Up unless the axis-aware policy sees a horizontal stroke.
    fn effective_polarity(&self, axes: &PrincipalAxes) -> StepPolarity {
        match (self.config.polarity, axes.dominant_image_axis()) {
            (DirectionPolarity::AxisAware, ImageAxis::Horizontal) => StepPolarity::DecreasingIsDown,
            _ => StepPolarity::DecreasingIsUp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepPolarity {
    DecreasingIsUp,
    DecreasingIsDown,
}

fn classify_steps(projection: &[f64], polarity: StepPolarity) -> Vec<Direction> {
    projection
        .windows(2)
        .map(|pair| {
            let step = if pair[1] < pair[0] {
                Direction::Up
            } else if pair[1] > pair[0] {
                Direction::Down
            } else {
                Direction::Stationary
            };
            match polarity {
                StepPolarity::DecreasingIsUp => step,
                StepPolarity::DecreasingIsDown => step.flipped(),
            }
        })
        .collect()
}

fn validate(trajectory: &Trajectory) -> BowsyncResult<()> {
    if trajectory.len() < 2 {
        return Err(BowsyncError::insufficient_data(format!(
            "trajectory needs at least 2 samples, got {}",
            trajectory.len()
        )));
    }
    if let Some(bad) = trajectory.points.iter().find(|p| !p.is_finite()) {
        return Err(BowsyncError::malformed(format!(
            "non-finite keypoint coordinate at frame {}",
            bad.frame
        )));
    }
    if let Some(pair) = trajectory
        .points
        .windows(2)
        .find(|pair| pair[1].frame <= pair[0].frame)
    {
        return Err(BowsyncError::malformed(format!(
            "frame numbers must increase strictly, found {} after {}",
            pair[1].frame, pair[0].frame
        )));
    }
    Ok(())
}

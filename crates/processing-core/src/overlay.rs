//! Overlay cue planning for the video renderer.
//!
//! Converts annotations into one cue per video frame plus the drawing
//! primitives a renderer needs. No pixels are touched here.

use std::collections::BTreeMap;

use bowsync_common::config::OverlayConfig;
use bowsync_session_model::event::{Annotation, AnnotationLabel};
use serde::{Deserialize, Serialize};

/// What to draw on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayCue {
    UpArrow,
    DownArrow,
    SilenceMarker,
}

impl OverlayCue {
    /// Cue for an annotation label. Stationary frames draw nothing.
    pub fn for_label(label: AnnotationLabel) -> Option<Self> {
        match label {
            AnnotationLabel::Up => Some(OverlayCue::UpArrow),
            AnnotationLabel::Down => Some(OverlayCue::DownArrow),
            AnnotationLabel::Silence => Some(OverlayCue::SilenceMarker),
            AnnotationLabel::Stationary => None,
        }
    }

    /// Stroke color in BGR order.
    pub fn color_bgr(&self) -> [u8; 3] {
        match self {
            OverlayCue::UpArrow => [0, 255, 0],
            OverlayCue::DownArrow => [0, 0, 255],
            OverlayCue::SilenceMarker => [255, 255, 0],
        }
    }
}

/// Drawing primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Arrow,
    Line,
}

/// A single drawing primitive in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueShape {
    pub kind: ShapeKind,
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub color_bgr: [u8; 3],
    pub thickness: i32,
    /// Arrow tip length as a fraction of the arrow; 0 for lines.
    pub tip_length: f64,
}

/// A cue resolved for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedCue {
    pub frame: i64,
    pub cue: OverlayCue,
    pub shape: CueShape,
}

/// Frame-indexed overlay plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuePlan {
    cues: BTreeMap<i64, OverlayCue>,
}

impl CuePlan {
    /// Build a plan from annotations. The first annotation of a frame wins.
    pub fn from_annotations(annotations: &[Annotation]) -> Self {
        let mut cues = BTreeMap::new();
        let mut seen = std::collections::HashSet::new();
        for annotation in annotations {
            if !seen.insert(annotation.frame) {
                continue;
            }
            if let Some(cue) = OverlayCue::for_label(annotation.annotation) {
                cues.insert(annotation.frame, cue);
            }
        }
        Self { cues }
    }

    /// Cue for a frame, if any.
    pub fn cue_at(&self, frame: i64) -> Option<OverlayCue> {
        self.cues.get(&frame).copied()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Resolve every cue into drawing primitives for a frame size.
    pub fn render(&self, width: u32, height: u32, config: &OverlayConfig) -> Vec<RenderedCue> {
        self.cues
            .iter()
            .map(|(&frame, &cue)| RenderedCue {
                frame,
                cue,
                shape: shape_for(cue, width, height, config),
            })
            .collect()
    }
}

/// Geometry of a cue anchored at `(width - inset, height / 2)`.
pub fn shape_for(cue: OverlayCue, width: u32, height: u32, config: &OverlayConfig) -> CueShape {
    let anchor = (width as i32 - config.anchor_inset, height as i32 / 2);
    let color_bgr = cue.color_bgr();
    match cue {
        OverlayCue::UpArrow => CueShape {
            kind: ShapeKind::Arrow,
            start: anchor,
            end: (anchor.0, anchor.1 - config.arrow_length),
            color_bgr,
            thickness: config.thickness,
            tip_length: config.tip_length,
        },
        OverlayCue::DownArrow => CueShape {
            kind: ShapeKind::Arrow,
            start: anchor,
            end: (anchor.0, anchor.1 + config.arrow_length),
            color_bgr,
            thickness: config.thickness,
            tip_length: config.tip_length,
        },
        OverlayCue::SilenceMarker => {
            let half = config.silence_marker_length / 2;
            CueShape {
                kind: ShapeKind::Line,
                start: (anchor.0, anchor.1 - half),
                end: (anchor.0, anchor.1 + half),
                color_bgr,
                thickness: config.thickness,
                tip_length: 0.0,
            }
        }
    }
}

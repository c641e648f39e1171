//! Inferred note events and fused annotations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::trajectory::FrameNumber;

/// Classification of one pitch sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteEventKind {
    /// No bow contact.
    Silence,
    /// A different note than the previous voiced sample.
    Change,
    /// Same note as the previous voiced sample.
    Sustain,
}

impl NoteEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteEventKind::Silence => "silence",
            NoteEventKind::Change => "change",
            NoteEventKind::Sustain => "sustain",
        }
    }

    pub fn is_silence(&self) -> bool {
        matches!(self, NoteEventKind::Silence)
    }
}

impl fmt::Display for NoteEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified pitch sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferredNoteEvent {
    /// Continuous frame estimate, in the audio stream's numbering.
    #[serde(rename = "Frame")]
    pub frame: f64,

    #[serde(rename = "Time (s)")]
    pub time: f64,

    /// Note name such as `A4`; empty for silence.
    #[serde(rename = "Note")]
    pub note: Option<String>,

    #[serde(rename = "Event")]
    pub event: NoteEventKind,
}

impl InferredNoteEvent {
    pub fn silence(frame: f64, time: f64) -> Self {
        Self {
            frame,
            time,
            note: None,
            event: NoteEventKind::Silence,
        }
    }

    pub fn voiced(frame: f64, time: f64, note: Option<String>, event: NoteEventKind) -> Self {
        Self {
            frame,
            time,
            note,
            event,
        }
    }
}

/// Final cue for one frame: a bowing direction or a silence marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationLabel {
    Up,
    Down,
    Stationary,
    #[serde(rename = "silence")]
    Silence,
}

impl AnnotationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationLabel::Up => "Up",
            AnnotationLabel::Down => "Down",
            AnnotationLabel::Stationary => "Stationary",
            AnnotationLabel::Silence => "silence",
        }
    }
}

impl From<Direction> for AnnotationLabel {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => AnnotationLabel::Up,
            Direction::Down => AnnotationLabel::Down,
            Direction::Stationary => AnnotationLabel::Stationary,
        }
    }
}

impl fmt::Display for AnnotationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fused output record, in the direction stream's frame numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "Frame")]
    pub frame: FrameNumber,

    #[serde(rename = "Time (s)")]
    pub time: f64,

    #[serde(rename = "Note")]
    pub note: Option<String>,

    #[serde(rename = "Event")]
    pub event: NoteEventKind,

    #[serde(rename = "Annotation")]
    pub annotation: AnnotationLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_labels() {
        assert_eq!(NoteEventKind::Silence.to_string(), "silence");
        assert_eq!(NoteEventKind::Change.as_str(), "change");
        assert!(NoteEventKind::Silence.is_silence());
        assert!(!NoteEventKind::Sustain.is_silence());
    }

    #[test]
    fn test_annotation_label_from_direction() {
        assert_eq!(AnnotationLabel::from(Direction::Up), AnnotationLabel::Up);
        assert_eq!(
            AnnotationLabel::from(Direction::Stationary).to_string(),
            "Stationary"
        );
        assert_eq!(AnnotationLabel::Silence.to_string(), "silence");
    }

    #[test]
    fn test_silence_event_has_no_note() {
        let event = InferredNoteEvent::silence(301.5, 0.05);
        assert!(event.note.is_none());
        assert!(event.event.is_silence());
    }

    #[test]
    fn test_label_serializes_like_display() {
        let json = serde_json::to_string(&AnnotationLabel::Silence).unwrap();
        assert_eq!(json, "\"silence\"");
        let json = serde_json::to_string(&AnnotationLabel::Down).unwrap();
        assert_eq!(json, "\"Down\"");
    }
}

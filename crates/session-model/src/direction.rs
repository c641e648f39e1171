//! Bowing direction segments.

use std::fmt;

use bowsync_common::clock::FrameOffset;
use bowsync_common::error::BowsyncResult;
use serde::{Deserialize, Serialize};

use crate::trajectory::FrameNumber;

/// Discrete bow motion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Stationary,
}

impl Direction {
    /// Label used in tables and annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Stationary => "Stationary",
        }
    }

    /// The opposite stroke. `Stationary` stays stationary.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Stationary => Direction::Stationary,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction attributed to the interval between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSegment {
    #[serde(rename = "Frame Start")]
    pub frame_start: FrameNumber,

    #[serde(rename = "Frame End")]
    pub frame_end: FrameNumber,

    #[serde(rename = "Direction")]
    pub direction: Direction,
}

impl DirectionSegment {
    pub fn new(frame_start: FrameNumber, frame_end: FrameNumber, direction: Direction) -> Self {
        Self {
            frame_start,
            frame_end,
            direction,
        }
    }

    /// This segment shifted into another frame numbering.
    pub fn shifted(&self, offset: FrameOffset) -> BowsyncResult<Self> {
        Ok(Self {
            frame_start: offset.apply(self.frame_start)?,
            frame_end: offset.apply(self.frame_end)?,
            direction: self.direction,
        })
    }
}

/// Whether consecutive segments share their boundary frames.
pub fn segments_are_contiguous(segments: &[DirectionSegment]) -> bool {
    segments
        .windows(2)
        .all(|pair| pair[0].frame_end == pair[1].frame_start)
}

//! Timestamped trajectory samples

use crate::time::Timestamp;
use acmiview_core::LocalPosition;
use serde::{Deserialize, Serialize};

/// Attitude of an entity in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn from_degrees(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self {
            pitch: pitch.to_radians(),
            yaw: yaw.to_radians(),
            roll: roll.to_radians(),
        }
    }
}

/// Velocity in the local frame, meters per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

/// One timestamped position of an entity.
///
/// Orientation and velocity are optional and independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: Timestamp,
    pub position: LocalPosition,
    pub orientation: Option<Orientation>,
    pub velocity: Option<Velocity>,
}

impl Sample {
    pub fn new(time: Timestamp, position: LocalPosition) -> Self {
        Self {
            time,
            position,
            orientation: None,
            velocity: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_velocity(mut self, velocity: Velocity) -> Self {
        self.velocity = Some(velocity);
        self
    }
}

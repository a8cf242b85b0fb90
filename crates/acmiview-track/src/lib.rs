//! # acmiview Track
//!
//! In-memory model of a replay: entities with time ordered trajectories, the registry
//! that holds them and the clock that moves through them.
//!
//! - [`Trajectory`]: append-only samples with interpolated `position_at` and trail
//!   queries.
//! - [`Entity`]: identity, [`Classification`], color and visibility.
//! - [`EntityRegistry`]: entities by id, cached time bounds and a playback cursor.
//! - [`PlaybackClock`]: play/pause, speed, stepping and the loop policy.

pub mod clock;
pub mod entity;
pub mod registry;
pub mod sample;
pub mod time;
pub mod trajectory;

pub use clock::PlaybackClock;
pub use entity::{Classification, Entity, EntityId, Rgb};
pub use registry::EntityRegistry;
pub use sample::{Orientation, Sample, Velocity};
pub use time::{offset_by, seconds_between, Timestamp};
pub use trajectory::Trajectory;

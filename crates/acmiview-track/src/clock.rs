//! Playback clock driving a registry's cursor.
//!
//! The registry never clamps its cursor. The clock owns the bounds policy: after the end
//! it either wraps to the start (looping) or stops at the end and pauses; it never moves
//! the cursor before the start.

use crate::registry::EntityRegistry;
use crate::time::{offset_by, seconds_between, Timestamp};
use acmiview_core::config::PlaybackConfig;
use acmiview_core::error::{ConfigError, Result};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    playing: bool,
    speed: f64,
    tick_interval: Duration,
    step_secs: f64,
    looping: bool,
}

impl PlaybackClock {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            playing: false,
            speed: config.speed,
            tick_interval: config.tick_interval(),
            step_secs: config.step_secs,
            looping: config.looping,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::invalid_value(
                "playback.speed",
                format!("must be a positive number, got {speed}"),
            )
            .into());
        }
        self.speed = speed;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Replay seconds covered by one tick at the current speed
    pub fn tick_secs(&self) -> f64 {
        self.tick_interval.as_secs_f64() * self.speed
    }

    /// Advances the cursor by one tick if playing. Returns the cursor afterwards.
    pub fn tick(&mut self, registry: &mut EntityRegistry) -> Option<Timestamp> {
        if self.playing {
            self.advance(registry, self.tick_secs());
        }
        registry.current_time()
    }

    pub fn step_forward(&mut self, registry: &mut EntityRegistry) -> Option<Timestamp> {
        self.advance(registry, self.step_secs);
        registry.current_time()
    }

    pub fn step_back(&mut self, registry: &mut EntityRegistry) -> Option<Timestamp> {
        self.advance(registry, -self.step_secs);
        registry.current_time()
    }

    /// Moves the cursor to `offset_secs` after the start, clamped to the time range.
    pub fn seek(&self, registry: &mut EntityRegistry, offset_secs: f64) -> Option<Timestamp> {
        let (start, end) = registry.time_range()?;
        let target = offset_by(start, offset_secs)?.clamp(start, end);
        registry.set_time(target);
        Some(target)
    }

    pub fn rewind(&self, registry: &mut EntityRegistry) -> Option<Timestamp> {
        let start = registry.start_time()?;
        registry.set_time(start);
        Some(start)
    }

    /// Fraction of the time range already played, in [0, 1].
    pub fn progress(&self, registry: &EntityRegistry) -> Option<f64> {
        let (start, end) = registry.time_range()?;
        let now = registry.current_time()?;
        let total = seconds_between(start, end);
        if total <= 0.0 {
            return Some(1.0);
        }
        Some((seconds_between(start, now) / total).clamp(0.0, 1.0))
    }

    fn advance(&mut self, registry: &mut EntityRegistry, delta_secs: f64) {
        let Some((start, end)) = registry.time_range() else {
            return;
        };
        registry.advance_time(delta_secs);
        let Some(now) = registry.current_time() else {
            return;
        };

        if now > end {
            if self.looping {
                debug!("Reached end of replay, looping to start");
                registry.set_time(start);
            } else {
                debug!("Reached end of replay, pausing");
                registry.set_time(end);
                self.playing = false;
            }
        } else if now < start {
            registry.set_time(start);
        }
    }
}

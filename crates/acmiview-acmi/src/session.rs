//! A replay session: the current registry, its clock and trail settings.

use crate::importer::AcmiImporter;
use crate::report::ImportReport;
use acmiview_core::config::{AppConfig, TrailConfig};
use acmiview_core::{ImportError, LocalPosition};
use acmiview_track::{EntityId, EntityRegistry, PlaybackClock, Timestamp};
use std::sync::atomic::AtomicBool;
use tracing::info;

/// Owns the registry of the last successful import.
///
/// Every import builds a new registry. It replaces the current one only when the import
/// succeeds, so a failed import leaves the previous replay untouched.
#[derive(Debug, Clone)]
pub struct ReplaySession {
    importer: AcmiImporter,
    registry: EntityRegistry,
    clock: PlaybackClock,
    trail: TrailConfig,
    report: Option<ImportReport>,
    reference_time: Option<Timestamp>,
}

impl ReplaySession {
    pub fn new(importer: AcmiImporter, clock: PlaybackClock, trail: TrailConfig) -> Self {
        Self {
            importer,
            registry: EntityRegistry::new(),
            clock,
            trail,
            report: None,
            reference_time: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            AcmiImporter::from_config(config),
            PlaybackClock::from_config(&config.playback),
            config.trail.clone(),
        )
    }

    pub fn import(&mut self, text: &str) -> Result<&ImportReport, ImportError> {
        let replay = self.importer.import(text)?;
        Ok(self.replace(replay))
    }

    pub fn import_cancellable(
        &mut self,
        text: &str,
        cancel: &AtomicBool,
    ) -> Result<&ImportReport, ImportError> {
        let replay = self.importer.import_cancellable(text, cancel)?;
        Ok(self.replace(replay))
    }

    fn replace(&mut self, replay: crate::parser::ParsedReplay) -> &ImportReport {
        info!(
            entities = replay.registry.len(),
            reference_time = %replay.reference_time,
            "Replacing replay"
        );
        self.registry = replay.registry;
        self.reference_time = Some(replay.reference_time);
        self.clock.pause();
        self.report.insert(replay.report)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock {
        &mut self.clock
    }

    /// Report of the last successful import
    pub fn report(&self) -> Option<&ImportReport> {
        self.report.as_ref()
    }

    pub fn reference_time(&self) -> Option<Timestamp> {
        self.reference_time
    }

    pub fn trail_config(&self) -> &TrailConfig {
        &self.trail
    }

    pub fn tick(&mut self) -> Option<Timestamp> {
        self.clock.tick(&mut self.registry)
    }

    pub fn step_forward(&mut self) -> Option<Timestamp> {
        self.clock.step_forward(&mut self.registry)
    }

    pub fn step_back(&mut self) -> Option<Timestamp> {
        self.clock.step_back(&mut self.registry)
    }

    pub fn seek(&mut self, offset_secs: f64) -> Option<Timestamp> {
        self.clock.seek(&mut self.registry, offset_secs)
    }

    /// Trails of every visible entity at the cursor, empty when trails are disabled.
    pub fn trails(&self) -> Vec<(&EntityId, Vec<LocalPosition>)> {
        if !self.trail.enabled {
            return Vec::new();
        }
        self.registry
            .iter()
            .filter(|e| e.visible)
            .filter_map(|e| {
                self.registry
                    .trail(e.id().as_str(), self.trail.length_secs)
                    .map(|points| (e.id(), points))
            })
            .collect()
    }
}

impl Default for ReplaySession {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

//! Line-oriented ACMI state machine.
//!
//! ```text
//! AwaitingHeader --FileType=..acmi..--> AwaitingDataMarker --first '#'--> StreamingRecords
//!        \                                   \                                 |
//!         `------------- Failed <-------------'                          finish()
//! ```
//!
//! Header problems move the parser to [`ParseState::Failed`] and every later call returns
//! the same error. Problems with a single record are collected into the
//! [`ImportReport`] and the line is skipped.

use crate::attributes::{Attributes, TransformUpdate};
use crate::header::{parse_file_type, parse_reference_time, reference_time_value, BOM};
use crate::report::ImportReport;
use acmiview_core::config::ClassificationConfig;
use acmiview_core::{GeoError, ImportError, RecordError, ReferencePoint};
use acmiview_track::{
    offset_by, Classification, Entity, EntityId, EntityRegistry, Orientation, Rgb, Sample,
    Timestamp,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

const FRAME_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq)]
pub enum ParseState {
    /// Waiting for the `FileType=` line
    AwaitingHeader,
    /// Reading header lines until the first time frame
    AwaitingDataMarker,
    /// Reading time frames and entity lines
    StreamingRecords,
    /// A header error ended the import
    Failed(ImportError),
}

/// Result of a successful import
#[derive(Debug, Clone)]
pub struct ParsedReplay {
    pub registry: EntityRegistry,
    pub report: ImportReport,
    pub reference_time: Timestamp,
}

/// Values an entity last reported, reused for empty `T=` components
#[derive(Debug, Clone, Copy, Default)]
struct LastKnown {
    longitude: Option<f64>,
    latitude: Option<f64>,
    altitude: Option<f64>,
    orientation: [Option<f64>; 3],
}

#[derive(Debug)]
struct Track {
    entity: Entity,
    last: LastKnown,
}

pub struct AcmiParser {
    reference: ReferencePoint,
    rules: ClassificationConfig,
    state: ParseState,
    line_number: usize,
    reference_time: Option<Timestamp>,
    frame_time: Option<Timestamp>,
    tracks: BTreeMap<EntityId, Track>,
    report: ImportReport,
}

impl AcmiParser {
    pub fn new(reference: ReferencePoint, rules: ClassificationConfig) -> Self {
        Self {
            reference,
            rules,
            state: ParseState::AwaitingHeader,
            line_number: 0,
            reference_time: None,
            frame_time: None,
            tracks: BTreeMap::new(),
            report: ImportReport::default(),
        }
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Number of lines fed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn reference_time(&self) -> Option<Timestamp> {
        self.reference_time
    }

    /// Time of the last valid frame line
    pub fn frame_time(&self) -> Option<Timestamp> {
        self.frame_time
    }

    pub fn report(&self) -> &ImportReport {
        &self.report
    }

    /// Feeds one line, without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`ImportError`] once the header turns out to be unusable, and
    /// again for every line fed after that.
    pub fn feed_line(&mut self, line: &str) -> Result<(), ImportError> {
        if let ParseState::Failed(err) = &self.state {
            return Err(err.clone());
        }

        self.line_number += 1;
        self.report.lines_read += 1;
        let line = line.trim();

        let result = match self.state {
            ParseState::AwaitingHeader => self.read_file_type(line),
            ParseState::AwaitingDataMarker => self.read_header_line(line),
            ParseState::StreamingRecords => {
                self.read_record(line);
                Ok(())
            }
            ParseState::Failed(_) => Ok(()),
        };

        if let Err(err) = &result {
            self.state = ParseState::Failed(err.clone());
        }
        result
    }

    /// Ends the input and builds the registry from every entity that has samples.
    pub fn finish(mut self) -> Result<ParsedReplay, ImportError> {
        let reference_time = match (&self.state, self.reference_time) {
            (ParseState::Failed(err), _) => return Err(err.clone()),
            (ParseState::AwaitingHeader, _) => return Err(ImportError::EmptyInput),
            (_, None) => return Err(ImportError::MissingReferenceTime),
            (ParseState::AwaitingDataMarker, Some(_)) => {
                return Err(ImportError::MissingDataSection)
            }
            (ParseState::StreamingRecords, Some(t)) => t,
        };

        let mut registry = EntityRegistry::new();
        for (id, track) in std::mem::take(&mut self.tracks) {
            if track.entity.trajectory().is_empty() {
                debug!(%id, "Discarding entity without samples");
                self.report.entities_discarded += 1;
            } else {
                registry.add(track.entity);
            }
        }

        Ok(ParsedReplay {
            registry,
            report: self.report,
            reference_time,
        })
    }

    fn read_file_type(&mut self, line: &str) -> Result<(), ImportError> {
        if line.trim_start_matches(BOM).trim().is_empty() {
            return Ok(());
        }
        let file_type = parse_file_type(line)?;
        debug!(file_type, "Recognized file type");
        self.state = ParseState::AwaitingDataMarker;
        Ok(())
    }

    fn read_header_line(&mut self, line: &str) -> Result<(), ImportError> {
        if line.starts_with(FRAME_MARKER) {
            if self.reference_time.is_none() {
                return Err(ImportError::MissingReferenceTime);
            }
            self.state = ParseState::StreamingRecords;
            self.read_record(line);
            return Ok(());
        }

        if let Some(value) = reference_time_value(line) {
            let reference_time = parse_reference_time(value)?;
            debug!(%reference_time, "Reference time");
            self.reference_time = Some(reference_time);
        }
        Ok(())
    }

    fn read_record(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        match line.strip_prefix(FRAME_MARKER) {
            Some(offset) => self.read_frame(line, offset),
            None => self.read_entity_line(line),
        }
    }

    fn read_frame(&mut self, line: &str, offset: &str) {
        let time = offset
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|secs| self.reference_time.and_then(|r| offset_by(r, secs)));

        match time {
            Some(t) => {
                trace!(frame_time = %t, "Time frame");
                self.frame_time = Some(t);
                self.report.frames += 1;
            }
            None => self
                .report
                .warn(self.line_number, line, RecordError::malformed_frame(line)),
        }
    }

    fn read_entity_line(&mut self, line: &str) {
        let split = line.split_once(',').filter(|_| line.contains('='));
        let Some((id, list)) = split else {
            self.report.warn(
                self.line_number,
                line,
                RecordError::malformed_record("expected '<id>,<key>=<value>'"),
            );
            return;
        };
        let id = id.trim();
        if id.is_empty() {
            self.report.warn(
                self.line_number,
                line,
                RecordError::malformed_record("missing entity id"),
            );
            return;
        }

        self.report.entity_lines += 1;
        let attrs = Attributes::parse(list);

        if !self.tracks.contains_key(id) {
            let entity = self.create_entity(id, &attrs);
            self.tracks.insert(
                EntityId::new(id),
                Track {
                    entity,
                    last: LastKnown::default(),
                },
            );
            self.report.entities_created += 1;
        }

        let Some(transform) = attrs.get("T") else {
            return;
        };
        let Some(time) = self.frame_time else {
            trace!(id, "Position update before any time frame");
            self.report.untimed_updates += 1;
            return;
        };

        let applied = match self.tracks.get_mut(id) {
            Some(track) => apply_transform(track, transform, time, &self.reference),
            None => return,
        };
        match applied {
            Ok(()) => self.report.samples += 1,
            Err(err) => self.report.warn(self.line_number, line, err),
        }
    }

    fn create_entity(&self, id: &str, attrs: &Attributes) -> Entity {
        let name = attrs
            .get("Name")
            .map(str::to_string)
            .unwrap_or_else(|| Entity::fallback_name(id));
        let entity_type = attrs.get("Type");
        let radius = attrs.get("Radius").and_then(|r| r.parse::<f64>().ok());
        let classification = Classification::classify(id, &name, entity_type, radius, &self.rules);

        debug!(id, name = %name, %classification, "Created entity");

        let mut entity = Entity::new(id, name, classification);
        if let Some(entity_type) = entity_type {
            entity = entity.with_type(entity_type);
        }
        if let Some(coalition) = attrs.get("Coalition") {
            entity = entity.with_coalition(coalition);
        }
        if let Some(color) = attrs.get("Color") {
            entity = entity.with_color(Rgb::from_name(color));
        }
        entity
    }
}

fn apply_transform(
    track: &mut Track,
    value: &str,
    time: Timestamp,
    reference: &ReferencePoint,
) -> Result<(), RecordError> {
    let update = TransformUpdate::parse(value)?;
    let last = track.last;

    let resolve = |current: Option<f64>, previous: Option<f64>, field: &str| {
        current.or(previous).ok_or_else(|| {
            RecordError::malformed_position(value, format!("no previous {field} to reuse"))
        })
    };
    let longitude = resolve(update.longitude, last.longitude, "longitude")?;
    let latitude = resolve(update.latitude, last.latitude, "latitude")?;
    let altitude = resolve(update.altitude, last.altitude, "altitude")?;

    let position = reference.to_local(longitude, latitude, altitude)?;

    let mut orientation = last.orientation;
    for (slot, current) in orientation.iter_mut().zip(update.orientation) {
        if current.is_some() {
            *slot = current;
        }
    }
    for (field, angle) in ["pitch", "yaw", "roll"].iter().zip(orientation) {
        if let Some(angle) = angle.filter(|a| !a.is_finite()) {
            return Err(GeoError::non_finite(*field, angle).into());
        }
    }

    let mut sample = Sample::new(time, position);
    if let [Some(pitch), Some(yaw), Some(roll)] = orientation {
        sample = sample.with_orientation(Orientation::from_degrees(pitch, yaw, roll));
    }
    track.entity.add_sample(sample)?;

    track.last = LastKnown {
        longitude: Some(longitude),
        latitude: Some(latitude),
        altitude: Some(altitude),
        orientation,
    };
    Ok(())
}

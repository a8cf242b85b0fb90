//! Tracked entities and their classification.

use crate::sample::Sample;
use crate::trajectory::Trajectory;
use acmiview_core::config::ClassificationConfig;
use acmiview_core::RecordError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque entity identifier, unique within one import.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// RGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const GRAY: Rgb = Rgb::new(0.7, 0.7, 0.7);
    pub const ORANGE: Rgb = Rgb::new(1.0, 0.5, 0.0);
    pub const AMBER: Rgb = Rgb::new(1.0, 0.7, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Maps a `Color=` value to a color. Unknown names fall back to gray.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Self::RED,
            "blue" => Self::BLUE,
            "green" => Self::GREEN,
            _ => Self::GRAY,
        }
    }
}

/// What kind of object an entity is. Fixed when the entity is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Classification {
    Aircraft,
    Missile,
    Explosion { radius: f64 },
}

impl Classification {
    /// Classifies a new entity from its first record.
    ///
    /// Explosion wins over missile, missile over aircraft. `radius` is only used for
    /// explosions; a missing, non-finite or non-positive value takes the configured
    /// default.
    pub fn classify(
        id: &str,
        name: &str,
        entity_type: Option<&str>,
        radius: Option<f64>,
        rules: &ClassificationConfig,
    ) -> Self {
        let keyword = rules.explosion_keyword.to_lowercase();
        let is_explosion = entity_type
            .map(|t| t.to_lowercase().contains(&keyword))
            .unwrap_or(false);
        if is_explosion {
            let radius = radius
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or(rules.explosion_radius);
            return Classification::Explosion { radius };
        }

        let side_launched = rules.side_prefixes.iter().any(|p| id.starts_with(p.as_str()));
        let is_weapon = rules
            .missile_designators
            .iter()
            .any(|d| name.contains(d.as_str()));
        if side_launched && is_weapon {
            Classification::Missile
        } else {
            Classification::Aircraft
        }
    }

    pub fn is_aircraft(&self) -> bool {
        matches!(self, Classification::Aircraft)
    }

    pub fn is_missile(&self) -> bool {
        matches!(self, Classification::Missile)
    }

    pub fn is_explosion(&self) -> bool {
        matches!(self, Classification::Explosion { .. })
    }

    pub fn radius(&self) -> Option<f64> {
        match self {
            Classification::Explosion { radius } => Some(*radius),
            _ => None,
        }
    }

    /// Render color used when the entity carries no explicit color
    pub fn default_color(&self) -> Rgb {
        match self {
            Classification::Aircraft => Rgb::WHITE,
            Classification::Missile => Rgb::ORANGE,
            Classification::Explosion { .. } => Rgb::AMBER,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Aircraft => write!(f, "aircraft"),
            Classification::Missile => write!(f, "missile"),
            Classification::Explosion { radius } => write!(f, "explosion ({radius} m)"),
        }
    }
}

/// A tracked object and its trajectory.
///
/// Identity, name, classification and color never change after creation. Only the
/// trajectory grows and the visibility flag can be toggled.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    name: String,
    entity_type: Option<String>,
    coalition: Option<String>,
    classification: Classification,
    color: Option<Rgb>,
    pub visible: bool,
    trajectory: Trajectory,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, classification: Classification) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entity_type: None,
            coalition: None,
            classification,
            color: None,
            visible: true,
            trajectory: Trajectory::new(),
        }
    }

    /// Label used when a record carries no `Name=`
    pub fn fallback_name(id: &str) -> String {
        format!("Unknown {id}")
    }

    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    pub fn with_coalition(mut self, coalition: impl Into<String>) -> Self {
        self.coalition = Some(coalition.into());
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_type(&self) -> Option<&str> {
        self.entity_type.as_deref()
    }

    pub fn coalition(&self) -> Option<&str> {
        self.coalition.as_deref()
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn display_color(&self) -> Rgb {
        self.color
            .unwrap_or_else(|| self.classification.default_color())
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn add_sample(&mut self, sample: Sample) -> Result<(), RecordError> {
        self.trajectory.push(sample)
    }
}

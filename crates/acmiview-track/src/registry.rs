//! Entity registry with cached time bounds and a playback cursor.

use crate::entity::{Entity, EntityId};
use crate::time::{offset_by, Timestamp};
use acmiview_core::LocalPosition;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// All entities of one import, keyed by id.
///
/// `start_time`/`end_time` span the earliest first sample and the latest last sample of
/// every entity. They grow on [`add`](Self::add) and are recomputed from scratch on
/// [`remove`](Self::remove). The cursor is seeded with the start time on the first add
/// and is otherwise only moved by [`set_time`](Self::set_time) and
/// [`advance_time`](Self::advance_time), without clamping.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityId, Entity>,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
    current_time: Option<Timestamp>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entity, replacing any entity with the same id.
    pub fn add(&mut self, entity: Entity) {
        let span = entity
            .trajectory()
            .first_time()
            .zip(entity.trajectory().last_time());

        let replaced = self.entities.insert(entity.id().clone(), entity);
        if let Some(old) = replaced {
            debug!(id = %old.id(), "Replaced entity, recomputing time bounds");
            self.recompute_bounds();
        } else if let Some((first, last)) = span {
            self.start_time = Some(self.start_time.map_or(first, |s| s.min(first)));
            self.end_time = Some(self.end_time.map_or(last, |e| e.max(last)));
        }

        if self.current_time.is_none() {
            self.current_time = self.start_time;
        }
    }

    /// Removes an entity and recomputes the time bounds.
    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        let removed = self.entities.remove(id)?;
        self.recompute_bounds();
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Shows or hides an entity. Returns false if the id is unknown.
    pub fn set_visibility(&mut self, id: &str, visible: bool) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Every visible entity that has a position at `t`, in id order.
    pub fn entities_at(&self, t: Timestamp) -> Vec<(&Entity, LocalPosition)> {
        self.entities
            .values()
            .filter(|e| e.visible)
            .filter_map(|e| e.trajectory().position_at(t).map(|p| (e, p)))
            .collect()
    }

    /// [`entities_at`](Self::entities_at) evaluated at the cursor.
    pub fn entities_now(&self) -> Vec<(&Entity, LocalPosition)> {
        match self.current_time {
            Some(t) => self.entities_at(t),
            None => Vec::new(),
        }
    }

    /// Trail of one entity reaching `window_secs` back from the cursor.
    pub fn trail(&self, id: &str, window_secs: f64) -> Option<Vec<LocalPosition>> {
        let entity = self.entities.get(id)?;
        let now = self.current_time?;
        entity.trajectory().trail(now, window_secs)
    }

    pub fn set_time(&mut self, t: Timestamp) {
        self.current_time = Some(t);
    }

    /// Moves the cursor by `delta_secs`. Does nothing while the cursor is unset.
    pub fn advance_time(&mut self, delta_secs: f64) {
        let Some(now) = self.current_time else {
            return;
        };
        match offset_by(now, delta_secs) {
            Some(t) => self.current_time = Some(t),
            None => warn!(delta_secs, "Ignoring cursor advance outside the representable range"),
        }
    }

    pub fn current_time(&self) -> Option<Timestamp> {
        self.current_time
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    /// `(start, end)` or `None` when no entity has samples.
    pub fn time_range(&self) -> Option<(Timestamp, Timestamp)> {
        self.start_time.zip(self.end_time)
    }

    fn recompute_bounds(&mut self) {
        let spans = self
            .entities
            .values()
            .filter_map(|e| e.trajectory().first_time().zip(e.trajectory().last_time()));

        let (mut start, mut end) = (None::<Timestamp>, None::<Timestamp>);
        for (first, last) in spans {
            start = Some(start.map_or(first, |s| s.min(first)));
            end = Some(end.map_or(last, |e| e.max(last)));
        }
        self.start_time = start;
        self.end_time = end;
    }
}

//! Geometry cache
//!
//! Materializes the catalog's point snaps into point buffers the raycaster
//! can consume and maps buffer hits back to their source snaps. Buffers are
//! replaced wholesale on every `update()`; handles from an older generation
//! are rejected.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec2;
use snap_core::{
    BufferHandle, Generation, PointSnap, PointVertex, Result, SceneObject, SnapError,
};

use crate::catalog::{SnapCatalog, SubscriptionId};

/// Picking buffers built from the current catalog snapshot
pub struct GeometryCache {
    catalog: Rc<dyn SnapCatalog>,
    generation: Generation,
    /// Source snaps, one group per point buffer
    groups: Vec<Vec<PointSnap>>,
    buffers: Vec<Arc<[PointVertex]>>,
    points: Vec<SceneObject>,
    /// Point buffers followed by basic and cross snappers
    snappers: Vec<SceneObject>,
    resolution: Cell<Vec2>,
    stale: Rc<Cell<bool>>,
    subscription: Option<SubscriptionId>,
}

impl GeometryCache {
    /// Subscribe to `catalog` and build the first generation
    pub fn new(catalog: Rc<dyn SnapCatalog>) -> Self {
        let stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&stale);
        let subscription = catalog.subscribe(Box::new(move || flag.set(true)));

        let mut cache = Self {
            catalog,
            generation: Generation::default(),
            groups: Vec::new(),
            buffers: Vec::new(),
            points: Vec::new(),
            snappers: Vec::new(),
            resolution: Cell::new(Vec2::ONE),
            stale,
            subscription: Some(subscription),
        };
        cache.update();
        cache
    }

    /// Rebuild every buffer from the latest catalog snapshot
    pub fn update(&mut self) {
        let snapshot = self.catalog.snapshot();
        self.generation = self.generation.next();

        self.groups = snapshot.geometry;
        self.buffers = self
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|snap| PointVertex::new(snap.position))
                    .collect::<Arc<[PointVertex]>>()
            })
            .collect();

        self.points = self
            .buffers
            .iter()
            .enumerate()
            .map(|(i, buffer)| {
                let handle = BufferHandle::new(i as u32, self.generation);
                SceneObject::point_buffer(handle, Arc::clone(buffer))
            })
            .collect();

        let mut snappers = self.points.clone();
        snappers.extend(snapshot.basic.iter().map(SceneObject::snapper));
        snappers.extend(snapshot.cross.iter().map(SceneObject::snapper));
        self.snappers = snappers;

        self.stale.set(false);
        log::debug!(
            "geometry cache rebuilt: generation {}, {} point buffers, {} snappers",
            self.generation,
            self.points.len(),
            self.snappers.len()
        );
    }

    /// Whether the catalog changed since the last `update()`
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// Rebuild if the catalog changed; returns whether a rebuild happened
    pub fn update_if_stale(&mut self) -> bool {
        if self.is_stale() {
            self.update();
            true
        } else {
            false
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    fn group_index(&self, handle: BufferHandle) -> Result<usize> {
        if handle.generation() != self.generation {
            return Err(SnapError::StaleHandle {
                handle,
                current: self.generation,
            });
        }
        let index = handle.index() as usize;
        if index >= self.groups.len() {
            return Err(SnapError::UnknownHandle(handle));
        }
        Ok(index)
    }

    /// Snap stored at `index` of the buffer identified by `handle`
    pub fn get(&self, handle: BufferHandle, index: usize) -> Result<&PointSnap> {
        let group = &self.groups[self.group_index(handle)?];
        group.get(index).ok_or(SnapError::IndexOutOfRange {
            index,
            len: group.len(),
        })
    }

    /// Raw point buffer behind `handle`
    pub fn point_buffer(&self, handle: BufferHandle) -> Result<&[PointVertex]> {
        Ok(&self.buffers[self.group_index(handle)?])
    }

    /// Point buffers only; empty while the catalog is disabled
    pub fn points(&self) -> &[SceneObject] {
        if !self.enabled() {
            return &[];
        }
        &self.points
    }

    /// Point buffers plus basic and cross snappers; empty while disabled
    pub fn snappers(&self) -> &[SceneObject] {
        if !self.enabled() {
            return &[];
        }
        &self.snappers
    }

    /// Viewport size in pixels
    pub fn resolution(&self) -> Vec2 {
        self.resolution.get()
    }

    pub fn set_resolution(&self, resolution: Vec2) {
        self.resolution.set(resolution);
    }

    pub fn enabled(&self) -> bool {
        self.catalog.enabled()
    }

    /// Release the catalog subscription
    pub fn dispose(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.catalog.unsubscribe(id);
        }
    }
}

impl Drop for GeometryCache {
    fn drop(&mut self) {
        self.dispose();
    }
}

//! Persistent-model database
//!
//! `GeometryDatabase` is the lookup surface the picker consumes.
//! `ModelDatabase` is an in-memory implementation that also produces the
//! visible scene objects for each registered item.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ids::{ItemId, TopologyId};
use crate::mesh::Mesh;
use crate::model::{CurveModel, EdgeModel, FaceModel, InstanceModel, Polyline, TopologyModel};
use crate::scene::{Intersectable, SceneObject, Shape};
use crate::storage::ModelStorage;

/// Lookups needed to classify hits
pub trait GeometryDatabase {
    /// Model of a face or edge
    fn lookup_topology_item(&self, id: TopologyId) -> Option<TopologyModel>;

    /// Instance-level model of an item
    fn lookup(&self, item: ItemId) -> Option<&InstanceModel>;

    /// Every raycastable object currently shown in the scene
    fn visible_objects(&self) -> Vec<&SceneObject>;
}

/// ストレージ内の1アイテム
struct Entry {
    model: InstanceModel,
    objects: Vec<SceneObject>,
    hidden: bool,
}

/// In-memory model database
#[derive(Default)]
pub struct ModelDatabase {
    items: ModelStorage<Entry>,
    topology: HashMap<TopologyId, TopologyModel>,
    next_index: u32,
}

impl ModelDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ItemId {
        let item = ItemId::new(self.next_index);
        self.next_index += 1;
        item
    }

    /// Register a free-standing curve
    pub fn add_curve(&mut self, polyline: Polyline) -> ItemId {
        let item = self.allocate();
        let polyline = Arc::new(polyline);
        let curve = Arc::new(CurveModel {
            polyline: Arc::clone(&polyline),
        });
        let object = SceneObject::new(Intersectable::CurveSegment(item), Shape::Polyline(polyline));

        self.items.insert(
            item,
            Entry {
                model: InstanceModel::Curve(curve),
                objects: vec![object],
                hidden: false,
            },
        );
        log::debug!("registered curve {}", item);
        item
    }

    /// Register a solid from its face tessellations and edge polylines
    pub fn add_solid(&mut self, faces: Vec<Mesh>, edges: Vec<Polyline>) -> ItemId {
        let item = self.allocate();
        let mut objects = Vec::with_capacity(faces.len() + edges.len());
        let mut face_ids = Vec::with_capacity(faces.len());
        let mut edge_ids = Vec::with_capacity(edges.len());

        for (i, mesh) in faces.into_iter().enumerate() {
            let id = TopologyId::face(item, i as u32);
            let mesh = Arc::new(mesh);
            self.topology.insert(
                id,
                TopologyModel::Face(Arc::new(FaceModel {
                    mesh: Arc::clone(&mesh),
                })),
            );
            objects.push(SceneObject::new(Intersectable::Face(id), Shape::Mesh(mesh)));
            face_ids.push(id);
        }

        for (i, polyline) in edges.into_iter().enumerate() {
            let id = TopologyId::edge(item, i as u32);
            let polyline = Arc::new(polyline);
            self.topology.insert(
                id,
                TopologyModel::Edge(Arc::new(EdgeModel {
                    polyline: Arc::clone(&polyline),
                })),
            );
            objects.push(SceneObject::new(Intersectable::CurveEdge(id), Shape::Polyline(polyline)));
            edge_ids.push(id);
        }

        log::debug!(
            "registered solid {} ({} faces, {} edges)",
            item,
            face_ids.len(),
            edge_ids.len()
        );
        self.items.insert(
            item,
            Entry {
                model: InstanceModel::Solid {
                    faces: face_ids,
                    edges: edge_ids,
                },
                objects,
                hidden: false,
            },
        );
        item
    }

    /// Register a planar region
    pub fn add_region(&mut self, mesh: Mesh) -> ItemId {
        let item = self.allocate();
        let mesh = Arc::new(mesh);
        let object = SceneObject::new(Intersectable::Region(item), Shape::Mesh(Arc::clone(&mesh)));
        self.items.insert(
            item,
            Entry {
                model: InstanceModel::Region(mesh),
                objects: vec![object],
                hidden: false,
            },
        );
        item
    }

    /// Remove an item together with its topology
    pub fn remove(&mut self, item: ItemId) -> bool {
        let Some(entry) = self.items.remove(item) else {
            return false;
        };
        if let InstanceModel::Solid { faces, edges } = &entry.model {
            for id in faces.iter().chain(edges) {
                self.topology.remove(id);
            }
        }
        log::debug!("removed {}", item);
        true
    }

    /// Exclude an item from `visible_objects` (lookups still succeed)
    pub fn hide(&mut self, item: ItemId) -> bool {
        self.set_hidden(item, true)
    }

    pub fn unhide(&mut self, item: ItemId) -> bool {
        self.set_hidden(item, false)
    }

    fn set_hidden(&mut self, item: ItemId, hidden: bool) -> bool {
        match self.items.get_mut(item) {
            Some(entry) => {
                entry.hidden = hidden;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl GeometryDatabase for ModelDatabase {
    fn lookup_topology_item(&self, id: TopologyId) -> Option<TopologyModel> {
        self.topology.get(&id).cloned()
    }

    fn lookup(&self, item: ItemId) -> Option<&InstanceModel> {
        self.items.get(item).map(|entry| &entry.model)
    }

    fn visible_objects(&self) -> Vec<&SceneObject> {
        self.items
            .iter()
            .filter(|(_, entry)| !entry.hidden)
            .flat_map(|(_, entry)| entry.objects.iter())
            .collect()
    }
}

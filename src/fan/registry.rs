use std::collections::BTreeMap;

use crate::geometry::{self, GeometryError};
use crate::mesh::MeshData;

use super::node::PartName;
use super::presets::FanDimensions;

/// The generated mesh for every part a fan configuration draws.
///
/// Built once from [`FanDimensions`] and never mutated afterwards. Parts the
/// configuration leaves out (a classic fan has no hub) have no entry.
#[derive(Clone, Debug, Default)]
pub struct MeshRegistry {
    meshes: BTreeMap<PartName, MeshData>,
}

impl MeshRegistry {
    /// Generates every part mesh. Fails on the first generator error.
    pub fn build(dims: &FanDimensions) -> Result<Self, GeometryError> {
        let mut meshes = BTreeMap::new();

        let base = &dims.base;
        meshes.insert(
            PartName::Base,
            geometry::disk(base.radius, base.segments, 0.0, base.color, base.depth)?,
        );
        if let Some(accent) = &dims.base_accent {
            meshes.insert(
                PartName::BaseAccent,
                geometry::cylinder(accent.radius, accent.height, accent.segments, accent.color)?,
            );
        }

        let stand = &dims.stand;
        meshes.insert(
            PartName::Stand,
            geometry::cylinder(stand.radius, stand.height, stand.segments, stand.color)?,
        );
        if let Some(panel) = &dims.control_panel {
            let body = &panel.body;
            meshes.insert(
                PartName::ControlPanel,
                geometry::cylinder(body.radius, body.height, body.segments, body.color)?,
            );
        }

        let motor = &dims.motor;
        meshes.insert(
            PartName::Motor,
            geometry::cylinder(motor.radius, motor.height, motor.segments, motor.color)?,
        );
        if let Some(hub) = &dims.hub {
            meshes.insert(
                PartName::Hub,
                geometry::cylinder(hub.radius, hub.height, hub.segments, hub.color)?,
            );
        }

        let guard = &dims.guard;
        meshes.insert(
            PartName::Guard,
            geometry::guard_cage(guard.radius, guard.depth, guard.segments)?,
        );

        let blade = &dims.blade;
        meshes.insert(
            PartName::Blade,
            geometry::blade(blade.length, blade.width, blade.color)?,
        );

        Ok(Self { meshes })
    }

    pub fn get(&self, part: PartName) -> Option<&MeshData> {
        self.meshes.get(&part)
    }

    pub fn contains(&self, part: PartName) -> bool {
        self.meshes.contains_key(&part)
    }

    /// Entries in [`PartName`] order.
    pub fn iter(&self) -> impl Iterator<Item = (PartName, &MeshData)> {
        self.meshes.iter().map(|(&part, mesh)| (part, mesh))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Triangles across all entries, each mesh counted once.
    pub fn triangle_count(&self) -> usize {
        self.meshes.values().map(MeshData::triangle_count).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.values().map(MeshData::vertex_count).sum()
    }
}

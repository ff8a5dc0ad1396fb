//! The articulated fan: part tree, presets, mesh registry and traversal.
//!
//! A [`FanModel`] bundles everything that is built once per configuration:
//!
//! ```text
//! FanPreset ──▶ FanDimensions ──┬──▶ MeshRegistry  (one mesh per PartName)
//!                               └──▶ FanNode tree  (pivots derived from dimensions)
//! ```
//!
//! Each frame the app walks the tree with [`traverse`], which hands
//! `(part, world transform)` pairs to a [`SceneVisitor`].
//!
//! # Example
//!
//! ```
//! use fanrig::fan::{FanModel, FanPreset, DrawSubmission, traverse};
//! use fanrig::{AnimationState, Mat4};
//!
//! let model = FanModel::build(FanPreset::Classic).unwrap();
//! let mut draws: Vec<DrawSubmission> = Vec::new();
//! traverse(&model.root, &AnimationState::default(), Mat4::IDENTITY, &mut draws).unwrap();
//! assert_eq!(draws.len(), 7);
//! ```

mod node;
mod presets;
mod registry;
mod traversal;

pub use node::{DynamicRotation, Drawable, FanNode, LocalOp, MotionSource, NodeKind, PartName};
pub use presets::{
    BladeDims, CylinderDims, DiskDims, FanDimensions, FanPreset, GuardDims, PanelDims,
};
pub use registry::MeshRegistry;
pub use traversal::{DrawSubmission, SceneVisitor, TraversalStats, traverse, traverse_with};

use crate::geometry::GeometryError;

/// A fan configuration with its meshes generated and its tree built.
#[derive(Clone, Debug)]
pub struct FanModel {
    pub preset: FanPreset,
    pub dimensions: FanDimensions,
    pub registry: MeshRegistry,
    pub root: FanNode,
}

impl FanModel {
    pub fn build(preset: FanPreset) -> Result<Self, GeometryError> {
        let dimensions = preset.dimensions();
        let registry = MeshRegistry::build(&dimensions)?;
        let root = dimensions.build_tree();

        log::info!(
            "built {} fan: {} nodes, {} part meshes, {} draws/frame, {} triangles",
            preset.name(),
            root.node_count(),
            registry.len(),
            root.parts().len(),
            registry.triangle_count(),
        );

        Ok(Self {
            preset,
            dimensions,
            registry,
            root,
        })
    }

    /// Triangles submitted per frame, counting repeated parts each time.
    pub fn triangles_per_frame(&self) -> usize {
        self.root
            .parts()
            .into_iter()
            .filter_map(|part| self.registry.get(part))
            .map(|mesh| mesh.triangle_count())
            .sum()
    }
}

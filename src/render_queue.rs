//! GPU-side mesh storage and the per-frame draw queue.

use std::collections::HashMap;

use glam::Mat4;

use crate::fan::{MeshRegistry, PartName, SceneVisitor};
use crate::gpu::GpuContext;
use crate::mesh::Mesh;
use crate::mesh_pass::DrawCall;

/// A queued mesh draw: which part, and its model-view transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueuedMesh {
    pub part: PartName,
    pub model_view: Mat4,
}

/// Uploaded meshes keyed by part, plus the draws collected this frame.
///
/// Every registry entry is uploaded once in [`RenderQueue::new`]; drawing the same
/// part several times (the blades) reuses its buffers. The traversal fills the queue
/// through [`SceneVisitor`], [`MeshPass`](crate::MeshPass) consumes it via
/// [`draw_calls`](Self::draw_calls), and the app clears it before each traversal.
pub struct RenderQueue {
    meshes: HashMap<PartName, Mesh>,
    draw_queue: Vec<QueuedMesh>,
}

impl RenderQueue {
    pub fn new(gpu: &GpuContext, registry: &MeshRegistry) -> Self {
        let meshes = registry
            .iter()
            .map(|(part, data)| (part, Mesh::upload(gpu, part.label(), data)))
            .collect();
        Self {
            meshes,
            draw_queue: Vec::new(),
        }
    }

    /// Resolves queued draws against the uploaded meshes.
    ///
    /// Draws for parts without an uploaded mesh are dropped with a warning.
    pub fn draw_calls(&self) -> Vec<DrawCall<'_>> {
        self.draw_queue
            .iter()
            .filter_map(|queued| match self.meshes.get(&queued.part) {
                Some(mesh) => Some(DrawCall {
                    mesh,
                    model_view: queued.model_view,
                }),
                None => {
                    log::warn!("no uploaded mesh for {}, skipping draw", queued.part);
                    None
                }
            })
            .collect()
    }

    /// Clears the draw queue for the next frame. Uploaded meshes are kept.
    pub fn clear_queue(&mut self) {
        self.draw_queue.clear();
    }
}

impl SceneVisitor for RenderQueue {
    fn draw(&mut self, part: PartName, world: Mat4) {
        self.draw_queue.push(QueuedMesh {
            part,
            model_view: world,
        });
    }
}

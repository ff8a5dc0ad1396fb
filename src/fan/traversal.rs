//! Depth-first walk of a [`FanNode`] tree that composes world transforms on a
//! [`TransformStack`].
//!
//! For each node the walk pushes, applies the static ops, applies the dynamic rotation
//! if its motion is active, draws (with the draw-only placement pushed and popped
//! around it), visits the children in order and pops. A rotation applied at a node is
//! therefore baked into every descendant's transform exactly once, and siblings never
//! see each other's ops.

use glam::Mat4;

use crate::animation::AnimationState;
use crate::transform_stack::{StackError, TransformStack};

use super::node::{FanNode, NodeKind, PartName};

/// Receives the walk's output.
pub trait SceneVisitor {
    /// Called after a node's own transform is applied, before its draw and children.
    fn enter(&mut self, _node: &FanNode, _world: Mat4) {}

    /// Called once per drawable node with the mesh to draw and its final transform.
    fn draw(&mut self, part: PartName, world: Mat4);
}

/// One recorded draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawSubmission {
    pub part: PartName,
    pub world: Mat4,
}

impl SceneVisitor for Vec<DrawSubmission> {
    fn draw(&mut self, part: PartName, world: Mat4) {
        self.push(DrawSubmission { part, world });
    }
}

/// Counts what a traversal visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub nodes: usize,
    pub draws: usize,
}

impl SceneVisitor for TraversalStats {
    fn enter(&mut self, _node: &FanNode, _world: Mat4) {
        self.nodes += 1;
    }

    fn draw(&mut self, _part: PartName, _world: Mat4) {
        self.draws += 1;
    }
}

/// Walks `root` with the stack seeded to `seed` (camera view times the world root).
pub fn traverse<V: SceneVisitor + ?Sized>(
    root: &FanNode,
    state: &AnimationState,
    seed: Mat4,
    visitor: &mut V,
) -> Result<(), StackError> {
    let mut stack = TransformStack::new(seed);
    traverse_with(&mut stack, root, state, seed, visitor)
}

/// Like [`traverse`], reusing `stack`'s allocation across frames.
pub fn traverse_with<V: SceneVisitor + ?Sized>(
    stack: &mut TransformStack,
    root: &FanNode,
    state: &AnimationState,
    seed: Mat4,
    visitor: &mut V,
) -> Result<(), StackError> {
    stack.reset(seed);
    visit(stack, root, state, visitor)?;
    if stack.depth() != 1 {
        return Err(StackError::Unbalanced {
            expected: 1,
            found: stack.depth(),
        });
    }
    Ok(())
}

fn visit<V: SceneVisitor + ?Sized>(
    stack: &mut TransformStack,
    node: &FanNode,
    state: &AnimationState,
    visitor: &mut V,
) -> Result<(), StackError> {
    let depth = stack.depth();
    stack.push();

    for op in &node.local {
        op.apply(stack);
    }
    if let Some(dynamic) = node.dynamic
        && let Some(degrees) = dynamic.source.angle(state)
    {
        stack.rotate(dynamic.axis, degrees.to_radians());
    }
    visitor.enter(node, stack.current());

    if let NodeKind::Mesh(drawable) = &node.kind {
        stack.push();
        for op in &drawable.placement {
            op.apply(stack);
        }
        visitor.draw(drawable.mesh, stack.current());
        stack.pop()?;
    }

    for child in &node.children {
        visit(stack, child, state, visitor)?;
    }

    stack.pop()?;
    if stack.depth() != depth {
        return Err(StackError::Unbalanced {
            expected: depth,
            found: stack.depth(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fan::node::{LocalOp, MotionSource};
    use crate::fan::{FanDimensions, FanPreset};
    use glam::Vec3;

    fn state(oscillation_deg: f32, blade_deg: f32) -> AnimationState {
        AnimationState {
            oscillation_deg,
            blade_deg,
            oscillation_active: true,
            blade_active: true,
        }
    }

    fn record(root: &FanNode, state: &AnimationState, seed: Mat4) -> Vec<DrawSubmission> {
        let mut out = Vec::new();
        traverse(root, state, seed, &mut out).unwrap();
        out
    }

    fn world_of(draws: &[DrawSubmission], part: PartName) -> Mat4 {
        draws.iter().find(|d| d.part == part).unwrap().world
    }

    #[test]
    fn oscillation_appears_once_in_grandchild_chain() {
        let root_offset = Vec3::new(0.0, 0.5, 0.0);
        let child_offset = Vec3::new(0.0, 2.0, 0.0);
        let grandchild_offset = Vec3::new(0.0, 0.1, 0.3);

        let tree = FanNode::mesh("root", PartName::Base)
            .translated(root_offset)
            .with_child(
                FanNode::mesh("child", PartName::Motor)
                    .translated(child_offset)
                    .with_dynamic(MotionSource::Oscillation, Vec3::Y)
                    .with_child(
                        FanNode::mesh("grandchild", PartName::Guard)
                            .translated(grandchild_offset),
                    ),
            );

        let root_transform = Mat4::from_translation(Vec3::new(1.0, -2.0, -8.0));
        let draws = record(&tree, &state(30.0, 0.0), root_transform);

        let expected = root_transform
            * Mat4::from_translation(root_offset)
            * Mat4::from_translation(child_offset)
            * Mat4::from_rotation_y(30f32.to_radians())
            * Mat4::from_translation(grandchild_offset);
        assert!(world_of(&draws, PartName::Guard).abs_diff_eq(expected, 1e-5));

        let doubled = expected * Mat4::from_rotation_y(30f32.to_radians());
        assert!(!world_of(&draws, PartName::Guard).abs_diff_eq(doubled, 1e-3));
    }

    #[test]
    fn blade_world_matches_explicit_chain() {
        let dims = FanDimensions::deluxe();
        let tree = dims.build_tree();
        let seed = Mat4::look_at_rh(Vec3::new(5.0, 2.0, 5.0), Vec3::Y, Vec3::Y);
        let draws = record(&tree, &state(-20.0, 75.0), seed);

        let blades: Vec<_> = draws.iter().filter(|d| d.part == PartName::Blade).collect();
        assert_eq!(blades.len(), 3);

        for (i, blade) in blades.iter().enumerate() {
            let expected = seed
                * Mat4::from_translation(dims.stand_mount())
                * Mat4::from_translation(dims.motor_mount())
                * Mat4::from_rotation_y((-20f32).to_radians())
                * Mat4::from_translation(dims.rotor_mount())
                * Mat4::from_rotation_z(75f32.to_radians())
                * Mat4::from_rotation_z((i as f32 * 120.0).to_radians())
                * Mat4::from_translation(Vec3::new(dims.blade.hub_gap, 0.0, 0.0));
            assert!(blade.world.abs_diff_eq(expected, 1e-5), "blade {i}");
        }
    }

    #[test]
    fn guard_follows_oscillation_but_not_blade_spin() {
        let tree = FanDimensions::classic().build_tree();
        let a = record(&tree, &state(10.0, 0.0), Mat4::IDENTITY);
        let b = record(&tree, &state(10.0, 200.0), Mat4::IDENTITY);
        let c = record(&tree, &state(25.0, 0.0), Mat4::IDENTITY);

        assert_eq!(world_of(&a, PartName::Guard), world_of(&b, PartName::Guard));
        assert_ne!(world_of(&a, PartName::Guard), world_of(&c, PartName::Guard));
        assert_ne!(world_of(&a, PartName::Blade), world_of(&b, PartName::Blade));
        assert_eq!(world_of(&a, PartName::Stand), world_of(&c, PartName::Stand));
    }

    #[test]
    fn disabled_motion_is_skipped_not_zeroed_in_place() {
        let tree = FanDimensions::deluxe().build_tree();
        let mut frozen = state(30.0, 120.0);
        frozen.oscillation_active = false;
        frozen.blade_active = false;

        let skipped = record(&tree, &frozen, Mat4::IDENTITY);
        let zero = record(&tree, &state(0.0, 0.0), Mat4::IDENTITY);
        assert_eq!(skipped, zero);
    }

    #[test]
    fn placement_does_not_leak_into_children() {
        let dims = FanDimensions::deluxe();
        let tree = dims.build_tree();
        let draws = record(&tree, &state(0.0, 0.0), Mat4::IDENTITY);

        let guard = world_of(&draws, PartName::Guard);
        let motor_frame = Mat4::from_translation(dims.stand_mount() + dims.motor_mount());
        let expected = motor_frame * Mat4::from_translation(dims.guard_mount());
        assert!(guard.abs_diff_eq(expected, 1e-6));

        // The housing itself is tipped onto its side: its +Y axis points along +Z.
        let motor = world_of(&draws, PartName::Motor);
        let axis = motor.transform_vector3(Vec3::Y);
        assert!(axis.abs_diff_eq(Vec3::Z, 1e-6));
        let front = motor.transform_point3(Vec3::new(0.0, dims.motor.height, 0.0));
        let front_z = front.z - motor_frame.w_axis.z;
        assert!((front_z - dims.motor_front_z()).abs() < 1e-6);
    }

    #[test]
    fn hub_sits_centered_on_blade_plane() {
        let dims = FanDimensions::deluxe();
        let tree = dims.build_tree();
        let draws = record(&tree, &state(0.0, 0.0), Mat4::IDENTITY);
        let hub = world_of(&draws, PartName::Hub);
        let hub_height = dims.hub.unwrap().height;

        let bottom = hub.transform_point3(Vec3::ZERO);
        let top = hub.transform_point3(Vec3::new(0.0, hub_height, 0.0));
        let plane = dims.stand_mount().z + dims.motor_mount().z + dims.blade_plane_z();
        assert!(((bottom.z + top.z) * 0.5 - plane).abs() < 1e-6);
    }

    #[test]
    fn every_preset_is_balanced_and_deterministic() {
        for preset in [FanPreset::Classic, FanPreset::Deluxe] {
            let tree = preset.dimensions().build_tree();
            let anim = state(17.0, 301.0);
            let seed = Mat4::from_translation(Vec3::new(0.0, -1.0, -8.0));

            let mut stack = TransformStack::new(Mat4::IDENTITY);
            let mut first = Vec::new();
            traverse_with(&mut stack, &tree, &anim, seed, &mut first).unwrap();
            assert_eq!(stack.depth(), 1);
            assert_eq!(stack.current(), seed);

            let second = record(&tree, &anim, seed);
            assert_eq!(first, second, "{}", preset.name());
        }
    }

    #[test]
    fn stats_count_nodes_and_draws() {
        let tree = FanDimensions::deluxe().build_tree();
        let mut stats = TraversalStats::default();
        traverse(&tree, &AnimationState::default(), Mat4::IDENTITY, &mut stats).unwrap();
        assert_eq!(stats.nodes, tree.node_count());
        assert_eq!(stats.draws, tree.parts().len());
        assert_eq!(stats.draws, 10);
    }

    #[test]
    fn local_ops_apply_in_declaration_order() {
        let tree = FanNode::mesh("arm", PartName::Blade)
            .with_local(LocalOp::Translate(Vec3::X))
            .with_local(LocalOp::rotate_z(90.0))
            .with_local(LocalOp::Scale(Vec3::splat(2.0)));
        let draws = record(&tree, &AnimationState::default(), Mat4::IDENTITY);

        let p = draws[0].world.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));
    }
}

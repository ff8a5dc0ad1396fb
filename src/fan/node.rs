//! Immutable node types describing the fan's part hierarchy.

use std::fmt;

use glam::Vec3;

use crate::animation::AnimationState;
use crate::transform_stack::TransformStack;

/// Registry key for every part mesh the fan can draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartName {
    Base,
    BaseAccent,
    Stand,
    ControlPanel,
    Motor,
    Guard,
    Blade,
    Hub,
}

impl PartName {
    pub const ALL: [PartName; 8] = [
        PartName::Base,
        PartName::BaseAccent,
        PartName::Stand,
        PartName::ControlPanel,
        PartName::Motor,
        PartName::Guard,
        PartName::Blade,
        PartName::Hub,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PartName::Base => "base",
            PartName::BaseAccent => "base accent",
            PartName::Stand => "stand",
            PartName::ControlPanel => "control panel",
            PartName::Motor => "motor",
            PartName::Guard => "guard",
            PartName::Blade => "blade",
            PartName::Hub => "hub",
        }
    }
}

impl fmt::Display for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A static local transform step, applied to the stack in declaration order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocalOp {
    Translate(Vec3),
    Rotate { axis: Vec3, degrees: f32 },
    Scale(Vec3),
}

impl LocalOp {
    pub fn rotate_x(degrees: f32) -> Self {
        LocalOp::Rotate {
            axis: Vec3::X,
            degrees,
        }
    }

    pub fn rotate_z(degrees: f32) -> Self {
        LocalOp::Rotate {
            axis: Vec3::Z,
            degrees,
        }
    }

    /// Post-multiplies this step onto the stack's top.
    pub fn apply(&self, stack: &mut TransformStack) {
        match *self {
            LocalOp::Translate(offset) => stack.translate(offset),
            LocalOp::Rotate { axis, degrees } => stack.rotate(axis, degrees.to_radians()),
            LocalOp::Scale(factors) => stack.scale(factors),
        }
    }
}

/// Which animation phase drives a node's dynamic rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionSource {
    Oscillation,
    BladeSpin,
}

impl MotionSource {
    /// The current angle in degrees, or `None` while the motion is disabled.
    pub fn angle(self, state: &AnimationState) -> Option<f32> {
        match self {
            MotionSource::Oscillation => state.oscillation_active.then_some(state.oscillation_deg),
            MotionSource::BladeSpin => state.blade_active.then_some(state.blade_deg),
        }
    }
}

/// A rotation read from the animation state each frame, applied after the static ops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicRotation {
    pub source: MotionSource,
    pub axis: Vec3,
}

/// A mesh draw attached to a node.
///
/// `placement` positions the mesh within the node's frame. It is applied only for the
/// draw; children see the node's frame without it.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub mesh: PartName,
    pub placement: Vec<LocalOp>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A pure transform node that draws nothing.
    Group,
    Mesh(Drawable),
}

/// One rigid part (or pivot) of the fan.
#[derive(Clone, Debug, PartialEq)]
pub struct FanNode {
    pub name: String,
    pub kind: NodeKind,
    pub local: Vec<LocalOp>,
    pub dynamic: Option<DynamicRotation>,
    /// Children in paint order.
    pub children: Vec<FanNode>,
}

impl FanNode {
    /// A node that draws nothing.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            local: Vec::new(),
            dynamic: None,
            children: Vec::new(),
        }
    }

    /// A node that draws `mesh` at its own frame.
    pub fn mesh(name: impl Into<String>, mesh: PartName) -> Self {
        Self {
            kind: NodeKind::Mesh(Drawable {
                mesh,
                placement: Vec::new(),
            }),
            ..Self::group(name)
        }
    }

    pub fn with_local(mut self, op: LocalOp) -> Self {
        self.local.push(op);
        self
    }

    pub fn translated(self, offset: Vec3) -> Self {
        self.with_local(LocalOp::Translate(offset))
    }

    /// Adds a draw-only placement step. Ignored on group nodes.
    pub fn with_placement(mut self, op: LocalOp) -> Self {
        if let NodeKind::Mesh(drawable) = &mut self.kind {
            drawable.placement.push(op);
        }
        self
    }

    pub fn with_dynamic(mut self, source: MotionSource, axis: Vec3) -> Self {
        self.dynamic = Some(DynamicRotation { source, axis });
        self
    }

    pub fn with_child(mut self, child: FanNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = FanNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// The mesh this node draws, if any.
    pub fn part(&self) -> Option<PartName> {
        match &self.kind {
            NodeKind::Group => None,
            NodeKind::Mesh(drawable) => Some(drawable.mesh),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(FanNode::node_count).sum::<usize>()
    }

    /// Every mesh drawn by this subtree, in paint order.
    pub fn parts(&self) -> Vec<PartName> {
        let mut parts = Vec::new();
        self.collect_parts(&mut parts);
        parts
    }

    fn collect_parts(&self, out: &mut Vec<PartName>) {
        out.extend(self.part());
        for child in &self.children {
            child.collect_parts(out);
        }
    }

    /// Finds the first node named `name` in a depth-first walk.
    pub fn find(&self, name: &str) -> Option<&FanNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_motion_reports_no_angle() {
        let mut state = AnimationState {
            oscillation_deg: 12.0,
            blade_deg: 90.0,
            ..Default::default()
        };
        assert_eq!(MotionSource::Oscillation.angle(&state), Some(12.0));
        state.oscillation_active = false;
        assert_eq!(MotionSource::Oscillation.angle(&state), None);
        assert_eq!(MotionSource::BladeSpin.angle(&state), Some(90.0));
    }

    #[test]
    fn placement_is_ignored_on_groups() {
        let node = FanNode::group("pivot").with_placement(LocalOp::rotate_x(90.0));
        assert_eq!(node.kind, NodeKind::Group);
    }

    #[test]
    fn parts_walk_in_paint_order() {
        let tree = FanNode::mesh("base", PartName::Base).with_children([
            FanNode::mesh("stand", PartName::Stand).with_child(
                FanNode::group("pivot").with_child(FanNode::mesh("hub", PartName::Hub)),
            ),
            FanNode::mesh("guard", PartName::Guard),
        ]);

        assert_eq!(
            tree.parts(),
            vec![PartName::Base, PartName::Stand, PartName::Hub, PartName::Guard]
        );
        assert_eq!(tree.node_count(), 5);
        assert!(tree.find("pivot").is_some_and(|n| n.part().is_none()));
        assert!(tree.find("missing").is_none());
    }
}

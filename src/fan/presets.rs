//! Fan configurations: part dimensions plus the tree built from them.
//!
//! Every pivot offset in the tree comes from a named helper on [`FanDimensions`], so
//! changing a part's size moves everything mounted on it.
//!
//! # Frames
//!
//! - The base sits on the floor with its axis along +Y.
//! - The stand rises from the top of the base.
//! - The motor frame's origin is the top of the stand. +Z is the direction the fan
//!   blows, and oscillation turns this frame about +Y.
//! - The rotor frame is centered on the motor axis at the blade plane. Blade spin
//!   turns it about +Z.

use glam::Vec3;
use serde::Deserialize;

use super::node::{FanNode, LocalOp, MotionSource, PartName};

pub const LIGHT_BLUE: [f32; 3] = [0.8, 0.9, 1.0];
pub const BLACK: [f32; 3] = [0.15, 0.15, 0.15];
pub const SILVER: [f32; 3] = [0.85, 0.85, 0.9];
pub const WHITE: [f32; 3] = [0.95, 0.95, 0.95];

/// The two fan models this crate knows how to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FanPreset {
    /// Base, stand, motor, guard and three blades with a gap at the hub.
    Classic,
    /// Adds a base accent, a control panel and a hub cap.
    #[default]
    Deluxe,
}

impl FanPreset {
    pub fn name(self) -> &'static str {
        match self {
            FanPreset::Classic => "classic",
            FanPreset::Deluxe => "deluxe",
        }
    }

    pub fn dimensions(self) -> FanDimensions {
        match self {
            FanPreset::Classic => FanDimensions::classic(),
            FanPreset::Deluxe => FanDimensions::deluxe(),
        }
    }
}

/// A flat puck: [`geometry::disk`](crate::geometry::disk) parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiskDims {
    pub radius: f32,
    pub depth: f32,
    pub segments: u32,
    pub color: [f32; 3],
}

/// [`geometry::cylinder`](crate::geometry::cylinder) parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderDims {
    pub radius: f32,
    pub height: f32,
    pub segments: u32,
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuardDims {
    pub radius: f32,
    pub depth: f32,
    pub segments: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BladeDims {
    pub length: f32,
    pub width: f32,
    pub count: u32,
    /// Radial distance from the rotor axis to each blade's pivot corner.
    pub hub_gap: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelDims {
    pub body: CylinderDims,
    /// Height of the panel's bottom above the foot of the stand.
    pub mount_height: f32,
}

/// Every size the fan's meshes and pivots are derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanDimensions {
    pub base: DiskDims,
    pub base_accent: Option<CylinderDims>,
    pub stand: CylinderDims,
    pub control_panel: Option<PanelDims>,
    pub motor: CylinderDims,
    /// How far the motor housing extends behind the stand.
    pub motor_rear_overhang: f32,
    pub hub: Option<CylinderDims>,
    pub guard: GuardDims,
    pub blade: BladeDims,
    /// Gap between the motor's front face and the blade plane.
    pub blade_clearance: f32,
}

impl FanDimensions {
    pub fn classic() -> Self {
        Self {
            base: DiskDims {
                radius: 0.5,
                depth: 0.05,
                segments: 32,
                color: BLACK,
            },
            base_accent: None,
            stand: CylinderDims {
                radius: 0.05,
                height: 2.0,
                segments: 16,
                color: SILVER,
            },
            control_panel: None,
            motor: CylinderDims {
                radius: 0.15,
                height: 0.3,
                segments: 32,
                color: LIGHT_BLUE,
            },
            motor_rear_overhang: 0.15,
            hub: None,
            guard: GuardDims {
                radius: 0.55,
                depth: 0.15,
                segments: 48,
            },
            blade: BladeDims {
                length: 0.45,
                width: 0.15,
                count: 3,
                hub_gap: 0.05,
                color: WHITE,
            },
            blade_clearance: 0.03,
        }
    }

    pub fn deluxe() -> Self {
        Self {
            base: DiskDims {
                radius: 0.6,
                depth: 0.05,
                segments: 32,
                color: BLACK,
            },
            base_accent: Some(CylinderDims {
                radius: 0.07,
                height: 0.5,
                segments: 32,
                color: [0.1, 0.15, 0.1],
            }),
            stand: CylinderDims {
                radius: 0.04,
                height: 2.15,
                segments: 16,
                color: SILVER,
            },
            control_panel: Some(PanelDims {
                body: CylinderDims {
                    radius: 0.06,
                    height: 0.3,
                    segments: 16,
                    color: LIGHT_BLUE,
                },
                mount_height: 1.5,
            }),
            motor: CylinderDims {
                radius: 0.125,
                height: 0.4,
                segments: 32,
                color: LIGHT_BLUE,
            },
            motor_rear_overhang: 0.25,
            hub: Some(CylinderDims {
                radius: 0.1,
                height: 0.02,
                segments: 20,
                color: LIGHT_BLUE,
            }),
            guard: GuardDims {
                radius: 0.45,
                depth: 0.12,
                segments: 48,
            },
            blade: BladeDims {
                length: 0.4,
                width: 0.2,
                count: 3,
                hub_gap: 0.0,
                color: WHITE,
            },
            blade_clearance: 0.03,
        }
    }

    /// Stand offset from the base frame: the top face of the base.
    pub fn stand_mount(&self) -> Vec3 {
        Vec3::new(0.0, self.base.depth, 0.0)
    }

    /// Motor frame offset from the stand frame: the top of the stand.
    pub fn motor_mount(&self) -> Vec3 {
        Vec3::new(0.0, self.stand.height, 0.0)
    }

    /// Height of the motor axis above the top of the stand. The housing rests on it.
    pub fn motor_axis_height(&self) -> f32 {
        self.motor.radius
    }

    /// Z of the housing's front face in the motor frame.
    pub fn motor_front_z(&self) -> f32 {
        self.motor.height - self.motor_rear_overhang
    }

    /// Z of the blade plane in the motor frame.
    pub fn blade_plane_z(&self) -> f32 {
        self.motor_front_z() + self.blade_clearance
    }

    /// Rotor frame offset from the motor frame.
    pub fn rotor_mount(&self) -> Vec3 {
        Vec3::new(0.0, self.motor_axis_height(), self.blade_plane_z())
    }

    /// Guard offset from the motor frame. The cage is centered on the blade plane.
    pub fn guard_mount(&self) -> Vec3 {
        Vec3::new(
            0.0,
            self.motor_axis_height(),
            self.blade_plane_z() + self.guard.depth * 0.5,
        )
    }

    /// Farthest distance any blade point reaches from the rotor axis.
    pub fn blade_reach(&self) -> f32 {
        let tip = Vec3::new(self.blade.length, self.blade.width, 0.0);
        self.blade.hub_gap + tip.length()
    }

    /// Draw placement that lays the Y-axis motor cylinder along +Z.
    fn housing_placement(&self) -> [LocalOp; 2] {
        [
            LocalOp::Translate(Vec3::new(
                0.0,
                self.motor_axis_height(),
                -self.motor_rear_overhang,
            )),
            LocalOp::rotate_x(90.0),
        ]
    }

    /// Builds the node tree for these dimensions.
    pub fn build_tree(&self) -> FanNode {
        let blades = (0..self.blade.count).map(|i| {
            let spacing = 360.0 / self.blade.count as f32;
            FanNode::mesh(format!("blade {i}"), PartName::Blade)
                .with_local(LocalOp::rotate_z(i as f32 * spacing))
                .translated(Vec3::new(self.blade.hub_gap, 0.0, 0.0))
        });

        let rotor = FanNode::group("rotor")
            .with_dynamic(MotionSource::BladeSpin, Vec3::Z)
            .with_children(blades);

        let mut rotor_mount = FanNode::group("rotor mount").translated(self.rotor_mount());
        if let Some(hub) = self.hub {
            rotor_mount = rotor_mount.with_child(
                FanNode::mesh("hub", PartName::Hub)
                    .with_placement(LocalOp::rotate_x(90.0))
                    .with_placement(LocalOp::Translate(Vec3::new(0.0, -hub.height * 0.5, 0.0))),
            );
        }
        let rotor_mount = rotor_mount.with_child(rotor);

        let [lift, tip] = self.housing_placement();
        let motor = FanNode::mesh("motor", PartName::Motor)
            .translated(self.motor_mount())
            .with_dynamic(MotionSource::Oscillation, Vec3::Y)
            .with_placement(lift)
            .with_placement(tip)
            .with_child(FanNode::mesh("guard", PartName::Guard).translated(self.guard_mount()))
            .with_child(rotor_mount);

        let mut stand = FanNode::mesh("stand", PartName::Stand).translated(self.stand_mount());
        if let Some(panel) = self.control_panel {
            stand = stand.with_child(
                FanNode::mesh("control panel", PartName::ControlPanel)
                    .translated(Vec3::new(0.0, panel.mount_height, 0.0)),
            );
        }
        let stand = stand.with_child(motor);

        let mut base = FanNode::mesh("base", PartName::Base);
        if self.base_accent.is_some() {
            base = base.with_child(
                FanNode::mesh("base accent", PartName::BaseAccent).translated(self.stand_mount()),
            );
        }
        base.with_child(stand)
    }
}

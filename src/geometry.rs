//! Procedural mesh generators for the fan's parts.
//!
//! Every generator is a pure function: the same parameters always produce the same
//! [`MeshData`], and no state is shared between calls. Parameters are checked up front
//! so misuse (fewer than three segments, negative or NaN dimensions) fails with a
//! [`GeometryError`] instead of silently emitting degenerate geometry.
//!
//! | Generator | Shape | Local frame |
//! |-----------|-------|-------------|
//! | [`disk`] | flat puck with a side wall | axis +Y, bottom at `y`, top at `y + depth` |
//! | [`cylinder`] | side wall plus two flat caps | axis +Y, spans `0..=height` |
//! | [`guard_cage`] | wire rings, bars and spokes | faces +Z, front ring at `z = 0` |
//! | [`blade`] | double-sided trapezoid | lies in XY, front faces +Z |
//!
//! Composite shapes are stitched together with [`concat`], which rebases each
//! sub-mesh's indices by the running vertex count.
//!
//! # Example
//!
//! ```
//! use fanrig::geometry;
//!
//! let motor = geometry::cylinder(0.125, 0.4, 32, [0.8, 0.9, 1.0]).unwrap();
//! assert_eq!(motor.triangle_count(), 4 * 32);
//! ```

use std::f32::consts::TAU;

use glam::Vec3;

use crate::mesh::MeshData;

/// Errors raised by the generators and by [`MeshData::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Fewer than three segments cannot enclose an area.
    #[error("{shape}: segment count {segments} is below the minimum of 3")]
    TooFewSegments { shape: &'static str, segments: u32 },
    /// A size parameter was negative or NaN.
    #[error("{shape}: {name} must be non-negative, got {value}")]
    NegativeDimension {
        shape: &'static str,
        name: &'static str,
        value: f32,
    },
    /// A size parameter that must be positive was zero.
    #[error("{shape}: {name} must be positive")]
    ZeroDimension {
        shape: &'static str,
        name: &'static str,
    },
    /// A mesh broke one of the stream-length or index-range invariants.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}

/// Tube radius of every wire in the guard cage.
pub const GUARD_WIRE_RADIUS: f32 = 0.015;
/// Cross-section resolution of guard wires.
pub const GUARD_TUBE_SEGMENTS: u32 = 8;
/// Back ring radius as a fraction of the front ring.
pub const GUARD_BACK_RING_SCALE: f32 = 0.95;
/// Bars joining the front and back rings.
pub const GUARD_BAR_COUNT: u32 = 12;
/// Extra concentric rings on the guard's front face.
pub const GUARD_INNER_RINGS: u32 = 3;
/// Radial spokes on the guard's front face.
pub const GUARD_SPOKE_COUNT: u32 = 16;
/// Width of guard bars and spokes.
pub const GUARD_RIBBON_WIDTH: f32 = 0.01;
/// Guard wire color.
pub const GUARD_COLOR: [f32; 3] = [0.15, 0.15, 0.15];
/// Z offset of a blade's back face.
pub const BLADE_BACK_OFFSET: f32 = 0.02;

fn check_segments(shape: &'static str, segments: u32) -> Result<(), GeometryError> {
    if segments < 3 {
        return Err(GeometryError::TooFewSegments { shape, segments });
    }
    Ok(())
}

fn check_dimension(
    shape: &'static str,
    name: &'static str,
    value: f32,
) -> Result<(), GeometryError> {
    // Written as a negated comparison so NaN is rejected too.
    if !(value >= 0.0) {
        return Err(GeometryError::NegativeDimension { shape, name, value });
    }
    Ok(())
}

fn check_positive(
    shape: &'static str,
    name: &'static str,
    value: f32,
) -> Result<(), GeometryError> {
    check_dimension(shape, name, value)?;
    if value == 0.0 {
        return Err(GeometryError::ZeroDimension { shape, name });
    }
    Ok(())
}

/// Unit radial direction in the XZ plane at segment `i` of `segments`.
fn radial_xz(i: u32, segments: u32) -> Vec3 {
    let theta = TAU * i as f32 / segments as f32;
    Vec3::new(theta.cos(), 0.0, theta.sin())
}

/// Appends a quad-strip wall of `segments` panels between `y0` and `y1`.
///
/// Uses one bottom/top vertex pair per segment angle; the seam closes by wrapping
/// the next index back to zero, so the wall adds `2 * segments` vertices.
fn side_wall(mesh: &mut MeshData, radius: f32, y0: f32, y1: f32, segments: u32, color: [f32; 3]) {
    let base = mesh.vertex_count() as u32;
    for i in 0..segments {
        let dir = radial_xz(i, segments);
        mesh.push_vertex(dir * radius + Vec3::Y * y0, dir, color);
        mesh.push_vertex(dir * radius + Vec3::Y * y1, dir, color);
    }
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (b0, t0) = (base + 2 * i, base + 2 * i + 1);
        let (b1, t1) = (base + 2 * j, base + 2 * j + 1);
        mesh.push_triangle(b0, t0, b1);
        mesh.push_triangle(t0, t1, b1);
    }
}

/// Appends a triangle-fan cap at height `y` with its own center and closed ring.
///
/// `facing_up` selects the +Y normal and the winding that is counter-clockwise
/// seen from above; otherwise the cap faces -Y.
fn cap(mesh: &mut MeshData, radius: f32, y: f32, segments: u32, color: [f32; 3], facing_up: bool) {
    let normal = if facing_up { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.push_vertex(Vec3::Y * y, normal, color);
    for i in 0..=segments {
        mesh.push_vertex(radial_xz(i, segments) * radius + Vec3::Y * y, normal, color);
    }
    for i in 0..segments {
        let (a, b) = (center + 1 + i, center + 2 + i);
        if facing_up {
            mesh.push_triangle(center, b, a);
        } else {
            mesh.push_triangle(center, a, b);
        }
    }
}

/// Generates a disk with thickness: a flat puck whose bottom face sits at `y` and
/// top face at `y + depth`.
///
/// With `depth == 0` the two rings coincide and the side-wall triangles are
/// degenerate; that is allowed and produces a flat, double-faced disk.
pub fn disk(
    radius: f32,
    segments: u32,
    y: f32,
    color: [f32; 3],
    depth: f32,
) -> Result<MeshData, GeometryError> {
    check_segments("disk", segments)?;
    check_positive("disk", "radius", radius)?;
    check_dimension("disk", "depth", depth)?;

    let mut mesh = MeshData::new();
    cap(&mut mesh, radius, y + depth, segments, color, true);
    cap(&mut mesh, radius, y, segments, color, false);
    side_wall(&mut mesh, radius, y, y + depth, segments, color);
    mesh.validate()?;
    Ok(mesh)
}

/// Generates a capped cylinder standing on the XZ plane, spanning `y ∈ [0, height]`.
///
/// The caps get dedicated center and ring vertices rather than sharing the wall's,
/// so the caps keep flat normals while the wall keeps radial ones.
///
/// Produces `2s + 2(s + 2)` vertices and `4s` triangles for `s` segments.
pub fn cylinder(
    radius: f32,
    height: f32,
    segments: u32,
    color: [f32; 3],
) -> Result<MeshData, GeometryError> {
    check_segments("cylinder", segments)?;
    check_positive("cylinder", "radius", radius)?;
    check_positive("cylinder", "height", height)?;

    let mut mesh = MeshData::new();
    side_wall(&mut mesh, radius, 0.0, height, segments, color);
    cap(&mut mesh, radius, 0.0, segments, color, false);
    cap(&mut mesh, radius, height, segments, color, true);
    mesh.validate()?;
    Ok(mesh)
}

/// A torus-like wire ring around the Z axis, lying in the plane `z = z0`.
fn tube_ring(radius: f32, z0: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let mut mesh = MeshData::new();
    let tube = GUARD_TUBE_SEGMENTS;

    for i in 0..=segments {
        let theta = TAU * i as f32 / segments as f32;
        let radial = Vec3::new(theta.cos(), theta.sin(), 0.0);
        let center = radial * radius + Vec3::Z * z0;

        for j in 0..=tube {
            let phi = TAU * j as f32 / tube as f32;
            let normal = radial * phi.cos() + Vec3::Z * phi.sin();
            mesh.push_vertex(center + normal * GUARD_WIRE_RADIUS, normal, color);
        }
    }

    for i in 0..segments {
        for j in 0..tube {
            let a = i * (tube + 1) + j;
            let b = a + tube + 1;
            mesh.push_triangle(a, b, a + 1);
            mesh.push_triangle(b, b + 1, a + 1);
        }
    }
    mesh
}

/// A thin flat quad from `start` to `end`, widened along `across`.
///
/// The face normal is `across × (end - start)`; callers pick `across` so that it
/// agrees with `normal`.
fn ribbon(start: Vec3, end: Vec3, across: Vec3, normal: Vec3, color: [f32; 3]) -> MeshData {
    let half = across * (GUARD_RIBBON_WIDTH * 0.5);
    let mut mesh = MeshData::new();
    let p0 = mesh.push_vertex(start - half, normal, color);
    let p1 = mesh.push_vertex(start + half, normal, color);
    let p2 = mesh.push_vertex(end + half, normal, color);
    let p3 = mesh.push_vertex(end - half, normal, color);
    mesh.push_triangle(p0, p1, p2);
    mesh.push_triangle(p0, p2, p3);
    mesh
}

/// Generates the guard cage that sits in front of the blades.
///
/// The cage faces +Z. Its parts are:
///
/// - a front ring of `radius` at `z = 0` and a back ring of
///   `radius * GUARD_BACK_RING_SCALE` at `z = -depth`, both wire tubes swept over
///   `segments` steps
/// - [`GUARD_BAR_COUNT`] bars joining the rings at matching angles
/// - [`GUARD_INNER_RINGS`] smaller concentric rings and [`GUARD_SPOKE_COUNT`] spokes
///   on the front face, each spoke running from the rim to the center
pub fn guard_cage(radius: f32, depth: f32, segments: u32) -> Result<MeshData, GeometryError> {
    check_segments("guard cage", segments)?;
    check_positive("guard cage", "radius", radius)?;
    check_dimension("guard cage", "depth", depth)?;

    let back_radius = radius * GUARD_BACK_RING_SCALE;
    let mut parts = vec![
        tube_ring(radius, 0.0, segments, GUARD_COLOR),
        tube_ring(back_radius, -depth, segments, GUARD_COLOR),
    ];

    for k in 1..=GUARD_INNER_RINGS {
        let r = radius * k as f32 / (GUARD_INNER_RINGS + 1) as f32;
        parts.push(tube_ring(r, 0.0, segments, GUARD_COLOR));
    }

    for i in 0..GUARD_BAR_COUNT {
        let theta = TAU * i as f32 / GUARD_BAR_COUNT as f32;
        let radial = Vec3::new(theta.cos(), theta.sin(), 0.0);
        let tangent = Vec3::new(-theta.sin(), theta.cos(), 0.0);
        let front = radial * radius;
        let back = radial * back_radius - Vec3::Z * depth;
        parts.push(ribbon(front, back, -tangent, radial, GUARD_COLOR));
    }

    for i in 0..GUARD_SPOKE_COUNT {
        let theta = TAU * i as f32 / GUARD_SPOKE_COUNT as f32;
        let radial = Vec3::new(theta.cos(), theta.sin(), 0.0);
        let tangent = Vec3::new(-theta.sin(), theta.cos(), 0.0);
        parts.push(ribbon(radial * radius, Vec3::ZERO, tangent, Vec3::Z, GUARD_COLOR));
    }

    let refs: Vec<&MeshData> = parts.iter().collect();
    let mesh = concat(&refs);
    mesh.validate()?;
    Ok(mesh)
}

/// Generates one fan blade: a trapezoid in the XY plane with a back copy so it
/// is visible and lit from both sides.
///
/// The root edge runs from `(0, 0)` to `(0, -width / 2)`, and the tip edge runs
/// from `(length, width)` to `(length, -width)`. The front copy lies at `z = 0`
/// with normal +Z. The back copy lies at `z = -BLADE_BACK_OFFSET` with normal -Z
/// and reversed winding.
///
/// The local origin is the upper corner of the root edge, so a node that rotates
/// this mesh spins the blade about that corner. Presets place it on the rotor
/// axis, optionally after a radial hub gap.
pub fn blade(length: f32, width: f32, color: [f32; 3]) -> Result<MeshData, GeometryError> {
    check_positive("blade", "length", length)?;
    check_positive("blade", "width", width)?;

    let outline = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(length, width, 0.0),
        Vec3::new(length, -width, 0.0),
        Vec3::new(0.0, -width * 0.5, 0.0),
    ];

    let mut mesh = MeshData::new();
    for p in outline {
        mesh.push_vertex(p, Vec3::Z, color);
    }
    mesh.push_triangle(0, 2, 1);
    mesh.push_triangle(0, 3, 2);

    let back = mesh.vertex_count() as u32;
    for p in outline {
        mesh.push_vertex(p - Vec3::Z * BLADE_BACK_OFFSET, Vec3::NEG_Z, color);
    }
    mesh.push_triangle(back, back + 1, back + 2);
    mesh.push_triangle(back, back + 2, back + 3);

    mesh.validate()?;
    Ok(mesh)
}

/// Concatenates meshes into one, rebasing each mesh's indices by the number of
/// vertices that precede it.
pub fn concat(meshes: &[&MeshData]) -> MeshData {
    let total_vertices: usize = meshes.iter().map(|m| m.vertex_count()).sum();
    let total_indices: usize = meshes.iter().map(|m| m.indices.len()).sum();

    let mut result = MeshData {
        positions: Vec::with_capacity(total_vertices),
        normals: Vec::with_capacity(total_vertices),
        colors: Vec::with_capacity(total_vertices),
        indices: Vec::with_capacity(total_indices),
    };

    for mesh in meshes {
        let offset = result.vertex_count() as u32;
        result.positions.extend_from_slice(&mesh.positions);
        result.normals.extend_from_slice(&mesh.normals);
        result.colors.extend_from_slice(&mesh.colors);
        result.indices.extend(mesh.indices.iter().map(|&i| i + offset));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 3] = [1.0, 0.0, 0.0];

    fn face_normal(mesh: &MeshData, tri: usize) -> Vec3 {
        let [a, b, c] = mesh.triangle(tri).unwrap();
        let (pa, pb, pc) = (
            mesh.positions[a as usize],
            mesh.positions[b as usize],
            mesh.positions[c as usize],
        );
        (pb - pa).cross(pc - pa)
    }

    /// Every non-degenerate triangle winds so its face normal agrees with the
    /// vertex normals it references.
    fn assert_winding_matches_normals(mesh: &MeshData) {
        for tri in 0..mesh.triangle_count() {
            if mesh.is_degenerate_triangle(tri) {
                continue;
            }
            let face = face_normal(mesh, tri);
            let [a, b, c] = mesh.triangle(tri).unwrap();
            let vertex_normal =
                mesh.normals[a as usize] + mesh.normals[b as usize] + mesh.normals[c as usize];
            assert!(
                face.dot(vertex_normal) > 0.0,
                "triangle {tri} winds against its normals"
            );
        }
    }

    fn assert_no_degenerate(mesh: &MeshData) {
        for tri in 0..mesh.triangle_count() {
            assert!(!mesh.is_degenerate_triangle(tri), "triangle {tri} is degenerate");
        }
    }

    #[test]
    fn cylinder_counts_for_four_segments() {
        let mesh = cylinder(1.0, 2.0, 4, RED).unwrap();
        assert_eq!(mesh.vertex_count(), 20);
        assert_eq!(mesh.indices.len(), 48);
        assert_eq!(mesh.triangle_count(), 16);
        assert!(mesh.colors.iter().all(|&c| c == RED));
    }

    #[test]
    fn cylinder_spans_height_and_keeps_flat_caps() {
        let mesh = cylinder(0.5, 3.0, 16, RED).unwrap();
        let (min, max) = mesh.bounds();
        assert_eq!(min.y, 0.0);
        assert_eq!(max.y, 3.0);
        let up = mesh.normals.iter().filter(|n| **n == Vec3::Y).count();
        let down = mesh.normals.iter().filter(|n| **n == Vec3::NEG_Y).count();
        assert_eq!(up, 16 + 2);
        assert_eq!(down, 16 + 2);
    }

    #[test]
    fn generated_meshes_are_well_formed() {
        let meshes = [
            disk(0.6, 32, 0.0, RED, 0.05).unwrap(),
            cylinder(0.04, 2.15, 3, RED).unwrap(),
            cylinder(0.125, 0.4, 32, RED).unwrap(),
            guard_cage(0.45, 0.12, 48).unwrap(),
            guard_cage(0.5, 0.1, 3).unwrap(),
            blade(0.4, 0.2, RED).unwrap(),
        ];
        for mesh in &meshes {
            mesh.validate().unwrap();
            assert_eq!(mesh.normals.len(), mesh.positions.len());
            assert_eq!(mesh.colors.len(), mesh.positions.len());
            assert_eq!(mesh.indices.len() % 3, 0);
            assert_no_degenerate(mesh);
            assert_winding_matches_normals(mesh);
        }
    }

    #[test]
    fn disk_faces_point_away_from_each_other() {
        let mesh = disk(1.0, 8, 0.25, RED, 0.1).unwrap();
        let (min, max) = mesh.bounds();
        assert_eq!(min.y, 0.25);
        assert!((max.y - 0.35).abs() < 1e-6);
        // top fan, bottom fan, side wall
        assert_eq!(mesh.triangle_count(), 8 + 8 + 16);
    }

    #[test]
    fn flat_disk_has_coincident_rings_and_degenerate_wall() {
        let segments = 6;
        let mesh = disk(1.0, segments, 0.0, RED, 0.0).unwrap();
        mesh.validate().unwrap();

        let ring = segments as usize + 1;
        let top = &mesh.positions[1..1 + ring];
        let bottom = &mesh.positions[2 + ring..2 + 2 * ring];
        assert_eq!(top, bottom);

        let wall_start = 2 * segments as usize;
        for tri in wall_start..mesh.triangle_count() {
            assert!(mesh.is_degenerate_triangle(tri));
        }
    }

    #[test]
    fn guard_cage_part_counts() {
        let segments = 12;
        let mesh = guard_cage(0.45, 0.12, segments).unwrap();
        let rings = 2 + GUARD_INNER_RINGS;
        let ring_vertices = (segments + 1) * (GUARD_TUBE_SEGMENTS + 1);
        let ring_triangles = segments * GUARD_TUBE_SEGMENTS * 2;
        let ribbons = GUARD_BAR_COUNT + GUARD_SPOKE_COUNT;

        assert_eq!(
            mesh.vertex_count() as u32,
            rings * ring_vertices + ribbons * 4
        );
        assert_eq!(
            mesh.triangle_count() as u32,
            rings * ring_triangles + ribbons * 2
        );
    }

    #[test]
    fn guard_cage_faces_forward_with_depth_behind() {
        let mesh = guard_cage(0.45, 0.12, 24).unwrap();
        let (min, max) = mesh.bounds();
        assert!((max.z - GUARD_WIRE_RADIUS).abs() < 1e-5);
        assert!((min.z - (-0.12 - GUARD_WIRE_RADIUS)).abs() < 1e-5);
        assert!((max.x - (0.45 + GUARD_WIRE_RADIUS)).abs() < 1e-5);
    }

    #[test]
    fn blade_is_double_sided() {
        let mesh = blade(0.4, 0.2, RED).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(face_normal(&mesh, 0).z > 0.0);
        assert!(face_normal(&mesh, 1).z > 0.0);
        assert!(face_normal(&mesh, 2).z < 0.0);
        assert!(face_normal(&mesh, 3).z < 0.0);
        assert_eq!(mesh.positions[0], Vec3::ZERO);
        assert_eq!(mesh.positions[4], Vec3::new(0.0, 0.0, -BLADE_BACK_OFFSET));
    }

    #[test]
    fn concat_rebases_indices_by_running_vertex_count() {
        let a = blade(1.0, 1.0, RED).unwrap();
        let empty = MeshData::new();
        let b = cylinder(1.0, 1.0, 3, RED).unwrap();

        let joined = concat(&[&a, &empty, &b]);
        joined.validate().unwrap();

        assert_eq!(joined.vertex_count(), a.vertex_count() + b.vertex_count());
        assert_eq!(&joined.indices[..a.indices.len()], a.indices.as_slice());
        let offset = a.vertex_count() as u32;
        for (joined_index, original) in joined.indices[a.indices.len()..].iter().zip(&b.indices) {
            assert_eq!(*joined_index, original + offset);
        }
        // Every rebased triangle still points at the same positions.
        for tri in 0..b.triangle_count() {
            let [x, y, z] = b.triangle(tri).unwrap();
            let [jx, jy, jz] = joined.triangle(a.triangle_count() + tri).unwrap();
            assert_eq!(b.positions[x as usize], joined.positions[jx as usize]);
            assert_eq!(b.positions[y as usize], joined.positions[jy as usize]);
            assert_eq!(b.positions[z as usize], joined.positions[jz as usize]);
        }
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let joined = concat(&[]);
        assert_eq!(joined, MeshData::new());
    }

    #[test]
    fn rejects_too_few_segments() {
        assert_eq!(
            cylinder(1.0, 1.0, 2, RED).unwrap_err(),
            GeometryError::TooFewSegments {
                shape: "cylinder",
                segments: 2
            }
        );
        assert!(disk(1.0, 0, 0.0, RED, 0.1).is_err());
        assert!(guard_cage(1.0, 0.1, 1).is_err());
    }

    #[test]
    fn rejects_negative_and_nan_dimensions() {
        assert!(matches!(
            disk(-1.0, 8, 0.0, RED, 0.1),
            Err(GeometryError::NegativeDimension { name: "radius", .. })
        ));
        assert!(cylinder(1.0, f32::NAN, 8, RED).is_err());
        assert!(blade(0.4, -0.2, RED).is_err());
        assert!(guard_cage(0.5, -0.1, 8).is_err());
    }

    #[test]
    fn rejects_zero_sizes_except_depths() {
        assert_eq!(
            cylinder(0.0, 1.0, 8, RED),
            Err(GeometryError::ZeroDimension {
                shape: "cylinder",
                name: "radius"
            })
        );
        assert!(cylinder(1.0, 0.0, 8, RED).is_err());
        assert!(disk(0.0, 8, 0.0, RED, 0.1).is_err());
        assert!(blade(0.0, 0.0, RED).is_err());
        assert!(blade(0.4, 0.0, RED).is_err());
        assert!(guard_cage(0.0, 0.1, 8).is_err());

        // A flat disk and a flat guard are still valid.
        assert!(disk(1.0, 8, 0.0, RED, 0.0).is_ok());
        assert!(guard_cage(0.5, 0.0, 8).is_ok());
    }
}

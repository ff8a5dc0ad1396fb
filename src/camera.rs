use glam::Mat4;

/// Perspective projection parameters.
///
/// Produces right-handed matrices with wgpu's `[0, 1]` clip-space depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    /// Projection matrix for a viewport of the given width/height ratio.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    #[test]
    fn projection_maps_near_and_far_to_unit_depth() {
        let proj = Projection::default().matrix(16.0 / 9.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn wider_aspect_squeezes_x() {
        let proj = Projection::default();
        let square = proj.matrix(1.0).project_point3(Vec3::new(1.0, 1.0, -5.0));
        let wide = proj.matrix(2.0).project_point3(Vec3::new(1.0, 1.0, -5.0));
        assert_abs_diff_eq!(wide.x, square.x / 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(wide.y, square.y, epsilon = 1e-5);
    }
}

use glam::{Mat4, Vec3};

/// Height of the point the orbit camera always looks at.
pub const LOOK_HEIGHT: f32 = 1.0;

/// A camera that circles the fan on a horizontal orbit.
///
/// The eye sits at `(distance * sin(azimuth), height, distance * cos(azimuth))` and
/// always looks at `(0, LOOK_HEIGHT, 0)`. The state does not clamp `distance`;
/// [`Controls`](crate::Controls) keeps it within its configured range.
///
/// # Example
/// ```
/// use fanrig::CameraState;
///
/// let camera = CameraState::new().distance(10.0).height(0.0).azimuth(90.0);
/// assert!((camera.eye().x - 10.0).abs() < 1e-5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Distance from the vertical axis. Must stay positive.
    pub distance: f32,
    /// Eye height above the floor.
    pub height: f32,
    /// Angle around the vertical axis in degrees, within `[0, 360)`.
    pub azimuth_deg: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            distance: Self::DEFAULT_DISTANCE,
            height: Self::DEFAULT_HEIGHT,
            azimuth_deg: Self::DEFAULT_AZIMUTH,
        }
    }
}

impl CameraState {
    pub const DEFAULT_DISTANCE: f32 = 8.0;
    pub const DEFAULT_HEIGHT: f32 = 2.0;
    pub const DEFAULT_AZIMUTH: f32 = 45.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance from the vertical axis.
    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set the eye height.
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the azimuth in degrees.
    pub fn azimuth(mut self, degrees: f32) -> Self {
        self.set_azimuth(degrees);
        self
    }

    /// Sets the azimuth, wrapping it into `[0, 360)`.
    pub fn set_azimuth(&mut self, degrees: f32) {
        let wrapped = degrees.rem_euclid(360.0);
        self.azimuth_deg = if wrapped >= 360.0 { 0.0 } else { wrapped };
    }

    /// Rotates around the vertical axis by `delta_deg`.
    pub fn orbit(&mut self, delta_deg: f32) {
        self.set_azimuth(self.azimuth_deg + delta_deg);
    }

    /// Restores the default placement.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let az = self.azimuth_deg.to_radians();
        Vec3::new(
            self.distance * az.sin(),
            self.height,
            self.distance * az.cos(),
        )
    }

    pub fn target(&self) -> Vec3 {
        Vec3::new(0.0, LOOK_HEIGHT, 0.0)
    }

    /// World-to-view transform with +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target(), Vec3::Y)
    }
}

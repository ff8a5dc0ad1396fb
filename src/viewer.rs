use crate::animation::{AnimationClock, AnimationParams, AnimationState};
use crate::controls::Controls;
use crate::fan::{FanModel, SceneVisitor, traverse_with};
use crate::input::Input;
use crate::orbit_camera::CameraState;
use crate::transform_stack::{StackError, TransformStack};

/// Everything one frame needs apart from the GPU.
///
/// The windowed app and the headless runner drive the same sequence each frame:
/// [`handle_input`](Self::handle_input), [`advance`](Self::advance), then
/// [`submit`](Self::submit) into a [`SceneVisitor`].
pub struct Viewer {
    pub model: FanModel,
    pub clock: AnimationClock,
    pub state: AnimationState,
    pub camera: CameraState,
    pub controls: Controls,
    stack: TransformStack,
}

impl Viewer {
    pub fn new(model: FanModel, params: AnimationParams, camera: CameraState) -> Self {
        let mut state = AnimationState::default();
        state.oscillation_active = params.oscillation_enabled;
        state.blade_active = params.blade_rotation_enabled;

        Self {
            model,
            clock: AnimationClock::new(params),
            state,
            camera,
            controls: Controls::default(),
            stack: TransformStack::default(),
        }
    }

    pub fn handle_input(&mut self, input: &Input) {
        self.controls
            .update(input, &mut self.clock.params, &mut self.camera);
    }

    pub fn advance(&mut self, elapsed_ms: f64) {
        self.clock.advance(&mut self.state, elapsed_ms);
    }

    /// Walks the fan with the stack seeded to the camera's view matrix.
    pub fn submit<V: SceneVisitor + ?Sized>(&mut self, visitor: &mut V) -> Result<(), StackError> {
        let seed = self.camera.view_matrix();
        traverse_with(&mut self.stack, &self.model.root, &self.state, seed, visitor)
    }
}

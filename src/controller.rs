//! Per-frame camera and object transform updates driven by keyboard input.

use glam::{Mat4, Vec3};
use log::debug;

use crate::bindings::{Action, KeyBindings};
use crate::camera::{Camera, Movement};
use crate::input::InputState;

/// Tunables for the transform controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Camera travel in world units per second.
    pub camera_speed: f32,
    /// Object travel in world units per second.
    pub object_speed: f32,
    /// Camera orbit rate in degrees per second.
    pub orbit_speed: f32,
    /// Object spin rate in degrees per second.
    pub spin_speed: f32,
    pub spin_axis: Vec3,
    /// Camera position restored by a reset.
    pub home_position: Vec3,
    pub preset_front: Vec3,
    pub preset_back: Vec3,
    pub max_fov: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            camera_speed: 2.5,
            object_speed: 1.0,
            orbit_speed: 45.0,
            spin_speed: 90.0,
            spin_axis: Vec3::Y,
            home_position: Vec3::new(0.0, 0.0, 3.0),
            preset_front: Vec3::new(0.0, 0.0, 3.0),
            preset_back: Vec3::new(0.0, 0.0, -3.0),
            max_fov: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

/// Translation and spin angle applied to the prism.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObjectTransform {
    pub position: Vec3,
    /// Rotation about the configured spin axis, in degrees.
    pub angle: f32,
}

/// Owns the camera, the object transform and the viewer mode flags.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformController {
    config: ControllerConfig,
    bindings: KeyBindings,
    camera: Camera,
    object: ObjectTransform,
    camera_orbiting: bool,
    object_spinning: bool,
    displaced: bool,
}

impl TransformController {
    pub fn new(config: ControllerConfig, bindings: KeyBindings) -> Self {
        let camera = Camera::looking_at_origin(config.home_position);
        Self {
            config,
            bindings,
            camera,
            object: ObjectTransform::default(),
            camera_orbiting: false,
            object_spinning: false,
            displaced: false,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn object(&self) -> ObjectTransform {
        self.object
    }

    pub fn is_camera_orbiting(&self) -> bool {
        self.camera_orbiting
    }

    pub fn is_object_spinning(&self) -> bool {
        self.object_spinning
    }

    /// Whether object movement keys have moved the scene away from its home pose.
    pub fn is_displaced(&self) -> bool {
        self.displaced
    }

    pub fn toggle_orbit(&mut self) {
        self.camera_orbiting = !self.camera_orbiting;
        debug!("camera orbit {}", on_off(self.camera_orbiting));
    }

    pub fn toggle_spin(&mut self) {
        self.object_spinning = !self.object_spinning;
        debug!("object spin {}", on_off(self.object_spinning));
    }

    /// Puts object and camera back in their home pose and clears the displaced flag.
    ///
    /// The orbit and spin modes are left untouched.
    pub fn reset(&mut self) {
        self.camera = Camera::looking_at_origin(self.config.home_position);
        self.object = ObjectTransform::default();
        self.displaced = false;
    }

    /// Advances the controller by `dt` seconds of input.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        if self.pressed(input, Action::ToggleOrbit) {
            self.toggle_orbit();
        }
        if self.pressed(input, Action::ToggleSpin) {
            self.toggle_spin();
        }
        if self.pressed(input, Action::Reset) {
            debug!("reset requested");
            self.reset();
        }

        let camera_step = self.config.camera_speed * dt;
        for action in Action::CAMERA_MOVES {
            if self.held(input, action) {
                self.reset_if_displaced();
                if let Some(movement) = camera_movement(action) {
                    self.camera.process_keyboard(movement, camera_step);
                }
            }
        }

        let object_step = self.config.object_speed * dt;
        for action in Action::OBJECT_MOVES {
            if self.held(input, action) {
                self.displaced = true;
                self.move_object(action, object_step);
            }
        }

        if self.held(input, Action::CameraPresetFront) {
            self.snap_camera(self.config.preset_front);
        }
        if self.held(input, Action::CameraPresetBack) {
            self.snap_camera(self.config.preset_back);
        }

        if input.scroll() != 0.0 {
            self.camera.process_scroll(input.scroll(), self.config.max_fov);
        }

        if self.camera_orbiting {
            self.reset_if_displaced();
            self.camera.orbit(self.config.orbit_speed * dt);
        }
        if self.object_spinning {
            self.object.angle = (self.object.angle + self.config.spin_speed * dt) % 360.0;
        }
    }

    /// Translation by the object position followed by the spin rotation.
    pub fn model_matrix(&self) -> Mat4 {
        let axis = self.config.spin_axis.try_normalize().unwrap_or(Vec3::Y);
        Mat4::from_translation(self.object.position)
            * Mat4::from_axis_angle(axis, self.object.angle.to_radians())
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.camera.zoom().to_radians(),
            aspect.max(0.01),
            self.config.z_near,
            self.config.z_far,
        )
    }

    // The basis is derived from the camera position vector rather than the
    // look direction; object moves are relative to the line from the origin
    // to the camera.
    fn move_object(&mut self, action: Action, distance: f32) {
        let forward = self.camera.position().normalize_or_zero();
        let right = forward.cross(self.camera.world_up()).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        let offset = match action {
            Action::ObjectForward => forward,
            Action::ObjectBackward => -forward,
            Action::ObjectRight => right,
            Action::ObjectLeft => -right,
            Action::ObjectUp => up,
            Action::ObjectDown => -up,
            _ => return,
        };
        self.object.position += offset * distance;
    }

    fn snap_camera(&mut self, position: Vec3) {
        self.reset_if_displaced();
        self.camera.snap_to(position, Vec3::ZERO);
    }

    fn reset_if_displaced(&mut self) {
        if self.displaced {
            debug!("returning to home pose");
            self.reset();
        }
    }

    fn held(&self, input: &InputState, action: Action) -> bool {
        self.bindings
            .key_for(action)
            .is_some_and(|key| input.is_key_down(key))
    }

    fn pressed(&self, input: &InputState, action: Action) -> bool {
        self.bindings
            .key_for(action)
            .is_some_and(|key| input.was_key_pressed(key))
    }
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(ControllerConfig::default(), KeyBindings::default())
    }
}

fn camera_movement(action: Action) -> Option<Movement> {
    Some(match action {
        Action::CameraForward => Movement::Forward,
        Action::CameraBackward => Movement::Backward,
        Action::CameraLeft => Movement::Left,
        Action::CameraRight => Movement::Right,
        Action::CameraUp => Movement::Up,
        Action::CameraDown => Movement::Down,
        _ => return None,
    })
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, NamedKey};

    const EPSILON: f32 = 1e-3;

    fn hold(key: char) -> InputState {
        let mut input = InputState::new();
        input.set_key_down(KeyCode::character(key));
        input
    }

    fn run(controller: &mut TransformController, input: &mut InputState, frames: usize, dt: f32) {
        for _ in 0..frames {
            controller.update(input, dt);
            input.end_frame();
        }
    }

    #[test]
    fn starts_at_home_pose() {
        let controller = TransformController::default();
        assert_eq!(controller.camera().position(), Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(controller.object(), ObjectTransform::default());
        assert!(!controller.is_displaced());
        assert!(!controller.is_camera_orbiting());
        assert!(!controller.is_object_spinning());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut controller = TransformController::default();
        let mut input = hold('i');
        run(&mut controller, &mut input, 10, 0.1);
        assert!(controller.is_displaced());

        controller.reset();
        let once = controller.clone();
        controller.reset();
        assert_eq!(controller, once);
        assert!(!controller.is_displaced());
        assert_eq!(controller.object(), ObjectTransform::default());
    }

    #[test]
    fn camera_keys_leave_object_alone() {
        let mut controller = TransformController::default();
        let mut input = hold('w');
        run(&mut controller, &mut input, 1, 0.4);
        assert_eq!(controller.object().position, Vec3::ZERO);
        assert!(controller
            .camera()
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), EPSILON));
    }

    #[test]
    fn object_keys_displace_until_reset() {
        let mut controller = TransformController::default();
        let mut input = hold('l');
        run(&mut controller, &mut input, 1, 0.5);
        assert!(controller.is_displaced());

        input.set_key_up(KeyCode::character('l'));
        run(&mut controller, &mut input, 5, 0.5);
        assert!(controller.is_displaced());

        input.set_key_down(KeyCode::Named(NamedKey::Backspace));
        run(&mut controller, &mut input, 1, 0.5);
        assert!(!controller.is_displaced());
    }

    #[test]
    fn object_moves_relative_to_camera_position() {
        let mut controller = TransformController::default();
        // camera at +Z: forward is +Z, right is -X
        let mut input = hold('i');
        run(&mut controller, &mut input, 1, 1.0);
        assert!(controller
            .object()
            .position
            .abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), EPSILON));

        let mut controller = TransformController::default();
        let mut input = hold('l');
        run(&mut controller, &mut input, 1, 1.0);
        assert!(controller
            .object()
            .position
            .abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), EPSILON));

        let mut controller = TransformController::default();
        let mut input = hold('u');
        run(&mut controller, &mut input, 1, 1.0);
        assert!(controller.object().position.abs_diff_eq(Vec3::Y, EPSILON));
    }

    #[test]
    fn camera_move_while_displaced_resets_first() {
        let mut controller = TransformController::default();
        let mut input = hold('j');
        run(&mut controller, &mut input, 3, 0.5);
        input.set_key_up(KeyCode::character('j'));

        input.set_key_down(KeyCode::character('s'));
        run(&mut controller, &mut input, 1, 0.4);
        assert!(!controller.is_displaced());
        assert_eq!(controller.object(), ObjectTransform::default());
        assert!(controller
            .camera()
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), EPSILON));
    }

    #[test]
    fn preset_while_displaced_resets_first() {
        let mut controller = TransformController::default();
        let mut input = hold('i');
        run(&mut controller, &mut input, 2, 0.5);
        assert!(controller.is_displaced());
        input.set_key_up(KeyCode::character('i'));

        input.set_key_down(KeyCode::Digit(2));
        run(&mut controller, &mut input, 1, 0.1);
        assert!(!controller.is_displaced());
        assert_eq!(controller.object(), ObjectTransform::default());
        assert_eq!(controller.camera().position(), Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn orbit_while_displaced_resets_first() {
        let mut controller = TransformController::default();
        let mut input = hold('k');
        run(&mut controller, &mut input, 2, 0.5);
        assert!(controller.is_displaced());
        input.set_key_up(KeyCode::character('k'));

        controller.toggle_orbit();
        run(&mut controller, &mut input, 1, 0.0);
        assert!(!controller.is_displaced());
        assert_eq!(controller.object(), ObjectTransform::default());
        assert!(controller
            .camera()
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPSILON));
    }

    #[test]
    fn spin_while_displaced_keeps_object_position() {
        let mut controller = TransformController::default();
        let mut input = hold('l');
        run(&mut controller, &mut input, 1, 0.5);
        input.set_key_up(KeyCode::character('l'));
        let moved = controller.object().position;
        assert!(moved.abs_diff_eq(Vec3::new(-0.5, 0.0, 0.0), EPSILON));

        controller.toggle_spin();
        run(&mut controller, &mut input, 1, 0.5);
        assert!(controller.is_displaced());
        assert_eq!(controller.object().position, moved);
        assert!((controller.object().angle - 45.0).abs() < EPSILON);
    }

    #[test]
    fn only_camera_actions_map_to_camera_movement() {
        for action in Action::CAMERA_MOVES {
            assert!(camera_movement(action).is_some(), "{action:?}");
        }
        for action in Action::OBJECT_MOVES {
            assert_eq!(camera_movement(action), None);
        }
        assert_eq!(
            camera_movement(Action::CameraForward),
            Some(Movement::Forward)
        );
        assert_eq!(camera_movement(Action::Reset), None);
    }

    #[test]
    fn orbit_full_turn_returns_camera() {
        let mut controller = TransformController::default();
        let start = controller.camera().position();
        controller.toggle_orbit();

        let steps = 360;
        let duration = 360.0 / controller.config().orbit_speed;
        let mut input = InputState::new();
        run(&mut controller, &mut input, steps, duration / steps as f32);
        assert!(controller.camera().position().abs_diff_eq(start, EPSILON));
    }

    #[test]
    fn toggles_flip_once_per_press() {
        let mut controller = TransformController::default();
        let mut input = hold('t');
        run(&mut controller, &mut input, 5, 0.01);
        assert!(controller.is_object_spinning());

        input.set_key_up(KeyCode::character('t'));
        input.set_key_down(KeyCode::character('t'));
        run(&mut controller, &mut input, 1, 0.01);
        assert!(!controller.is_object_spinning());

        let mut input = hold('r');
        run(&mut controller, &mut input, 3, 0.0);
        assert!(controller.is_camera_orbiting());
    }

    #[test]
    fn spin_advances_object_angle() {
        let mut controller = TransformController::default();
        controller.toggle_spin();
        let mut input = InputState::new();
        run(&mut controller, &mut input, 1, 0.5);
        assert!((controller.object().angle - 45.0).abs() < EPSILON);
        assert!(!controller.is_displaced());
    }

    #[test]
    fn presets_snap_camera_to_axis() {
        let mut controller = TransformController::default();
        let mut input = InputState::new();
        input.set_key_down(KeyCode::Digit(2));
        run(&mut controller, &mut input, 1, 0.1);
        assert_eq!(controller.camera().position(), Vec3::new(0.0, 0.0, -3.0));
        assert!(controller.camera().front().abs_diff_eq(Vec3::Z, EPSILON));

        input.set_key_up(KeyCode::Digit(2));
        input.set_key_down(KeyCode::Digit(1));
        run(&mut controller, &mut input, 1, 0.1);
        assert_eq!(controller.camera().position(), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn model_matrix_translates_then_rotates() {
        let mut controller = TransformController::default();
        let mut input = hold('u');
        run(&mut controller, &mut input, 1, 1.0);
        controller.toggle_spin();
        input.set_key_up(KeyCode::character('u'));
        run(&mut controller, &mut input, 1, 1.0);

        let model = controller.model_matrix();
        let origin = model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::Y, EPSILON));
        let x = model.transform_vector3(Vec3::X);
        assert!(x.abs_diff_eq(Vec3::NEG_Z, EPSILON));
    }
}

use glam::{Mat4, Quat, Vec3};

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const DEFAULT_ZOOM: f32 = 45.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_PITCH: f32 = 89.0;

/// Direction of a keyboard camera move, relative to where the camera looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-fly camera described by a position and yaw/pitch angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
}

impl Camera {
    /// Camera at `position` looking down negative Z.
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Camera at `position` turned toward the origin.
    pub fn looking_at_origin(position: Vec3) -> Self {
        let mut camera = Self::new(position);
        camera.face(Vec3::ZERO);
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn process_keyboard(&mut self, movement: Movement, distance: f32) {
        let offset = match movement {
            Movement::Forward => self.front,
            Movement::Backward => -self.front,
            Movement::Left => -self.right,
            Movement::Right => self.right,
            Movement::Up => self.up,
            Movement::Down => -self.up,
        };
        self.position += offset * distance;
    }

    /// Narrows the field of view for positive `lines`, clamped to `1..=max_zoom`.
    pub fn process_scroll(&mut self, lines: f32, max_zoom: f32) {
        self.zoom = (self.zoom - lines).clamp(MIN_ZOOM, max_zoom.max(MIN_ZOOM));
    }

    /// Moves the camera to `position` and turns it toward `target`.
    pub fn snap_to(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.face(target);
    }

    /// Rotates the camera position and heading about the world up axis.
    pub fn orbit(&mut self, degrees: f32) {
        let rotation = Quat::from_axis_angle(self.world_up, degrees.to_radians());
        self.position = rotation * self.position;
        self.yaw -= degrees;
        self.update_vectors();
    }

    fn face(&mut self, target: Vec3) {
        let direction = (target - self.position).normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        self.yaw = direction.z.atan2(direction.x).to_degrees();
        self.pitch = direction
            .y
            .asin()
            .to_degrees()
            .clamp(-MAX_PITCH, MAX_PITCH);
        self.update_vectors();
    }

    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        self.front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

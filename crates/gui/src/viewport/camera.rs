use glam::{Mat4, Vec2, Vec3, Vec4};
use shared::CameraPose;

use super::picking::Ray;

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 200.0;
const PITCH_LIMIT: f32 = 1.5;

/// Arc-ball camera for 3D viewport
#[derive(Clone, Debug)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 12.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        self.target += right * dx + up * dy;
    }

    /// Current pose as recorded by history
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.eye_position().to_array(),
            target: self.target.to_array(),
        }
    }

    /// Place the camera at `pose`, deriving the orbit angles from it.
    /// Degenerate poses (eye on target) keep the current angles.
    pub fn set_pose(&mut self, pose: &CameraPose) {
        let target = Vec3::from_array(pose.target);
        let offset = Vec3::from_array(pose.position) - target;
        self.target = target;

        let distance = offset.length();
        if distance < 1e-6 || !distance.is_finite() {
            return;
        }
        self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = offset.x.atan2(offset.z);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 500.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a world point to normalized device coordinates.
    /// Returns None for points behind the camera.
    pub fn project_ndc(&self, point: Vec3, aspect: f32) -> Option<Vec2> {
        let p = self.view_projection(aspect) * point.extend(1.0);
        if p.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(p.x / p.w, p.y / p.w))
    }

    /// Project a 3D point to 2D screen coords (for overlay drawing)
    pub fn project(&self, point: Vec3, rect: egui::Rect) -> Option<egui::Pos2> {
        let ndc = self.project_ndc(point, rect.width() / rect.height())?;
        Some(ndc_to_screen(ndc, rect))
    }

    /// Ray through a point given in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let vp_inv = self.view_projection(aspect).inverse();

        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Cast a ray from a screen position into the 3D scene
    pub fn screen_ray(&self, screen_pos: egui::Pos2, rect: egui::Rect) -> Ray {
        self.ray_from_ndc(screen_to_ndc(screen_pos, rect), rect.width() / rect.height())
    }
}

/// Screen position -> NDC in [-1, 1] on both axes, Y pointing up
pub fn screen_to_ndc(screen_pos: egui::Pos2, rect: egui::Rect) -> Vec2 {
    Vec2::new(
        (screen_pos.x - rect.center().x) / (rect.width() * 0.5),
        -(screen_pos.y - rect.center().y) / (rect.height() * 0.5),
    )
}

pub fn ndc_to_screen(ndc: Vec2, rect: egui::Rect) -> egui::Pos2 {
    egui::pos2(
        rect.center().x + ndc.x * rect.width() * 0.5,
        rect.center().y - ndc.y * rect.height() * 0.5,
    )
}

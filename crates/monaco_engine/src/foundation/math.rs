//! Math utilities and types
//!
//! Provides the nalgebra aliases used throughout the engine and the fixed
//! local-matrix composition used by transforms.
//!
//! ## Convention
//!
//! Matrices are column-major and act on column vectors (`v' = M * v`), which is
//! what nalgebra does natively. A local matrix applies, in order: scale, rotation
//! about X, rotation about Y, rotation about Z, translation:
//!
//! ```text
//! local = T * Rz * Ry * Rx * S
//! world(child) = world(parent) * local(child)
//! ```
//!
//! This is the transpose of the row-vector form `S * Rx * Ry * Rz * T` and
//! `local(child) * world(parent)` used by row-major graphics APIs, so matrices
//! can be handed to such an API with a single transpose.

pub use nalgebra::{Matrix3, Matrix4, Rotation3, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Compose a local matrix from position, XYZ Euler rotation (radians) and scale.
    ///
    /// The three axis rotations are built and multiplied one by one rather than
    /// through a combined Euler constructor, so each axis decomposes cleanly.
    fn from_local_components(position: &Vec3, rotation: &Vec3, scale: &Vec3) -> Mat4;

    /// Split a matrix built by [`Mat4Ext::from_local_components`] back into
    /// `(position, rotation, scale)`.
    ///
    /// Scale is recovered as the length of each basis column, so negative scale
    /// comes back as a positive scale plus a rotation.
    fn to_local_components(&self) -> (Vec3, Vec3, Vec3);
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn from_local_components(position: &Vec3, rotation: &Vec3, scale: &Vec3) -> Mat4 {
        let scale_matrix = Mat4::new_nonuniform_scaling(scale);
        let rotation_matrix =
            Mat4::rotation_z(rotation.z) * Mat4::rotation_y(rotation.y) * Mat4::rotation_x(rotation.x);
        let translation_matrix = Mat4::new_translation(position);

        translation_matrix * rotation_matrix * scale_matrix
    }

    fn to_local_components(&self) -> (Vec3, Vec3, Vec3) {
        let position = Vec3::new(self.m14, self.m24, self.m34);

        let columns = [
            Vec3::new(self.m11, self.m21, self.m31),
            Vec3::new(self.m12, self.m22, self.m32),
            Vec3::new(self.m13, self.m23, self.m33),
        ];
        let scale = Vec3::new(columns[0].magnitude(), columns[1].magnitude(), columns[2].magnitude());

        // A collapsed axis carries no rotation information; leave it unscaled.
        let unit = |column: Vec3, length: f32| {
            if length > f32::EPSILON {
                column / length
            } else {
                column
            }
        };
        let rotation_matrix = Mat3::from_columns(&[
            unit(columns[0], scale.x),
            unit(columns[1], scale.y),
            unit(columns[2], scale.z),
        ]);

        // Rotation3 euler angles are (roll, pitch, yaw) with R = Rz * Ry * Rx.
        let (x, y, z) = Rotation3::from_matrix_unchecked(rotation_matrix).euler_angles();

        (position, Vec3::new(x, y, z), scale)
    }
}

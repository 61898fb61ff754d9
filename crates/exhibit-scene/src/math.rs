use cgmath::{EuclideanSpace, Matrix4, Point3, Transform, Vector3};

pub type Vec3 = Vector3<f64>;

pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vector3::new(x, y, z)
}

pub fn transform_point(matrix: &Matrix4<f64>, point: Vec3) -> Vec3 {
    matrix.transform_point(Point3::from_vec(point)).to_vec()
}

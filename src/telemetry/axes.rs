use parse_display::Display;

/// A three axis reading from the IMU
#[derive(Display, Default, Debug, Copy, Clone, PartialEq)]
#[display("{x:.2},{y:.2},{z:.2}")]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axes {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

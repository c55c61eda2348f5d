#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub lower_left: [f64; 3],
    pub upper_right: [f64; 3],
    pub width: [f64; 3],
}

impl BoundingBox {
    pub fn new(lower_left: [f64; 3], upper_right: [f64; 3]) -> Self {
        let width = [
            upper_right[0] - lower_left[0],
            upper_right[1] - lower_left[1],
            upper_right[2] - lower_left[2],
        ];
        BoundingBox {
            lower_left,
            upper_right,
            width,
        }
    }

    /// Box spanning `[0, w)` on every axis, the sample-local frame.
    pub fn from_extents(extents: [f64; 3]) -> Self {
        Self::new([0.0; 3], extents)
    }

    /// Half-open containment test on a single axis.
    pub fn contains_axis(&self, axis: usize, value: f64) -> bool {
        value >= self.lower_left[axis] && value < self.upper_right[axis]
    }
}

use crate::bounding_box::BoundingBox;
use crate::error::{BcaError, BcaResult};
use crate::material::Material;
use nalgebra::Vector3;

/// What happens to an ion crossing the sample extent on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Leaving the extent leaves the sample.
    #[default]
    Cut,
    /// Coordinates wrap modulo the extent.
    Periodic,
    /// The axis is unbounded; the extent is only used for binning.
    Infinite,
}

/// Geometric target: a set of prepared materials mapped onto space.
///
/// Positions are sample-local, in Å, with every bounded axis spanning
/// `[0, extent)`. `lookup_material` returning `None` is the only way the
/// cascade engine learns that an ion has left the specimen.
pub trait Sample {
    fn lookup_material(&self, position: &Vector3<f64>) -> Option<&Material>;

    fn bounds(&self) -> &BoundingBox;

    fn boundaries(&self) -> [Boundary; 3];

    fn materials(&self) -> &[Material];

    /// Physical extents (width, height, depth) in Å.
    fn extents(&self) -> [f64; 3] {
        self.bounds().width
    }

    /// Wrap periodic axes back into `[0, extent)`.
    fn apply_boundaries(&self, position: &mut Vector3<f64>) {
        let width = self.bounds().width;
        for (axis, boundary) in self.boundaries().iter().enumerate() {
            if *boundary == Boundary::Periodic {
                let wrapped = position[axis].rem_euclid(width[axis]);
                // rem_euclid rounds tiny negatives up to the extent itself
                position[axis] = if wrapped >= width[axis] { 0.0 } else { wrapped };
            }
        }
    }

    /// Whether the non-geometric axes (cut boundaries) admit the position.
    fn within_cut_axes(&self, position: &Vector3<f64>) -> bool {
        let bounds = self.bounds();
        self.boundaries()
            .iter()
            .enumerate()
            .all(|(axis, boundary)| match boundary {
                Boundary::Cut => bounds.contains_axis(axis, position[axis]),
                Boundary::Periodic | Boundary::Infinite => true,
            })
    }
}

fn check_extents(extents: [f64; 3]) -> BcaResult<()> {
    if extents.iter().any(|w| !(*w > 0.0) || !w.is_finite()) {
        return Err(BcaError::Config(format!(
            "Sample extents must be positive and finite, got {:?}",
            extents
        )));
    }
    Ok(())
}

fn check_prepared(material: &Material) -> BcaResult<()> {
    if material.is_prepared() {
        Ok(())
    } else {
        Err(BcaError::MaterialNotPrepared)
    }
}

/// Cylindrical wire whose axis runs along z.
///
/// The circular cross-section is inscribed in the x/y extents (an ellipse
/// if they differ). The wire is periodic along its axis and cut in x and y.
#[derive(Debug, Clone)]
pub struct WireSample {
    bounds: BoundingBox,
    materials: Vec<Material>,
}

impl WireSample {
    pub fn new(width: f64, height: f64, depth: f64) -> BcaResult<Self> {
        check_extents([width, height, depth])?;
        Ok(WireSample {
            bounds: BoundingBox::from_extents([width, height, depth]),
            materials: Vec::new(),
        })
    }

    /// Set the wire material. Only the first material fills the wire.
    pub fn add_material(&mut self, material: Material) -> BcaResult<()> {
        check_prepared(&material)?;
        self.materials.push(material);
        Ok(())
    }

    /// Height of the upper wire surface above the point `x`, or `None`
    /// when `x` lies outside the cross-section.
    pub fn surface_height(&self, x: f64) -> Option<f64> {
        let [w, h, _] = self.bounds.width;
        let u = 2.0 * x / w - 1.0;
        if u.abs() > 1.0 {
            return None;
        }
        Some(0.5 * h * (1.0 + (1.0 - u * u).max(0.0).sqrt()))
    }
}

impl Sample for WireSample {
    fn lookup_material(&self, position: &Vector3<f64>) -> Option<&Material> {
        if !self.within_cut_axes(position) {
            return None;
        }
        let [w, h, _] = self.bounds.width;
        let u = 2.0 * position[0] / w - 1.0;
        let v = 2.0 * position[1] / h - 1.0;
        if u * u + v * v > 1.0 {
            return None;
        }
        self.materials.first()
    }

    fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    fn boundaries(&self) -> [Boundary; 3] {
        [Boundary::Cut, Boundary::Cut, Boundary::Periodic]
    }

    fn materials(&self) -> &[Material] {
        &self.materials
    }
}

/// Homogeneous slab: cut in depth (x), periodic laterally.
#[derive(Debug, Clone)]
pub struct SolidSample {
    bounds: BoundingBox,
    materials: Vec<Material>,
}

impl SolidSample {
    pub fn new(extents: [f64; 3], material: Material) -> BcaResult<Self> {
        check_extents(extents)?;
        check_prepared(&material)?;
        Ok(SolidSample {
            bounds: BoundingBox::from_extents(extents),
            materials: vec![material],
        })
    }
}

impl Sample for SolidSample {
    fn lookup_material(&self, position: &Vector3<f64>) -> Option<&Material> {
        if !self.within_cut_axes(position) {
            return None;
        }
        self.materials.first()
    }

    fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    fn boundaries(&self) -> [Boundary; 3] {
        [Boundary::Cut, Boundary::Periodic, Boundary::Periodic]
    }

    fn materials(&self) -> &[Material] {
        &self.materials
    }
}

/// Stack of slabs along x, each with its own material; periodic laterally.
#[derive(Debug, Clone)]
pub struct LayeredSample {
    bounds: BoundingBox,
    materials: Vec<Material>,
    /// Upper x boundary of each layer
    layer_tops: Vec<f64>,
}

impl LayeredSample {
    pub fn new(lateral: [f64; 2]) -> Self {
        LayeredSample {
            bounds: BoundingBox::from_extents([0.0, lateral[0], lateral[1]]),
            materials: Vec::new(),
            layer_tops: Vec::new(),
        }
    }

    /// Append a layer of `thickness` Å below the existing ones.
    pub fn add_layer(&mut self, thickness: f64, material: Material) -> BcaResult<()> {
        check_extents([thickness, self.bounds.width[1], self.bounds.width[2]])?;
        check_prepared(&material)?;
        let top = self.layer_tops.last().copied().unwrap_or(0.0) + thickness;
        self.layer_tops.push(top);
        self.materials.push(material);
        self.bounds = BoundingBox::from_extents([top, self.bounds.width[1], self.bounds.width[2]]);
        Ok(())
    }

    /// Index of the layer containing depth `x`.
    pub fn layer_index(&self, x: f64) -> Option<usize> {
        if x < 0.0 {
            return None;
        }
        self.layer_tops.iter().position(|&top| x < top)
    }
}

impl Sample for LayeredSample {
    fn lookup_material(&self, position: &Vector3<f64>) -> Option<&Material> {
        if !self.within_cut_axes(position) {
            return None;
        }
        self.layer_index(position[0]).map(|i| &self.materials[i])
    }

    fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    fn boundaries(&self) -> [Boundary; 3] {
        [Boundary::Cut, Boundary::Periodic, Boundary::Periodic]
    }

    fn materials(&self) -> &[Material] {
        &self.materials
    }
}

//! Axis-aligned bounding boxes in WGS84 degrees.

use serde::{Deserialize, Serialize};

/// `(xmin, ymin, xmax, ymax)`. Nothing checks that `xmin <= xmax`: antimeridian-crossing
/// and degenerate boxes are carried as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BBox {
    pub const GLOBAL: BBox = BBox { xmin: -180.0, ymin: -90.0, xmax: 180.0, ymax: 90.0 };

    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    pub fn coords(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

impl From<[f64; 4]> for BBox {
    fn from([xmin, ymin, xmax, ymax]: [f64; 4]) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }
}

impl From<BBox> for [f64; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.coords()
    }
}

impl std::fmt::Display for BBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_array() {
        let bbox = BBox::new(-130.0, 45.0, -125.0, 46.5);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[-130.0,45.0,-125.0,46.5]");
        let back: BBox = serde_json::from_str("[-130,45,-125,46.5]").unwrap();
        assert_eq!(back, bbox);
    }

    #[test]
    fn display_is_comma_separated() {
        assert_eq!(BBox::new(10.0, 20.5, 30.0, 40.0).to_string(), "10,20.5,30,40");
    }
}

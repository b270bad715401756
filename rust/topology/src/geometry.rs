// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opaque geometric carriers attached to topology records.
//!
//! Geometry is carried through unchanged: the conversion never evaluates
//! curves or surfaces, it only preserves their parameter blocks so a
//! downstream kernel can rebuild them.

use serde::{Deserialize, Serialize};

/// A curve carrier referenced by edge records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveCarrier {
    /// Straight line: origin and direction.
    Line { origin: [f64; 3], direction: [f64; 3] },
    /// Circle: center, plane normal and radius.
    Circle {
        center: [f64; 3],
        normal: [f64; 3],
        radius: f64,
    },
    /// Any other curve form, kept as its raw parameter block.
    Other { tag: u32, params: Vec<f64> },
}

/// A surface carrier referenced by face records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceCarrier {
    /// Plane: origin and normal.
    Plane { origin: [f64; 3], normal: [f64; 3] },
    /// Cylinder: origin, axis and radius.
    Cylinder {
        origin: [f64; 3],
        axis: [f64; 3],
        radius: f64,
    },
    /// Any other surface form, kept as its raw parameter block.
    Other { tag: u32, params: Vec<f64> },
}

/// A placement: 3×4 transform matrix, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub matrix: [f64; 12],
}

impl Location {
    /// The identity placement.
    pub fn identity() -> Self {
        Self {
            matrix: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_location_diagonal() {
        let id = Location::identity();
        assert_eq!(id.matrix[0], 1.0);
        assert_eq!(id.matrix[5], 1.0);
        assert_eq!(id.matrix[10], 1.0);
        assert_eq!(id.matrix.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn carriers_compare_structurally() {
        let a = CurveCarrier::Line {
            origin: [0.0; 3],
            direction: [1.0, 0.0, 0.0],
        };
        let b = a.clone();
        assert_eq!(a, b);

        let other = SurfaceCarrier::Other {
            tag: 9,
            params: vec![1.0, 2.0],
        };
        assert_ne!(
            other,
            SurfaceCarrier::Other {
                tag: 9,
                params: vec![1.0]
            }
        );
    }
}

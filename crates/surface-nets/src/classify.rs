//! Per-cell corner classification.

use crate::field::ScalarField;

/// Inside/outside pattern of a cell's 8 corners.
///
/// Bit `i` is set when corner `i` samples negative (inside the surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClassificationMask(pub u8);

impl ClassificationMask {
    /// All corners outside.
    pub const EMPTY: Self = Self(0);
    /// All corners inside.
    pub const FULL: Self = Self(u8::MAX);

    /// Build a mask from 8 corner samples.
    #[inline]
    pub fn from_samples(samples: &[f32; 8]) -> Self {
        let mut mask = 0u8;
        for (i, &value) in samples.iter().enumerate() {
            if value < 0.0 {
                mask |= 1 << i;
            }
        }
        Self(mask)
    }

    /// Whether the cell is entirely inside or entirely outside.
    #[inline]
    pub fn is_trivial(self) -> bool {
        self == Self::EMPTY || self == Self::FULL
    }

    /// Whether corner `corner` is inside.
    #[inline]
    pub fn is_inside(self, corner: usize) -> bool {
        (self.0 >> corner) & 1 != 0
    }

    /// Whether the cell edge between two corners crosses the surface.
    #[inline]
    pub fn crosses(self, a: usize, b: usize) -> bool {
        self.is_inside(a) != self.is_inside(b)
    }

    /// Raw bits.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

/// Classify the 8 corners of `cell`.
#[inline]
pub fn classify(field: &ScalarField<'_>, cell: [usize; 3]) -> ClassificationMask {
    let mut samples = [0.0f32; 8];
    for (corner, value) in samples.iter_mut().enumerate() {
        *value = field.sample(cell, corner);
    }
    ClassificationMask::from_samples(&samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ScalarGrid;

    #[test]
    fn test_trivial_masks() {
        assert!(ClassificationMask::EMPTY.is_trivial());
        assert!(ClassificationMask::FULL.is_trivial());
        assert!(!ClassificationMask(0b0000_0001).is_trivial());
        assert!(!ClassificationMask(0b0111_1111).is_trivial());
    }

    #[test]
    fn test_zero_counts_as_outside() {
        let mask = ClassificationMask::from_samples(&[0.0, -0.0, 1.0, -1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(mask.bits(), 0b0000_1000);
    }

    #[test]
    fn test_nan_counts_as_outside() {
        let mask =
            ClassificationMask::from_samples(&[f32::NAN, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0]);
        assert_eq!(mask.bits(), 0b1111_1110);
        assert!(mask.crosses(0, 1));
    }

    #[test]
    fn test_classify_cell() {
        // Only sample (1, 0, 1) is inside: corner 2 of cell (0, 0, 0).
        let grid = ScalarGrid::from_fn(3, |x, y, z| {
            if x == 1.0 && y == 0.0 && z == 1.0 { -1.0 } else { 1.0 }
        })
        .unwrap();
        let field = grid.as_field().unwrap();

        assert_eq!(classify(&field, [0, 0, 0]).bits(), 1 << 2);
        // Same sample is corner 0 of cell (1, 0, 1).
        assert_eq!(classify(&field, [1, 0, 1]).bits(), 1 << 0);
        assert!(classify(&field, [1, 1, 1]).is_trivial());
    }
}

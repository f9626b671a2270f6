//! Dense row-major grids decoded from raw game images.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GridPoint, Point2};

/// Raw image delivered by the transport for pathing, placement, height,
/// visibility and creep data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImage {
    /// Number of columns in the image.
    pub width: u32,
    /// Number of rows in the image.
    pub height: u32,
    /// Bits used to encode a single cell; 1 and 8 are supported.
    pub bits_per_pixel: u8,
    /// Packed cell data in row-major order, most significant bit first.
    pub data: Vec<u8>,
}

/// Errors raised while decoding a [`RawImage`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The image used a pixel depth the decoder does not understand.
    #[error("unsupported pixel depth of {0} bits")]
    UnsupportedDepth(u8),
    /// The packed data does not cover every cell of the image.
    #[error("image of {width}x{height} needs {expected} bytes, got {actual}")]
    Truncated {
        /// Declared column count.
        width: u32,
        /// Declared row count.
        height: u32,
        /// Byte count required by the dimensions.
        expected: usize,
        /// Byte count actually supplied.
        actual: usize,
    },
}

/// Dense two-dimensional array of cells with fixed dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Creates a grid filled with `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; cell_count(width, height)],
        }
    }

    /// Builds a grid by evaluating `cell` for every coordinate.
    pub fn from_fn<F>(width: u32, height: u32, mut cell: F) -> Self
    where
        F: FnMut(GridPoint) -> T,
    {
        let mut cells = Vec::with_capacity(cell_count(width, height));
        for y in 0..height {
            for x in 0..width {
                cells.push(cell(GridPoint::new(x, y)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Value stored at `point`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, point: GridPoint) -> Option<T> {
        self.index(point).and_then(|index| self.cells.get(index).copied())
    }

    /// Value stored in the cell containing a map position.
    #[must_use]
    pub fn at(&self, position: Point2) -> Option<T> {
        position.to_grid().and_then(|point| self.get(point))
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    fn index(&self, point: GridPoint) -> Option<usize> {
        if point.x >= self.width || point.y >= self.height {
            return None;
        }
        let row = usize::try_from(point.y).ok()?;
        let column = usize::try_from(point.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl Grid<u8> {
    /// Decodes a raw image into one byte per cell.
    ///
    /// One-bit images expand to `0` or `1`; eight-bit images are copied.
    pub fn from_raw(image: &RawImage) -> Result<Self, GridError> {
        let count = cell_count(image.width, image.height);
        let expected = match image.bits_per_pixel {
            1 => count.div_ceil(8),
            8 => count,
            other => return Err(GridError::UnsupportedDepth(other)),
        };
        if image.data.len() < expected {
            return Err(GridError::Truncated {
                width: image.width,
                height: image.height,
                expected,
                actual: image.data.len(),
            });
        }

        let cells = if image.bits_per_pixel == 1 {
            (0..count)
                .map(|index| (image.data[index / 8] >> (7 - index % 8)) & 1)
                .collect()
        } else {
            image.data[..count].to_vec()
        };

        Ok(Self {
            width: image.width,
            height: image.height,
            cells,
        })
    }

    /// Reports whether the cell at `point` holds a non-zero value.
    #[must_use]
    pub fn is_set(&self, point: GridPoint) -> bool {
        self.get(point).is_some_and(|value| value != 0)
    }
}

fn cell_count(width: u32, height: u32) -> usize {
    let count = u64::from(width) * u64::from(height);
    usize::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_bit_images_unpack_most_significant_bit_first() {
        let image = RawImage {
            width: 4,
            height: 2,
            bits_per_pixel: 1,
            data: vec![0b1001_0110],
        };
        let grid = Grid::from_raw(&image).expect("decodes");
        assert_eq!(grid.cells(), &[1, 0, 0, 1, 0, 1, 1, 0]);
        assert!(grid.is_set(GridPoint::new(3, 0)));
        assert!(!grid.is_set(GridPoint::new(0, 1)));
        assert!(!grid.is_set(GridPoint::new(9, 9)));
    }

    #[test]
    fn eight_bit_images_copy_bytes() {
        let image = RawImage {
            width: 2,
            height: 2,
            bits_per_pixel: 8,
            data: vec![10, 20, 30, 40],
        };
        let grid = Grid::from_raw(&image).expect("decodes");
        assert_eq!(grid.get(GridPoint::new(1, 1)), Some(40));
        assert_eq!(grid.at(Point2::new(0.7, 1.2)), Some(30));
        assert_eq!(grid.at(Point2::new(-0.5, 0.0)), None);
    }

    #[test]
    fn truncated_images_are_rejected() {
        let image = RawImage {
            width: 3,
            height: 3,
            bits_per_pixel: 8,
            data: vec![0; 4],
        };
        assert!(matches!(
            Grid::from_raw(&image),
            Err(GridError::Truncated { expected: 9, .. })
        ));
    }

    #[test]
    fn unsupported_depth_is_rejected() {
        let image = RawImage {
            width: 1,
            height: 1,
            bits_per_pixel: 4,
            data: vec![0],
        };
        assert_eq!(Grid::from_raw(&image), Err(GridError::UnsupportedDepth(4)));
    }
}

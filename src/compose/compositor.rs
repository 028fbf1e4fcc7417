//! Grid compositor
//!
//! Lays every cluster out as one column of a single RGB8 buffer. Cells
//! without a member stay white.

use image::{Rgb, RgbImage};
use log::{debug, info};

use super::layout::{placements, ComposeOptions, LayoutGeometry, CHANNELS};
use crate::error::{ClusterError, Result};
use crate::model::{ClusterSet, ImageStore};

/// Background color of empty cells
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Finished composite plus the geometry it was built from
#[derive(Debug, Clone)]
pub struct Composite {
    /// The pixel buffer, `(rows * cell_height) x (columns * cell_width)`
    pub buffer: RgbImage,
    pub geometry: LayoutGeometry,
    /// Size of `buffer` in bytes
    pub bytes_allocated: u64,
}

impl Composite {
    /// `(height, width, channels)` of the buffer
    pub fn shape(&self) -> (usize, usize, usize) {
        (
            self.buffer.height() as usize,
            self.buffer.width() as usize,
            CHANNELS,
        )
    }

    pub fn into_buffer(self) -> RgbImage {
        self.buffer
    }
}

/// Compose all clusters into one grid image
///
/// The memory budget and every member lookup are checked before the buffer
/// is allocated, so a failed call allocates nothing.
///
/// # Errors
/// * `InvalidInput` - see [`LayoutGeometry::plan`]
/// * `MemoryBudgetExceeded` - buffer larger than `options.memory_limit_bytes`
/// * `MissingImage` - a placed member has no entry in `images`
pub fn compose(
    clusters: &ClusterSet,
    images: &ImageStore,
    options: &ComposeOptions,
) -> Result<Composite> {
    let geometry = LayoutGeometry::plan(clusters, images, options)?;
    let (width, height) = geometry.pixel_dimensions()?;

    let cells = placements(clusters, &geometry)
        .into_iter()
        .map(|cell| {
            images
                .get(cell.key)
                .map(|image| (cell, image))
                .ok_or_else(|| ClusterError::MissingImage {
                    key: cell.key.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Laying out {} images in {} rows x {} columns",
        cells.len(),
        geometry.rows,
        geometry.columns
    );

    let mut buffer = RgbImage::from_pixel(width, height, BACKGROUND);
    let stride = width as usize * CHANNELS;
    for (cell, image) in cells {
        let (x0, y0) = geometry.cell_origin(cell.row, cell.column);
        copy_into_cell(&mut buffer, stride, image, x0, y0, &geometry);
    }

    let bytes_allocated = buffer.as_raw().len() as u64;
    info!(
        "plot array (u8) size: {:.2} MiB",
        bytes_allocated as f64 / (1024.0 * 1024.0)
    );

    Ok(Composite {
        buffer,
        geometry,
        bytes_allocated,
    })
}

/// Copy `image` row by row into the cell whose top-left pixel is `(x0, y0)`.
/// Anything outside the cell is clipped.
fn copy_into_cell(
    buffer: &mut RgbImage,
    stride: usize,
    image: &RgbImage,
    x0: usize,
    y0: usize,
    geometry: &LayoutGeometry,
) {
    let copy_rows = image.height().min(geometry.cell_height) as usize;
    let copy_cols = image.width().min(geometry.cell_width) as usize;
    let src_stride = image.width() as usize * CHANNELS;
    let row_bytes = copy_cols * CHANNELS;

    let src: &[u8] = image.as_raw();
    let dst: &mut [u8] = buffer;
    for y in 0..copy_rows {
        let src_start = y * src_stride;
        let dst_start = (y0 + y) * stride + x0 * CHANNELS;
        dst[dst_start..dst_start + row_bytes]
            .copy_from_slice(&src[src_start..src_start + row_bytes]);
    }
}

use crate::models::BoundingBox;

/// Square windows scanned left-to-right, top-to-bottom.
///
/// A window is only emitted when it starts strictly before
/// `dimension - cell_size`, so pages no larger than one cell yield nothing.
pub fn grid_cells(width: u32, height: u32, cell_size: u32, stride: u32) -> Vec<BoundingBox> {
    if cell_size == 0 || stride == 0 {
        return Vec::new();
    }

    let mut cells = Vec::new();
    for y in (0..height.saturating_sub(cell_size)).step_by(stride as usize) {
        for x in (0..width.saturating_sub(cell_size)).step_by(stride as usize) {
            cells.push(BoundingBox::new(x, y, cell_size, cell_size));
        }
    }
    cells
}

use percolate_core::Grid;

/// Builds an occupancy grid from rows of `#` (occupied) and `.` (empty).
#[must_use]
pub fn occupancy(rows: &[&str]) -> Grid<bool> {
    Grid::from_rows(
        rows.iter()
            .map(|row| row.chars().map(|cell| cell == '#').collect())
            .collect(),
    )
    .expect("test grids are rectangular")
}

//! Reference resolution and publication of the final label grid.

use crate::{
    Result,
    cell::{Cell, CellSlab},
    error::ClusterError,
    grid::Grid,
};

/// Replaces every reference in `slab` with the label at the end of its chain.
///
/// Chains never leave the partition they were created in, so each partition
/// can be resolved on its own slab. Returns the number of cells rewritten; a
/// slab already in normal form is left unchanged and reports `0`.
pub(crate) fn resolve_slab(slab: &mut CellSlab<'_>) -> Result<usize> {
    let mut rewritten = 0usize;
    for coord in slab.coords() {
        if let Some(Cell::RefTo(_)) = slab.get(coord) {
            let (_, label) = slab.terminal(coord)?;
            slab.set(coord, Cell::Label(label));
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

/// Converts a fully resolved working grid into published labels.
///
/// Empty cells publish as `0`. A reference left in the grid is reported as
/// dangling.
pub(crate) fn publish(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Grid<u32>> {
    let coords = (0..rows).flat_map(|row| (0..cols).map(move |col| (row, col)));
    let labels = cells
        .into_iter()
        .zip(coords)
        .map(|(cell, (row, col))| match cell {
            Cell::Empty => Ok(0),
            Cell::Label(label) => Ok(label),
            Cell::RefTo(_) => Err(ClusterError::DanglingReference { row, col }),
        })
        .collect::<Result<Vec<_>>>()?;
    Grid::from_vec(rows, cols, labels)
}

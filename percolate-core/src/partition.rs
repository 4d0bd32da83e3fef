//! Row partitioning of a grid across workers.

use std::num::NonZeroUsize;

/// Contiguous, half-open row range `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Partition {
    index: usize,
    start: usize,
    end: usize,
}

impl Partition {
    #[rustfmt::skip]
    pub(crate) const fn index(&self) -> usize { self.index }

    #[rustfmt::skip]
    pub(crate) const fn start(&self) -> usize { self.start }

    #[rustfmt::skip]
    pub(crate) const fn end(&self) -> usize { self.end }

    /// Row ranges of `partitions`, in order.
    pub(crate) fn ranges(partitions: &[Self]) -> impl Iterator<Item = (usize, usize)> + '_ {
        partitions
            .iter()
            .map(|partition| (partition.start, partition.end))
    }
}

/// Splits `rows` into at most `workers` non-empty partitions.
///
/// Partition sizes differ by at most one row; the first `rows % count`
/// partitions take the extra row.
pub(crate) fn partition_rows(rows: usize, workers: NonZeroUsize) -> Vec<Partition> {
    let count = workers.get().min(rows);
    let (Some(quotient), Some(remainder)) = (rows.checked_div(count), rows.checked_rem(count))
    else {
        return Vec::new();
    };

    let mut partitions = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let size = quotient + usize::from(index < remainder);
        partitions.push(Partition {
            index,
            start,
            end: start + size,
        });
        start += size;
    }
    partitions
}

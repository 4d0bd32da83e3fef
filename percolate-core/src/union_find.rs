//! Union-find (disjoint set union) over cluster labels.
//!
//! Labels are allocated from a counter shared by every worker of a run, so the
//! ids seen by one forest are sparse. The forest therefore keys parents by
//! label instead of by dense index. Unions always keep the numerically smaller
//! root, which makes representatives monotonically non-increasing.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{Result, cell::Label, error::ClusterError};

/// Hands out labels that are unique across all workers of one run.
#[derive(Debug, Default)]
pub(crate) struct LabelAllocator {
    issued: AtomicU32,
}

impl LabelAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the next unused label, starting at 1.
    pub(crate) fn next_label(&self) -> Result<Label> {
        let previous = self
            .issued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |issued| {
                issued.checked_add(1)
            })
            .map_err(|_| ClusterError::LabelSpaceExhausted)?;
        Ok(previous + 1)
    }

    /// Number of labels issued so far.
    pub(crate) fn issued(&self) -> u32 {
        self.issued.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct UnionFind {
    parent: HashMap<Label, Label>,
}

impl UnionFind {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            parent: HashMap::with_capacity(capacity),
        }
    }

    /// Registers `label` as a singleton set. Existing sets are left untouched.
    pub(crate) fn make_set(&mut self, label: Label) {
        self.parent.entry(label).or_insert(label);
    }

    /// Allocates a fresh label from `allocator` and registers it as a root.
    pub(crate) fn make_new_cluster(&mut self, allocator: &LabelAllocator) -> Result<Label> {
        let label = allocator.next_label()?;
        self.parent.insert(label, label);
        Ok(label)
    }

    fn parent_of(&self, label: Label) -> Label {
        self.parent.get(&label).copied().unwrap_or(label)
    }

    pub(crate) fn find(&mut self, mut label: Label) -> Label {
        let mut root = label;
        loop {
            let parent = self.parent_of(root);
            if parent == root {
                break;
            }
            root = parent;
        }

        while label != root {
            let parent = self.parent_of(label);
            self.parent.insert(label, root);
            label = parent;
        }

        root
    }

    /// Merges the sets of `left` and `right`, returning the surviving root.
    ///
    /// The smaller root always survives.
    pub(crate) fn union(&mut self, left: Label, right: Label) -> Label {
        let left_root = self.find(left);
        let right_root = self.find(right);
        let (min, max) = if left_root <= right_root {
            (left_root, right_root)
        } else {
            (right_root, left_root)
        };
        if min != max {
            self.parent.insert(max, min);
        }
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn allocator_starts_at_one_and_counts_up() {
        let allocator = LabelAllocator::new();
        assert_eq!(allocator.next_label().expect("label"), 1);
        assert_eq!(allocator.next_label().expect("label"), 2);
        assert_eq!(allocator.issued(), 2);
    }

    #[test]
    fn allocator_reports_exhaustion() {
        let allocator = LabelAllocator {
            issued: AtomicU32::new(u32::MAX),
        };
        assert_eq!(
            allocator.next_label(),
            Err(ClusterError::LabelSpaceExhausted)
        );
    }

    #[test]
    fn unknown_labels_are_their_own_root() {
        let mut forest = UnionFind::new();
        assert_eq!(forest.find(42), 42);
    }

    #[rstest]
    #[case(3, 7, 3)]
    #[case(7, 3, 3)]
    #[case(5, 5, 5)]
    fn union_keeps_the_smaller_root(
        #[case] left: Label,
        #[case] right: Label,
        #[case] expected: Label,
    ) {
        let mut forest = UnionFind::new();
        forest.make_set(left);
        forest.make_set(right);
        assert_eq!(forest.union(left, right), expected);
        assert_eq!(forest.find(left), expected);
        assert_eq!(forest.find(right), expected);
    }

    #[test]
    fn representatives_never_increase() {
        let mut forest = UnionFind::new();
        for label in 1..=6 {
            forest.make_set(label);
        }
        assert_eq!(forest.union(5, 6), 5);
        assert_eq!(forest.union(6, 3), 3);
        assert_eq!(forest.union(4, 2), 2);
        assert_eq!(forest.union(5, 4), 2);
        assert_eq!(forest.union(1, 6), 1);
        for label in 2..=6 {
            assert_eq!(forest.find(label), 1);
        }
    }

    #[test]
    fn find_compresses_paths() {
        let mut forest = UnionFind::new();
        for label in 1..=4 {
            forest.make_set(label);
        }
        forest.parent.insert(4, 3);
        forest.parent.insert(3, 2);
        forest.parent.insert(2, 1);

        assert_eq!(forest.find(4), 1);
        assert_eq!(forest.parent.get(&4), Some(&1));
        assert_eq!(forest.parent.get(&3), Some(&1));
    }

    #[test]
    fn make_new_cluster_registers_a_root() {
        let allocator = LabelAllocator::new();
        let mut forest = UnionFind::new();
        let first = forest.make_new_cluster(&allocator).expect("label");
        let second = forest.make_new_cluster(&allocator).expect("label");
        assert_ne!(first, second);
        assert_eq!(forest.parent.len(), 2);
        assert_eq!(forest.find(second), second);
    }
}

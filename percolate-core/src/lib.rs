//! Percolate core library.
//!
//! Labels the 4-connected clusters of occupied cells in a rectangular grid
//! with a row-partitioned, parallel Hoshen-Kopelman pass, and classifies
//! whether any cluster spans the grid.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cell;
mod clusterizer;
mod error;
mod generate;
mod grid;
mod marker;
mod merge;
mod partition;
mod resolve;
mod result;
mod spanning;
mod union_find;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::ClusterizerBuilder,
    clusterizer::{Clusterizer, clusterize},
    error::{ClusterError, ClusterErrorCode, ErrorKind, Result},
    generate::random_occupancy,
    grid::{Coord, Grid},
    result::{ClusterLabel, LabeledGrid, NonContiguousLabels, cluster_sizes},
    spanning::{Axis, SpanResult, classify_spanning},
};

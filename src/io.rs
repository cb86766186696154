//! I/O adapters (C12): text formats for trees, METIS-style adjacency, persisted signature
//! fixtures, and Graphviz export. Gated behind the `io` feature.

pub mod fixture;
pub mod graphviz;
pub mod metis;
pub mod text;

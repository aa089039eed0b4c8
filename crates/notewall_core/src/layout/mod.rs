//! Card wall layout.
//!
//! # Responsibility
//! - Compute masonry placements for the note grid.
//! - Define the text measurement seam used to size each card.

pub mod masonry;
pub mod measure;

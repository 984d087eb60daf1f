//! dharti-index
//!
//! In-memory parcel index with id/owner lookups and point containment, plus
//! the built-in demo registry. See `index` and `demo`.

pub mod demo;
pub mod geometry;
pub mod index;

pub use index::{ParcelIndex, ParcelOutline};

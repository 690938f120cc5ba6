//! # Item Rules
//!
//! The static half of Hollowdeep's inventory: item definitions, categories,
//! stack limits, equipment stat math, and the immutable catalog every
//! container looks items up in.
//!
//! Nothing in this crate mutates after construction. Mutable inventory state
//! lives in `inventory_core`.

pub mod catalog;
pub mod items;
pub mod mechanics;

pub use catalog::*;
pub use items::*;
pub use mechanics::*;

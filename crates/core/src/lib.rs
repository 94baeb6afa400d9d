//! Caleta
//!
//! Storefront cart engine: line items with an optional installation service, and totals that
//! are recomputed from scratch after every mutation.

pub mod cart;
pub mod items;
pub mod prelude;
pub mod totals;

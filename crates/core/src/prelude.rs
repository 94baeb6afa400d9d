//! Caleta prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartAction, CartError},
    items::{LineItem, NewLineItem, ParseServiceTypeError, ServiceType, line_item_id},
    totals::{CartTotals, recalc_totals},
};

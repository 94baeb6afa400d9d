//! Catalog

mod client;
mod errors;
pub mod models;
pub mod woocommerce;

pub use client::*;
pub use errors::CatalogError;
pub use models::{
    Category, CategoryId, CategoryRef, NewCategory, Product, ProductId, normalize_slug,
};
pub use woocommerce::{AuthMode, WooCommerceClient, WooCommerceConfig};

//! Catalog maintenance for the storefront: a WooCommerce client, category mapping tables, and
//! the paginated reconciler that moves products between categories.

pub mod catalog;
pub mod ids;
pub mod migration;
pub mod observability;
pub mod taxonomy;

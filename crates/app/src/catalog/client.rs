//! Catalog client seam.

use async_trait::async_trait;
use mockall::automock;

use crate::catalog::{
    errors::CatalogError,
    models::{Category, CategoryId, NewCategory, Product, ProductId},
};

/// Remote catalog operations used by the migration and taxonomy tools.
#[automock]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page (1-based) of products assigned to `category`.
    async fn list_products(
        &self,
        category: CategoryId,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Product>, CatalogError>;

    /// Replace a product's category list.
    async fn update_product_categories(
        &self,
        product: ProductId,
        categories: &[CategoryId],
    ) -> Result<Product, CatalogError>;

    /// Look a category up by slug.
    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError>;

    /// Create a category.
    async fn create_category(&self, category: &NewCategory) -> Result<Category, CatalogError>;

    /// Move a category under `parent`, or to the top level when `parent` is `None`.
    async fn reparent_category(
        &self,
        category: CategoryId,
        parent: Option<CategoryId>,
    ) -> Result<Category, CatalogError>;
}

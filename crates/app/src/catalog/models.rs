//! Catalog Models

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Product id
pub type ProductId = TypedId<Product>;

/// Product category id
pub type CategoryId = TypedId<Category>;

/// Product as returned by the listing endpoint. Only the fields the migration needs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: ProductId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

impl Product {
    /// Category ids in the order the platform returned them.
    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|category| category.id).collect()
    }
}

/// Category reference embedded in a product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,

    #[serde(default, skip_serializing)]
    pub name: Option<String>,

    #[serde(default, skip_serializing)]
    pub slug: Option<String>,
}

impl From<CategoryId> for CategoryRef {
    fn from(id: CategoryId) -> Self {
        Self {
            id,
            name: None,
            slug: None,
        }
    }
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,

    /// Parent category id; `0` means top level.
    #[serde(default)]
    pub parent: u64,
}

impl Category {
    /// Parent category, `None` for top-level categories.
    pub fn parent_id(&self) -> Option<CategoryId> {
        (self.parent != 0).then(|| CategoryId::new(self.parent))
    }
}

/// New category request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,

    /// Parent category id; `0` means top level.
    pub parent: u64,
}

impl NewCategory {
    /// Parent category, `None` for top-level categories.
    pub fn parent_id(&self) -> Option<CategoryId> {
        (self.parent != 0).then(|| CategoryId::new(self.parent))
    }
}

/// Fold a slug the way the platform stores it: trimmed, lowercase, unaccented, and with
/// whitespace turned into dashes.
pub fn normalize_slug(slug: &str) -> String {
    slug.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductCategoriesUpdate<'a> {
    pub categories: &'a [CategoryRef],
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryParentUpdate {
    pub parent: u64,
}

//! Idempotent category creation.

use tracing::info;

use crate::catalog::{CatalogClient, CatalogError, Category, NewCategory};

/// What [`ensure_category`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The slug did not exist and the category was created.
    Created,

    /// The category existed under another parent and was moved.
    Reparented,

    /// The category already matched.
    Unchanged,
}

/// Category state after [`ensure_category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredCategory {
    pub category: Category,
    pub outcome: EnsureOutcome,
}

/// Make sure a category with the requested slug exists under the requested parent.
///
/// # Errors
///
/// Returns the first [`CatalogError`] raised by the store.
pub async fn ensure_category<C>(
    client: &C,
    wanted: &NewCategory,
) -> Result<EnsuredCategory, CatalogError>
where
    C: CatalogClient + ?Sized,
{
    let Some(existing) = client.find_category_by_slug(&wanted.slug).await? else {
        let category = client.create_category(wanted).await?;

        info!(category.id = %category.id, category.slug = %category.slug, "created category");

        return Ok(EnsuredCategory {
            category,
            outcome: EnsureOutcome::Created,
        });
    };

    if existing.parent == wanted.parent {
        return Ok(EnsuredCategory {
            category: existing,
            outcome: EnsureOutcome::Unchanged,
        });
    }

    let category = client
        .reparent_category(existing.id, wanted.parent_id())
        .await?;

    info!(
        category.id = %category.id,
        from = existing.parent,
        to = category.parent,
        "reparented category"
    );

    Ok(EnsuredCategory {
        category,
        outcome: EnsureOutcome::Reparented,
    })
}

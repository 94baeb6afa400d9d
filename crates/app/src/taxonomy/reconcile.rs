//! Category set reconciliation.

use crate::catalog::CategoryId;

/// Result of reconciling one product's categories against a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChange {
    /// Category list to store on the product.
    pub categories: Vec<CategoryId>,

    /// Whether `categories` differs from what the product currently has.
    pub changed: bool,
}

/// Computes `(current - {old} - legacy_parents) + {new}` without duplicates.
///
/// Surviving ids keep their remote order and `new` is appended when missing, so applying the
/// result a second time yields the same list.
pub fn reconcile_categories(
    current: &[CategoryId],
    old: CategoryId,
    new: CategoryId,
    legacy_parents: &[CategoryId],
) -> CategoryChange {
    let mut categories: Vec<CategoryId> = Vec::with_capacity(current.len() + 1);

    for &id in current {
        if id != new && (id == old || legacy_parents.contains(&id)) {
            continue;
        }

        if !categories.contains(&id) {
            categories.push(id);
        }
    }

    if !categories.contains(&new) {
        categories.push(new);
    }

    let changed = categories.as_slice() != current;

    CategoryChange {
        categories,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId::new).collect()
    }

    const LEGACY: [CategoryId; 3] = [
        CategoryId::new(630),
        CategoryId::new(228),
        CategoryId::new(96),
    ];

    #[test]
    fn strips_old_and_legacy_parents() {
        let change = reconcile_categories(
            &ids(&[630, 631, 96]),
            CategoryId::new(631),
            CategoryId::new(731),
            &LEGACY,
        );

        assert_eq!(change.categories, ids(&[731]));
        assert!(change.changed);
    }

    #[test]
    fn already_migrated_product_is_unchanged() {
        let change = reconcile_categories(
            &ids(&[731]),
            CategoryId::new(631),
            CategoryId::new(731),
            &LEGACY,
        );

        assert_eq!(change.categories, ids(&[731]));
        assert!(!change.changed);
    }

    #[test]
    fn unrelated_categories_keep_their_order() {
        let change = reconcile_categories(
            &ids(&[12, 631, 44, 228]),
            CategoryId::new(631),
            CategoryId::new(731),
            &LEGACY,
        );

        assert_eq!(change.categories, ids(&[12, 44, 731]));
    }

    #[test]
    fn new_category_is_not_duplicated() {
        let change = reconcile_categories(
            &ids(&[731, 631, 731]),
            CategoryId::new(631),
            CategoryId::new(731),
            &LEGACY,
        );

        assert_eq!(change.categories, ids(&[731]));
        assert!(change.changed);
    }

    #[test]
    fn new_category_listed_as_legacy_parent_is_kept() {
        let change = reconcile_categories(
            &ids(&[631]),
            CategoryId::new(631),
            CategoryId::new(96),
            &LEGACY,
        );

        assert_eq!(change.categories, ids(&[96]));
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let first = reconcile_categories(
            &ids(&[5, 630, 631, 96, 8]),
            CategoryId::new(631),
            CategoryId::new(731),
            &LEGACY,
        );
        let second = reconcile_categories(
            &first.categories,
            CategoryId::new(631),
            CategoryId::new(731),
            &LEGACY,
        );

        assert_eq!(second.categories, first.categories);
        assert!(!second.changed);
    }
}

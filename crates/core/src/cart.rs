//! Cart

use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::{
    items::{LineItem, NewLineItem},
    totals::{CartTotals, recalc_totals},
};

/// Errors related to cart mutations or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A price's currency differs from the cart currency (item currency, cart currency).
    #[error("item has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A unit price was negative.
    #[error("item price cannot be negative")]
    NegativePrice,

    /// A quantity or line total does not fit the supported range.
    #[error("cart amount overflow")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A single cart mutation, as emitted by storefront event handlers.
#[derive(Clone, Debug, PartialEq)]
pub enum CartAction<'a> {
    /// Add an item, merging with an identical configuration.
    Add(NewLineItem<'a>),

    /// Set the quantity of a row; zero removes it.
    UpdateQuantity {
        /// Row id.
        id: String,
        /// New quantity.
        quantity: u32,
    },

    /// Flip a row between equipment only and equipment plus installation.
    ToggleType(String),

    /// Remove a row.
    Remove(String),

    /// Empty the cart.
    Clear,
}

/// Shopping cart.
///
/// Rows are kept in insertion order. Totals are recomputed in full after every mutation, and
/// a mutation that fails leaves the cart untouched.
#[derive(Clone, Debug)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    totals: CartTotals<'a>,
    currency: &'static Currency,
}

impl Default for Cart<'_> {
    fn default() -> Self {
        Self::new(iso::CLP)
    }
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            totals: CartTotals::zero(currency),
            currency,
        }
    }

    /// Add an item to the cart.
    ///
    /// An item whose product, service type and options match an existing row increases that
    /// row's quantity. A zero quantity is ignored.
    ///
    /// Returns whether the cart changed.
    ///
    /// # Errors
    ///
    /// - [`CartError::CurrencyMismatch`]: a price is not in the cart currency.
    /// - [`CartError::NegativePrice`]: a unit price is negative.
    /// - [`CartError::Overflow`]: the resulting quantity or totals overflow.
    pub fn add_item(&mut self, item: NewLineItem<'a>) -> Result<bool, CartError> {
        if item.quantity == 0 {
            return Ok(false);
        }

        for price in std::iter::once(&item.base_price).chain(item.installation_price.as_ref()) {
            self.check_price(price)?;
        }

        self.commit(|items| {
            let id = item.id();

            if let Some(existing) = items.iter_mut().find(|line| line.id() == id) {
                let quantity = existing
                    .quantity()
                    .checked_add(item.quantity)
                    .ok_or(CartError::Overflow)?;

                existing.set_quantity(quantity)?;
            } else {
                items.push(LineItem::new(item)?);
            }

            Ok(true)
        })
    }

    /// Set the quantity of the row with the given id. A quantity of zero removes the row.
    ///
    /// Returns whether the cart changed; an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the new totals overflow.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> Result<bool, CartError> {
        if quantity == 0 {
            return self.remove_item(id);
        }

        self.commit(|items| {
            let Some(line) = items.iter_mut().find(|line| line.id() == id) else {
                return Ok(false);
            };

            line.set_quantity(quantity)?;

            Ok(true)
        })
    }

    /// Flip a row between equipment only and equipment plus installation.
    ///
    /// The row's id follows its service type. If another row already holds the toggled
    /// configuration, the toggled row is folded into it.
    ///
    /// Returns whether the cart changed; an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the new quantity or totals overflow.
    pub fn toggle_type(&mut self, id: &str) -> Result<bool, CartError> {
        self.commit(|items| {
            let Some(position) = items.iter().position(|line| line.id() == id) else {
                return Ok(false);
            };

            let mut toggled = items.remove(position);
            toggled.set_service(toggled.service().toggled())?;

            if let Some(existing) = items.iter_mut().find(|line| line.id() == toggled.id()) {
                let quantity = existing
                    .quantity()
                    .checked_add(toggled.quantity())
                    .ok_or(CartError::Overflow)?;

                existing.set_quantity(quantity)?;
            } else {
                items.insert(position, toggled);
            }

            Ok(true)
        })
    }

    /// Remove the row with the given id.
    ///
    /// Returns whether the cart changed; an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the remaining totals cannot be computed.
    pub fn remove_item(&mut self, id: &str) -> Result<bool, CartError> {
        self.commit(|items| {
            let before = items.len();
            items.retain(|line| line.id() != id);

            Ok(items.len() != before)
        })
    }

    /// Empty the cart and zero its totals.
    pub fn clear(&mut self) {
        self.items.clear();
        self.totals = CartTotals::zero(self.currency);
    }

    /// Apply a storefront action.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying mutation.
    pub fn dispatch(&mut self, action: CartAction<'a>) -> Result<bool, CartError> {
        match action {
            CartAction::Add(item) => self.add_item(item),
            CartAction::UpdateQuantity { id, quantity } => self.update_quantity(&id, quantity),
            CartAction::ToggleType(id) => self.toggle_type(&id),
            CartAction::Remove(id) => self.remove_item(&id),
            CartAction::Clear => {
                let changed = !self.is_empty();
                self.clear();
                Ok(changed)
            }
        }
    }

    /// Recompute totals from the current rows without touching the cart.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a money operation fails.
    pub fn recalc_totals(&self) -> Result<CartTotals<'a>, CartError> {
        recalc_totals(&self.items, self.currency)
    }

    /// Totals as of the last mutation.
    pub fn totals(&self) -> &CartTotals<'a> {
        &self.totals
    }

    /// Rows in insertion order.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Row with the given id.
    pub fn get(&self, id: &str) -> Option<&LineItem<'a>> {
        self.items.iter().find(|line| line.id() == id)
    }

    /// Get the number of rows in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all rows.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check_price(&self, price: &Money<'a, Currency>) -> Result<(), CartError> {
        if price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice);
        }

        Ok(())
    }

    fn commit<F>(&mut self, mutate: F) -> Result<bool, CartError>
    where
        F: FnOnce(&mut Vec<LineItem<'a>>) -> Result<bool, CartError>,
    {
        let mut items = self.items.clone();

        if !mutate(&mut items)? {
            return Ok(false);
        }

        let totals = recalc_totals(&items, self.currency)?;

        self.items = items;
        self.totals = totals;

        Ok(true)
    }
}

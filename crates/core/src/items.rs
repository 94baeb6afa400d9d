//! Line items

use std::{collections::BTreeMap, fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::cart::CartError;

/// Whether a line carries the installation service on top of the equipment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ServiceType {
    /// Equipment only (`solo_equipo`).
    #[default]
    EquipmentOnly,

    /// Equipment plus installation (`equipo_mas_instalacion`).
    EquipmentWithInstallation,
}

impl ServiceType {
    /// Storefront wire name of the service type.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::EquipmentOnly => "solo_equipo",
            ServiceType::EquipmentWithInstallation => "equipo_mas_instalacion",
        }
    }

    /// Returns the other service type.
    pub fn toggled(self) -> Self {
        match self {
            ServiceType::EquipmentOnly => ServiceType::EquipmentWithInstallation,
            ServiceType::EquipmentWithInstallation => ServiceType::EquipmentOnly,
        }
    }

    /// Whether the installation price contributes to the line totals.
    pub fn includes_installation(self) -> bool {
        matches!(self, ServiceType::EquipmentWithInstallation)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown service type name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown service type: {0}")]
pub struct ParseServiceTypeError(String);

impl FromStr for ServiceType {
    type Err = ParseServiceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solo_equipo" => Ok(ServiceType::EquipmentOnly),
            "equipo_mas_instalacion" => Ok(ServiceType::EquipmentWithInstallation),
            other => Err(ParseServiceTypeError(other.to_string())),
        }
    }
}

/// Builds the identity key of a configured product.
///
/// Options are rendered in key order, so two selections with the same pairs always produce
/// the same id.
pub fn line_item_id(product_id: u64, service: ServiceType, options: &BTreeMap<String, String>) -> String {
    let mut id = format!("{product_id}:{service}");

    for (key, value) in options {
        id.push(':');
        id.push_str(key);
        id.push('=');
        id.push_str(value);
    }

    id
}

/// A line item as requested by the storefront, before it is placed in a cart.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLineItem<'a> {
    /// Catalog product id on the e-commerce platform.
    pub product_id: u64,

    /// Display name.
    pub name: String,

    /// Unit price of the equipment.
    pub base_price: Money<'a, Currency>,

    /// Unit price of the optional installation service.
    pub installation_price: Option<Money<'a, Currency>>,

    /// Number of units.
    pub quantity: u32,

    /// Selected service type.
    pub service: ServiceType,

    /// Selected product options (size, colour, ...).
    pub options: BTreeMap<String, String>,
}

impl<'a> NewLineItem<'a> {
    /// Single unit of equipment only, with no options selected.
    pub fn new(product_id: u64, name: impl Into<String>, base_price: Money<'a, Currency>) -> Self {
        Self {
            product_id,
            name: name.into(),
            base_price,
            installation_price: None,
            quantity: 1,
            service: ServiceType::EquipmentOnly,
            options: BTreeMap::new(),
        }
    }

    /// Sets the installation unit price.
    #[must_use]
    pub fn with_installation_price(mut self, price: Money<'a, Currency>) -> Self {
        self.installation_price = Some(price);
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the service type.
    #[must_use]
    pub fn with_service(mut self, service: ServiceType) -> Self {
        self.service = service;
        self
    }

    /// Adds a selected option.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Identity key this item would have in a cart.
    pub fn id(&self) -> String {
        line_item_id(self.product_id, self.service, &self.options)
    }
}

/// A cart row. Derived totals are recomputed whenever quantity or service type change.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    id: String,
    product_id: u64,
    name: String,
    base_price: Money<'a, Currency>,
    installation_price: Option<Money<'a, Currency>>,
    quantity: u32,
    service: ServiceType,
    options: BTreeMap<String, String>,
    line_base_total: Money<'a, Currency>,
    line_installation_total: Money<'a, Currency>,
    line_grand_total: Money<'a, Currency>,
}

impl<'a> LineItem<'a> {
    /// Builds a row from a requested item and computes its totals.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if a line total does not fit the minor-unit range.
    pub(crate) fn new(item: NewLineItem<'a>) -> Result<Self, CartError> {
        let zero = Money::from_minor(0, item.base_price.currency());

        let mut line = Self {
            id: item.id(),
            product_id: item.product_id,
            name: item.name,
            base_price: item.base_price,
            installation_price: item.installation_price,
            quantity: item.quantity,
            service: item.service,
            options: item.options,
            line_base_total: zero,
            line_installation_total: zero,
            line_grand_total: zero,
        };

        line.refresh()?;

        Ok(line)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) -> Result<(), CartError> {
        self.quantity = quantity;
        self.refresh()
    }

    pub(crate) fn set_service(&mut self, service: ServiceType) -> Result<(), CartError> {
        self.service = service;
        self.id = line_item_id(self.product_id, service, &self.options);
        self.refresh()
    }

    fn refresh(&mut self) -> Result<(), CartError> {
        let currency = self.base_price.currency();
        let quantity = i64::from(self.quantity);

        let base = self
            .base_price
            .to_minor_units()
            .checked_mul(quantity)
            .ok_or(CartError::Overflow)?;

        let installation = match (self.service.includes_installation(), self.installation_price) {
            (true, Some(price)) => price
                .to_minor_units()
                .checked_mul(quantity)
                .ok_or(CartError::Overflow)?,
            _ => 0,
        };

        let grand = base.checked_add(installation).ok_or(CartError::Overflow)?;

        self.line_base_total = Money::from_minor(base, currency);
        self.line_installation_total = Money::from_minor(installation, currency);
        self.line_grand_total = Money::from_minor(grand, currency);

        Ok(())
    }

    /// Identity key (product, service type and options).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Catalog product id.
    pub fn product_id(&self) -> u64 {
        self.product_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Equipment unit price.
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Installation unit price, if the product offers installation.
    pub fn installation_price(&self) -> Option<&Money<'a, Currency>> {
        self.installation_price.as_ref()
    }

    /// Number of units, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Selected service type.
    pub fn service(&self) -> ServiceType {
        self.service
    }

    /// Selected options.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// `base_price * quantity`
    pub fn line_base_total(&self) -> &Money<'a, Currency> {
        &self.line_base_total
    }

    /// `installation_price * quantity` when installation is selected, zero otherwise.
    pub fn line_installation_total(&self) -> &Money<'a, Currency> {
        &self.line_installation_total
    }

    /// Sum of the base and installation line totals.
    pub fn line_grand_total(&self) -> &Money<'a, Currency> {
        &self.line_grand_total
    }
}

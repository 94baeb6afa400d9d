//! Cart totals

use rusty_money::{Money, iso::Currency};

use crate::{cart::CartError, items::LineItem};

/// Aggregate totals of a cart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartTotals<'a> {
    subtotal_equipment: Money<'a, Currency>,
    subtotal_installation: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
}

impl<'a> CartTotals<'a> {
    /// Totals of an empty cart.
    pub fn zero(currency: &'a Currency) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            subtotal_equipment: zero,
            subtotal_installation: zero,
            grand_total: zero,
        }
    }

    /// Sum of every line's equipment total.
    pub fn subtotal_equipment(&self) -> &Money<'a, Currency> {
        &self.subtotal_equipment
    }

    /// Sum of every line's installation total.
    pub fn subtotal_installation(&self) -> &Money<'a, Currency> {
        &self.subtotal_installation
    }

    /// Equipment plus installation subtotals.
    pub fn grand_total(&self) -> &Money<'a, Currency> {
        &self.grand_total
    }
}

/// Recomputes cart totals from scratch.
///
/// # Errors
///
/// - [`CartError::Money`]: a line is priced in a currency other than `currency`.
pub fn recalc_totals<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<CartTotals<'a>, CartError> {
    let zero = Money::from_minor(0, currency);

    let subtotal_equipment = items
        .iter()
        .try_fold(zero, |acc, item| acc.add(*item.line_base_total()))?;

    let subtotal_installation = items
        .iter()
        .try_fold(zero, |acc, item| acc.add(*item.line_installation_total()))?;

    let grand_total = subtotal_equipment.add(subtotal_installation)?;

    Ok(CartTotals {
        subtotal_equipment,
        subtotal_installation,
        grand_total,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::items::{NewLineItem, ServiceType};

    use super::*;

    #[test]
    fn empty_items_are_zero() -> TestResult {
        let totals = recalc_totals(&[], iso::CLP)?;

        assert_eq!(totals, CartTotals::zero(iso::CLP));

        Ok(())
    }

    #[test]
    fn sums_equipment_and_installation_separately() -> TestResult {
        let items = [
            LineItem::new(
                NewLineItem::new(1, "Carrete", Money::from_minor(40_000, iso::CLP))
                    .with_installation_price(Money::from_minor(8_000, iso::CLP))
                    .with_quantity(2)
                    .with_service(ServiceType::EquipmentWithInstallation),
            )?,
            LineItem::new(
                NewLineItem::new(2, "Línea trenzada", Money::from_minor(12_990, iso::CLP))
                    .with_installation_price(Money::from_minor(2_000, iso::CLP)),
            )?,
        ];

        let totals = recalc_totals(&items, iso::CLP)?;

        assert_eq!(
            totals.subtotal_equipment(),
            &Money::from_minor(92_990, iso::CLP)
        );
        assert_eq!(
            totals.subtotal_installation(),
            &Money::from_minor(16_000, iso::CLP)
        );
        assert_eq!(totals.grand_total(), &Money::from_minor(108_990, iso::CLP));

        Ok(())
    }

    #[test]
    fn foreign_currency_line_is_rejected() -> TestResult {
        let items = [LineItem::new(NewLineItem::new(
            1,
            "Waders",
            Money::from_minor(100, iso::USD),
        ))?];

        assert!(matches!(
            recalc_totals(&items, iso::CLP),
            Err(CartError::Money(_))
        ));

        Ok(())
    }
}

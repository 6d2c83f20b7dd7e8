//! Orders

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{channels::Channel, products::Product, promotions::PromotionSubject};

/// Errors related to order construction or totals.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// An item's currency differs from the order currency (index, item currency, order currency).
    #[error("Item {0} has currency {1}, but order has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An item total does not fit in minor units.
    #[error("Total of {quantity} x {unit_minor} overflows")]
    Overflow {
        /// Unit price in minor units
        unit_minor: i64,

        /// Quantity ordered
        quantity: u32,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem<'a> {
    product: &'a Product,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    total: Money<'a, Currency>,
}

impl<'a> OrderItem<'a> {
    /// Create an order item totalling `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Overflow`] if the total does not fit in minor units.
    pub fn new(
        product: &'a Product,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, OrderError> {
        let unit_minor = unit_price.to_minor_units();
        let total_minor = unit_minor
            .checked_mul(i64::from(quantity))
            .ok_or(OrderError::Overflow {
                unit_minor,
                quantity,
            })?;

        Ok(Self {
            product,
            unit_price,
            quantity,
            total: Money::from_minor(total_minor, unit_price.currency()),
        })
    }

    /// Create an order item with an explicit total, e.g. after adjustments were applied.
    pub fn with_total(
        product: &'a Product,
        unit_price: Money<'a, Currency>,
        quantity: u32,
        total: Money<'a, Currency>,
    ) -> Self {
        Self {
            product,
            unit_price,
            quantity,
            total,
        }
    }

    /// Product ordered.
    pub fn product(&self) -> &'a Product {
        self.product
    }

    /// Unit price.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Quantity ordered.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total.
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }
}

/// An order placed on a channel.
#[derive(Debug, Clone)]
pub struct Order<'a> {
    number: String,
    channel: Channel,
    items: Vec<OrderItem<'a>>,
}

impl<'a> Order<'a> {
    /// Create an empty order on a channel. The order currency is the channel's base currency.
    pub fn new(number: impl Into<String>, channel: Channel) -> Self {
        Self {
            number: number.into(),
            channel,
            items: Vec::new(),
        }
    }

    /// Create an order with the given items.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::CurrencyMismatch`] if an item total is not in the channel's currency.
    pub fn with_items(
        number: impl Into<String>,
        channel: Channel,
        items: impl Into<Vec<OrderItem<'a>>>,
    ) -> Result<Self, OrderError> {
        let items = items.into();
        let currency = channel.base_currency;

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.total().currency();

            if item_currency == currency {
                Ok(())
            } else {
                Err(OrderError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Self {
            number: number.into(),
            channel,
            items,
        })
    }

    /// Order number.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Channel the order was placed on.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Order currency.
    pub fn currency(&self) -> &'static Currency {
        self.channel.base_currency
    }

    /// Items in the order.
    pub fn items(&self) -> &[OrderItem<'a>] {
        &self.items
    }

    /// Sum of all item totals.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Money`] on a money arithmetic error.
    pub fn items_total(&self) -> Result<Money<'a, Currency>, OrderError> {
        let total = self.items.iter().try_fold(
            Money::from_minor(0, self.channel.base_currency),
            |acc, item| acc.add(*item.total()),
        )?;

        Ok(total)
    }
}

impl PromotionSubject for Order<'_> {
    fn subject_type(&self) -> &'static str {
        "order"
    }

    fn as_order(&self) -> Option<&Order<'_>> {
        Some(self)
    }
}

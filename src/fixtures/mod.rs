//! Fixtures
//!
//! YAML fixture sets: `<base>/<category>/<set>.yml` for the categories `channels`, `taxons`,
//! `products`, `variants`, `orders` and `promotions`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    channels::{Channel, ChannelRegistry},
    fixtures::{
        catalog::{ChannelsFixture, ProductsFixture, TaxonsFixture, VariantsFixture},
        orders::{OrderFixture, OrdersFixture},
        prices::parse_money,
        promotions::PromotionsFixture,
    },
    orders::{Order, OrderError, OrderItem},
    pricing::ChannelPricing,
    products::{Product, ProductKey},
    promotions::Promotion,
    taxonomy::{Taxon, TaxonRegistry, TaxonRepository, TaxonomyError},
    variants::{ProductVariant, VariantKey},
};

pub mod catalog;
pub mod orders;
pub mod prices;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Channel not found
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// Taxon not found
    #[error("Taxon not found: {0}")]
    TaxonNotFound(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant not found
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Promotion not found
    #[error("Promotion not found: {0}")]
    PromotionNotFound(String),

    /// A variant price is not in the currency of its channel
    #[error("Price of {variant} on {channel} is in {found}, expected {expected}")]
    PriceCurrencyMismatch {
        /// Variant code
        variant: String,

        /// Channel code
        channel: String,

        /// Channel base currency
        expected: &'static str,

        /// Currency of the price
        found: &'static str,
    },

    /// Taxonomy construction error
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    /// Order construction error
    #[error("Failed to create order: {0}")]
    Order(#[from] OrderError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    channels: ChannelRegistry,
    taxons: TaxonRegistry,

    /// `SlotMaps` to store the actual types with generated keys
    products: SlotMap<ProductKey, Product>,
    variants: SlotMap<VariantKey, ProductVariant<'static>>,

    /// Code -> `SlotMap` key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,
    variant_keys: FxHashMap<String, VariantKey>,

    orders: FxHashMap<String, OrderFixture>,

    /// Promotions, sorted by code
    promotions: Vec<Promotion>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            channels: ChannelRegistry::new(),
            taxons: TaxonRegistry::new(),
            products: SlotMap::with_key(),
            variants: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            variant_keys: FxHashMap::default(),
            orders: FxHashMap::default(),
            promotions: Vec::new(),
        }
    }

    /// Load a complete fixture set (every category with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_channels(name)?
            .load_taxons(name)?
            .load_products(name)?
            .load_variants(name)?
            .load_orders(name)?
            .load_promotions(name)?;

        Ok(fixture)
    }

    fn read<T: DeserializeOwned>(&self, category: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        debug!(path = %file_path.display(), "loading fixture");

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load channels from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a currency is unknown.
    pub fn load_channels(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ChannelsFixture = self.read("channels", name)?;

        for channel in fixture.channels {
            let currency = rusty_money::iso::find(&channel.currency)
                .ok_or_else(|| FixtureError::UnknownCurrency(channel.currency.clone()))?;

            self.channels
                .insert(Channel::new(channel.code, channel.name, currency));
        }

        Ok(self)
    }

    /// Load taxons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a taxon code repeats.
    pub fn load_taxons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: TaxonsFixture = self.read("taxons", name)?;

        for taxon in fixture.taxons {
            self.taxons.insert(taxon.code, taxon.name)?;
        }

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a referenced taxon doesn't
    /// exist.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        for (code, product_fixture) in fixture.products {
            let mut product = Product::new(code.clone(), product_fixture.name);

            for (position, taxon_code) in (0_u32..).zip(&product_fixture.taxons) {
                let taxon = self
                    .taxons
                    .key(taxon_code)
                    .ok_or_else(|| FixtureError::TaxonNotFound(taxon_code.clone()))?;

                product.add_product_taxon(taxon, position);
            }

            let product_key = self.products.insert(product);

            self.product_keys.insert(code, product_key);
        }

        Ok(self)
    }

    /// Load variants from a YAML fixture file
    ///
    /// Prices for channels that are not loaded are kept; they model pricings left behind by
    /// channels that were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a referenced product doesn't
    /// exist, or if a price is not in its channel's currency.
    pub fn load_variants(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: VariantsFixture = self.read("variants", name)?;

        for (code, variant_fixture) in fixture.variants {
            let product = self.product_key(&variant_fixture.product)?;

            let mut prices: Vec<(String, String)> = variant_fixture.prices.into_iter().collect();

            prices.sort_unstable();

            let mut pricings = Vec::with_capacity(prices.len());

            for (channel_code, price) in prices {
                let price = parse_money(&price)?;

                if let Some(channel) = self.channels.find_by_code(&channel_code)
                    && channel.base_currency != price.currency()
                {
                    return Err(FixtureError::PriceCurrencyMismatch {
                        variant: code,
                        channel: channel_code,
                        expected: channel.base_currency.iso_alpha_code,
                        found: price.currency().iso_alpha_code,
                    });
                }

                let mut pricing = ChannelPricing::with_price(price);

                pricing.set_channel_code(channel_code);
                pricings.push(pricing);
            }

            let variant_key = self.variants.insert_with_key(|key| {
                let mut variant = ProductVariant::new(code.clone(), product);

                for mut pricing in pricings {
                    pricing.set_product_variant(key);
                    variant.add_channel_pricing(pricing);
                }

                variant
            });

            self.variant_keys.insert(code, variant_key);
        }

        Ok(self)
    }

    /// Load orders from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an order references a
    /// channel or product that doesn't exist.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OrdersFixture = self.read("orders", name)?;

        for (key, order) in fixture.orders {
            if self.channels.find_by_code(&order.channel).is_none() {
                return Err(FixtureError::ChannelNotFound(order.channel));
            }

            if let Some(item) = order
                .items
                .iter()
                .find(|item| !self.product_keys.contains_key(&item.product))
            {
                return Err(FixtureError::ProductNotFound(item.product.clone()));
            }

            self.orders.insert(key, order);
        }

        Ok(self)
    }

    /// Load promotions from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: PromotionsFixture = self.read("promotions", name)?;

        for (code, promotion) in fixture.promotions {
            self.promotions.push(promotion.into_promotion(code));
        }

        self.promotions
            .sort_unstable_by(|left, right| left.code.cmp(&right.code));

        Ok(self)
    }

    /// Every loaded channel
    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    /// Every loaded channel, mutably
    pub fn channels_mut(&mut self) -> &mut ChannelRegistry {
        &mut self.channels
    }

    /// Every loaded taxon
    pub fn taxons(&self) -> &TaxonRegistry {
        &self.taxons
    }

    /// Get a channel by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is not found.
    pub fn channel(&self, code: &str) -> Result<&Channel, FixtureError> {
        self.channels
            .find_by_code(code)
            .ok_or_else(|| FixtureError::ChannelNotFound(code.to_string()))
    }

    /// Get a taxon by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the taxon is not found.
    pub fn taxon(&self, code: &str) -> Result<Taxon, FixtureError> {
        self.taxons
            .find_one_by_code(code)
            .ok_or_else(|| FixtureError::TaxonNotFound(code.to_string()))
    }

    /// Get a product by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, code: &str) -> Result<&Product, FixtureError> {
        let product_key = self.product_key(code)?;

        self.products
            .get(product_key)
            .ok_or_else(|| FixtureError::ProductNotFound(code.to_string()))
    }

    /// Get a product key by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, code: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(code)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(code.to_string()))
    }

    /// Get a variant key by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the variant is not found.
    pub fn variant_key(&self, code: &str) -> Result<VariantKey, FixtureError> {
        self.variant_keys
            .get(code)
            .copied()
            .ok_or_else(|| FixtureError::VariantNotFound(code.to_string()))
    }

    /// Get a variant by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the variant is not found.
    pub fn variant(&self, code: &str) -> Result<&ProductVariant<'static>, FixtureError> {
        let variant_key = self.variant_key(code)?;

        self.variants
            .get(variant_key)
            .ok_or_else(|| FixtureError::VariantNotFound(code.to_string()))
    }

    /// Get a variant by its code, mutably
    ///
    /// # Errors
    ///
    /// Returns an error if the variant is not found.
    pub fn variant_mut(
        &mut self,
        code: &str,
    ) -> Result<&mut ProductVariant<'static>, FixtureError> {
        let variant_key = self.variant_key(code)?;

        self.variants
            .get_mut(variant_key)
            .ok_or_else(|| FixtureError::VariantNotFound(code.to_string()))
    }

    /// Build an order by its key
    ///
    /// # Errors
    ///
    /// Returns an error if the order, its channel or one of its products is not found, if a
    /// price cannot be parsed, or if the order cannot be constructed.
    pub fn order(&self, key: &str) -> Result<Order<'_>, FixtureError> {
        let fixture = self
            .orders
            .get(key)
            .ok_or_else(|| FixtureError::OrderNotFound(key.to_string()))?;

        let channel = self.channel(&fixture.channel)?.clone();

        let items = fixture
            .items
            .iter()
            .map(|item| -> Result<OrderItem<'_>, FixtureError> {
                let product = self.product(&item.product)?;
                let unit_price = parse_money(&item.unit_price)?;

                match &item.total {
                    Some(total) => Ok(OrderItem::with_total(
                        product,
                        unit_price,
                        item.quantity,
                        parse_money(total)?,
                    )),
                    None => Ok(OrderItem::new(product, unit_price, item.quantity)?),
                }
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        Ok(Order::with_items(fixture.number.clone(), channel, items)?)
    }

    /// Keys of every loaded order, sorted
    pub fn order_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.orders.keys().map(String::as_str).collect();

        keys.sort_unstable();

        keys
    }

    /// Get a promotion by its code
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion is not found.
    pub fn promotion(&self, code: &str) -> Result<&Promotion, FixtureError> {
        self.promotions
            .iter()
            .find(|promotion| promotion.code == code)
            .ok_or_else(|| FixtureError::PromotionNotFound(code.to_string()))
    }

    /// Get all promotions, sorted by code
    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, io, path::Path};

    use rusty_money::{
        Money,
        iso::{EUR, USD},
    };
    use tempfile::TempDir;
    use testresult::TestResult;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> io::Result<()> {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    fn write_set(base: &Path) -> io::Result<()> {
        write_fixture(
            base,
            "channels",
            "set",
            "channels:\n  - code: WEB_US\n    name: Web US\n    currency: USD\n  - code: WEB_EU\n    name: Web EU\n    currency: EUR\n",
        )?;
        write_fixture(
            base,
            "taxons",
            "set",
            "taxons:\n  - code: bows\n    name: Bows\n  - code: swords\n    name: Swords\n",
        )?;
        write_fixture(
            base,
            "products",
            "set",
            "products:\n  COMPOSITE_BOW:\n    name: Composite Bow\n    taxons: [bows]\n  LONGSWORD:\n    name: Longsword\n    taxons: [swords]\n",
        )?;
        write_fixture(
            base,
            "variants",
            "set",
            "variants:\n  COMPOSITE_BOW_60LB:\n    product: COMPOSITE_BOW\n    prices:\n      WEB_US: 50.00 USD\n      RETIRED: 45.00 USD\n",
        )?;
        write_fixture(
            base,
            "orders",
            "set",
            "orders:\n  first:\n    number: \"000001\"\n    channel: WEB_US\n    items:\n      - product: COMPOSITE_BOW\n        unit_price: 50.00 USD\n        quantity: 2\n      - product: LONGSWORD\n        unit_price: 40.00 USD\n        total: 35.00 USD\n",
        )?;
        write_fixture(
            base,
            "promotions",
            "set",
            "promotions:\n  BOW_WEEK:\n    name: Bow week\n    rules:\n      - type: total_of_items_from_taxon\n        configuration:\n          WEB_US:\n            taxon: bows\n            amount: 10000\n  ARMOURY:\n    name: Armoury\n",
        )?;

        Ok(())
    }

    fn loaded() -> TestResult<(TempDir, Fixture)> {
        let dir = tempfile::tempdir()?;

        write_set(dir.path())?;

        let fixture = Fixture::from_set_in(dir.path(), "set")?;

        Ok((dir, fixture))
    }

    #[test]
    fn from_set_loads_every_category() -> TestResult {
        let (_dir, fixture) = loaded()?;

        assert_eq!(fixture.channels().len(), 2);
        assert_eq!(fixture.taxons().len(), 2);
        assert_eq!(fixture.product("COMPOSITE_BOW")?.name, "Composite Bow");
        assert_eq!(fixture.order_keys(), vec!["first"]);
        assert_eq!(
            fixture
                .promotions()
                .iter()
                .map(|promotion| promotion.code.as_str())
                .collect::<Vec<_>>(),
            vec!["ARMOURY", "BOW_WEEK"]
        );
        assert_eq!(fixture.channel("WEB_EU")?.base_currency, EUR);
        assert_eq!(fixture.taxon("bows")?.name, "Bows");

        Ok(())
    }

    #[test]
    fn variants_keep_prices_of_unknown_channels_and_bind_variant() -> TestResult {
        let (_dir, fixture) = loaded()?;
        let key = fixture.variant_key("COMPOSITE_BOW_60LB")?;
        let variant = fixture.variant("COMPOSITE_BOW_60LB")?;

        assert_eq!(
            variant.channel_pricings().codes().collect::<Vec<_>>(),
            vec!["RETIRED", "WEB_US"]
        );
        assert!(
            variant
                .channel_pricings()
                .iter()
                .all(|(_, pricing)| pricing.product_variant() == Some(key))
        );

        Ok(())
    }

    #[test]
    fn variant_mut_updates_stored_variant() -> TestResult {
        let (_dir, mut fixture) = loaded()?;

        fixture
            .variant_mut("COMPOSITE_BOW_60LB")?
            .set_channel_pricings(crate::pricing::ChannelPricings::new());

        assert!(
            fixture
                .variant("COMPOSITE_BOW_60LB")?
                .channel_pricings()
                .is_empty()
        );
        assert!(matches!(
            fixture.variant_mut("nonexistent"),
            Err(FixtureError::VariantNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn order_builds_items_with_computed_and_explicit_totals() -> TestResult {
        let (_dir, fixture) = loaded()?;
        let order = fixture.order("first")?;

        let totals: Vec<&Money<'_, _>> = order.items().iter().map(OrderItem::total).collect();

        assert_eq!(order.number(), "000001");
        assert_eq!(order.channel().code, "WEB_US");
        assert_eq!(
            totals,
            vec![&Money::from_minor(10_000, USD), &Money::from_minor(3500, USD)]
        );

        Ok(())
    }

    #[test]
    fn product_with_unknown_taxon_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "taxons", "bad", "taxons: []\n")?;
        write_fixture(
            dir.path(),
            "products",
            "bad",
            "products:\n  BOW:\n    name: Bow\n    taxons: [bows]\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_taxons("bad")?;

        assert!(matches!(
            fixture.load_products("bad"),
            Err(FixtureError::TaxonNotFound(code)) if code == "bows"
        ));

        Ok(())
    }

    #[test]
    fn variant_price_in_wrong_currency_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "channels",
            "bad",
            "channels:\n  - code: WEB_EU\n    name: Web EU\n    currency: EUR\n",
        )?;
        write_fixture(dir.path(), "taxons", "bad", "taxons: []\n")?;
        write_fixture(
            dir.path(),
            "products",
            "bad",
            "products:\n  BOW:\n    name: Bow\n",
        )?;
        write_fixture(
            dir.path(),
            "variants",
            "bad",
            "variants:\n  BOW_1:\n    product: BOW\n    prices:\n      WEB_EU: 10.00 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture
            .load_channels("bad")?
            .load_taxons("bad")?
            .load_products("bad")?;

        assert!(matches!(
            fixture.load_variants("bad"),
            Err(FixtureError::PriceCurrencyMismatch { expected: "EUR", found: "USD", .. })
        ));

        Ok(())
    }

    #[test]
    fn order_on_unknown_channel_is_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "orders",
            "bad",
            "orders:\n  first:\n    number: \"1\"\n    channel: MOBILE\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_orders("bad"),
            Err(FixtureError::ChannelNotFound(code)) if code == "MOBILE"
        ));

        Ok(())
    }

    #[test]
    fn missing_entries_return_errors() {
        let fixture = Fixture::new();

        assert!(matches!(
            fixture.product("nonexistent"),
            Err(FixtureError::ProductNotFound(_))
        ));
        assert!(matches!(
            fixture.variant("nonexistent"),
            Err(FixtureError::VariantNotFound(_))
        ));
        assert!(matches!(
            fixture.order("nonexistent"),
            Err(FixtureError::OrderNotFound(_))
        ));
        assert!(matches!(
            fixture.promotion("nonexistent"),
            Err(FixtureError::PromotionNotFound(_))
        ));
        assert!(matches!(
            fixture.taxon("nonexistent"),
            Err(FixtureError::TaxonNotFound(_))
        ));
        assert!(matches!(
            fixture.channel("nonexistent"),
            Err(FixtureError::ChannelNotFound(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_channels("nope"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.promotions.is_empty());
        assert!(fixture.channels.is_empty());
    }
}

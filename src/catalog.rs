use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

/// Fixed item name → price table. Built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    prices: BTreeMap<String, i64>,
}

const STANDARD_ITEMS: [(&str, i64); 10] = [
    ("t-shirt", 80),
    ("cup", 20),
    ("book", 50),
    ("pen", 10),
    ("powerbank", 200),
    ("hoody", 300),
    ("umbrella", 200),
    ("socks", 10),
    ("wallet", 50),
    ("pink-hoody", 500),
];

impl Catalog {
    /// The built-in merch table.
    pub fn standard() -> Self {
        Self {
            prices: STANDARD_ITEMS
                .iter()
                .map(|(name, price)| ((*name).to_string(), *price))
                .collect(),
        }
    }

    pub fn from_prices(prices: BTreeMap<String, i64>) -> anyhow::Result<Self> {
        anyhow::ensure!(!prices.is_empty(), "catalog must contain at least one item");
        for (name, price) in &prices {
            anyhow::ensure!(!name.trim().is_empty(), "catalog item name must not be blank");
            anyhow::ensure!(*price > 0, "price of {name} must be positive, got {price}");
        }
        Ok(Self { prices })
    }

    /// Load a `{"item": price, ...}` JSON object.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog {}", path.display()))?;
        let prices: BTreeMap<String, i64> = serde_json::from_str(&raw)
            .with_context(|| format!("parse catalog {}", path.display()))?;
        Self::from_prices(prices)
    }

    pub fn price_of(&self, item: &str) -> Option<i64> {
        self.prices.get(item).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, i64)> {
        self.prices.iter().map(|(name, price)| (name.as_str(), *price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_ten_priced_items() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.items().all(|(_, p)| (10..=500).contains(&p)));
        assert_eq!(catalog.price_of("cup"), Some(20));
        assert_eq!(catalog.price_of("pink-hoody"), Some(500));
    }

    #[test]
    fn unknown_item_has_no_price() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.price_of("yacht"), None);
        assert_eq!(catalog.price_of("Cup"), None);
        assert_eq!(catalog.price_of(""), None);
    }

    #[test]
    fn from_prices_rejects_non_positive_and_blank_entries() {
        let zero = BTreeMap::from([("freebie".to_string(), 0)]);
        assert!(Catalog::from_prices(zero).is_err());

        let blank = BTreeMap::from([("  ".to_string(), 10)]);
        assert!(Catalog::from_prices(blank).is_err());

        assert!(Catalog::from_prices(BTreeMap::new()).is_err());
    }

    #[test]
    fn loads_catalog_from_json_file() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"sticker": 5, "mug": 25}"#).expect("write catalog");

        let catalog = Catalog::from_json_file(&path).expect("load catalog");
        let _ = std::fs::remove_file(&path);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.price_of("mug"), Some(25));
        assert_eq!(catalog.price_of("cup"), None);
    }
}

//! Product catalog and the fixed product-to-category table.
//!
//! The category table is a literal mapping: each category owns an explicit,
//! disjoint set of product ids and together they cover `1..=PRODUCT_COUNT`
//! exactly. Prices are drawn once per run by the generator and stay fixed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of products in the catalog (ids `1..=20`).
pub const PRODUCT_COUNT: u32 = 20;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Books,
    Home,
    Toys,
    Sports,
    Beauty,
}

/// Fixed ownership table: category -> product ids.
///
/// Deliberately non-uniform (`Toys` owns one product, `Electronics` five).
pub const CATEGORY_DISTRIBUTION: [(Category, &[u32]); 7] = [
    (Category::Electronics, &[1, 2, 3, 4, 5]),
    (Category::Clothing, &[6, 7]),
    (Category::Books, &[8, 9]),
    (Category::Home, &[10, 11, 12]),
    (Category::Toys, &[13]),
    (Category::Sports, &[14, 15, 16]),
    (Category::Beauty, &[17, 18, 19, 20]),
];

impl Category {
    /// All categories in table order.
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Clothing,
        Category::Books,
        Category::Home,
        Category::Toys,
        Category::Sports,
        Category::Beauty,
    ];

    /// Label written to the output artifacts.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronica",
            Category::Clothing => "Ropa",
            Category::Books => "Libros",
            Category::Home => "Hogar",
            Category::Toys => "Jugueteria",
            Category::Sports => "Deportes",
            Category::Beauty => "Belleza",
        }
    }

    /// Product ids owned by this category.
    pub fn product_ids(&self) -> &'static [u32] {
        CATEGORY_DISTRIBUTION
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, ids)| *ids)
            .unwrap_or(&[])
    }

    /// Look up the category that owns `product_id`.
    ///
    /// Returns `None` for ids outside the catalog.
    pub fn for_product(product_id: u32) -> Option<Category> {
        CATEGORY_DISTRIBUTION
            .iter()
            .find(|(_, ids)| ids.contains(&product_id))
            .map(|(category, _)| *category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|category| category.label() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category label: {}", s))
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: u32,
    pub price: f64,
    pub category: Category,
}

/// Product id -> fixed price and category, immutable for the run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    products: BTreeMap<u32, Product>,
}

impl Catalog {
    /// Build a catalog from prices listed in product-id order (`prices[0]` is product 1).
    ///
    /// Products without an entry in the category table are skipped.
    pub fn from_prices(prices: &[f64]) -> Self {
        let products = prices
            .iter()
            .enumerate()
            .filter_map(|(idx, &price)| {
                let product_id = idx as u32 + 1;
                Category::for_product(product_id).map(|category| {
                    (
                        product_id,
                        Product {
                            product_id,
                            price,
                            category,
                        },
                    )
                })
            })
            .collect();
        Self { products }
    }

    pub fn get(&self, product_id: u32) -> Option<&Product> {
        self.products.get(&product_id)
    }

    /// Product ids in ascending order.
    pub fn product_ids(&self) -> Vec<u32> {
        self.products.keys().copied().collect()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Round to two decimal places.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_distribution_covers_catalog_without_overlap() {
        let mut seen = HashSet::new();
        for (_, ids) in CATEGORY_DISTRIBUTION.iter() {
            for id in ids.iter() {
                assert!(seen.insert(*id), "product {} owned twice", id);
            }
        }
        let expected: HashSet<u32> = (1..=PRODUCT_COUNT).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_for_product_lookup() {
        assert_eq!(Category::for_product(1), Some(Category::Electronics));
        assert_eq!(Category::for_product(13), Some(Category::Toys));
        assert_eq!(Category::for_product(20), Some(Category::Beauty));
        assert_eq!(Category::for_product(0), None);
        assert_eq!(Category::for_product(21), None);
    }

    #[test]
    fn test_label_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
        assert!("Unknown".parse::<Category>().is_err());
    }

    #[test]
    fn test_catalog_from_prices() {
        let prices: Vec<f64> = (1..=PRODUCT_COUNT).map(|i| 5000.0 + i as f64).collect();
        let catalog = Catalog::from_prices(&prices);

        assert_eq!(catalog.len(), 20);
        let product = catalog.get(7).unwrap();
        assert_eq!(product.price, 5007.0);
        assert_eq!(product.category, Category::Clothing);
        assert!(catalog.get(21).is_none());
    }

    #[test]
    fn test_round_price() {
        assert_eq!(round_price(12345.678), 12345.68);
        assert_eq!(round_price(5000.0), 5000.0);
        assert_eq!(round_price(7777.774), 7777.77);
    }
}

//! The in-memory product list.
//!
//! [`Inventory`] owns the ordered records and is the only place where products
//! are created, changed or removed. Derived fields are recomputed on every
//! change, so readers never see a stale stock value or status produced here.

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::models::Product;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Orderings offered by [`Inventory::sort_by`]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SortCriterion {
    UnitPriceAscending,
    StockValueDescending,
}

/// Ordered collection of products keyed by a unique id
#[derive(Debug, Default, Clone)]
pub struct Inventory {
    products: Vec<Product>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps records read from storage without re-deriving any field.
    ///
    /// Only the first record for a given id is kept; later duplicates are
    /// dropped with a warning.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(products.len());
        for product in products {
            if seen.insert(product.id().to_string()) {
                kept.push(product);
            } else {
                warn!("Dropping duplicate product id '{}' from loaded data", product.id());
            }
        }
        Self { products: kept }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id() == id)
    }

    /// Adds a new product at the end of the list.
    pub fn create(
        &mut self,
        id: &str,
        name: &str,
        unit_price: i64,
        quantity: i64,
    ) -> LedgerResult<&Product> {
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.position(id).is_some() {
            return Err(ValidationError::DuplicateKey(id.to_string()).into());
        }
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if unit_price <= 0 {
            return Err(ValidationError::NonPositivePrice(unit_price).into());
        }
        if quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity(quantity).into());
        }

        let product = Product::with_derived(id.to_string(), name.to_string(), unit_price, quantity)?;
        info!("Created product '{}' ({})", product.id(), product.status());
        self.products.push(product);
        Ok(&self.products[self.products.len() - 1])
    }

    /// Looks up a product by its exact, case-sensitive id.
    pub fn find_by_id(&self, id: &str) -> LedgerResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// Changes price and/or quantity of an existing product in place.
    ///
    /// `None` keeps the current value. Both new values are validated before
    /// either is applied.
    pub fn update(
        &mut self,
        id: &str,
        new_unit_price: Option<i64>,
        new_quantity: Option<i64>,
    ) -> LedgerResult<&Product> {
        let index = self
            .position(id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        if let Some(price) = new_unit_price {
            if price <= 0 {
                return Err(ValidationError::NonPositivePrice(price).into());
            }
        }
        if let Some(quantity) = new_quantity {
            if quantity <= 0 {
                return Err(ValidationError::NonPositiveQuantity(quantity).into());
            }
        }

        let product = &mut self.products[index];
        let unit_price = new_unit_price.unwrap_or(product.unit_price());
        let quantity = new_quantity.unwrap_or(product.quantity());
        product.reprice(unit_price, quantity)?;
        debug!(
            "Updated product '{}': price={}, quantity={}, stock value={}",
            product.id(),
            product.unit_price(),
            product.quantity(),
            product.stock_value()
        );
        Ok(&self.products[index])
    }

    /// Removes a product and returns it. Remaining products keep their order.
    pub fn delete(&mut self, id: &str) -> LedgerResult<Product> {
        let index = self
            .position(id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let removed = self.products.remove(index);
        info!("Deleted product '{}'", removed.id());
        Ok(removed)
    }

    /// Case-insensitive substring search over id and name, in store order.
    pub fn search(&self, keyword: &str) -> LedgerResult<Vec<&Product>> {
        if keyword.trim().is_empty() {
            return Err(ValidationError::EmptyKeyword.into());
        }
        let needle = keyword.to_lowercase();
        let results: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.matches_lowercase(&needle))
            .collect();
        debug!("Search for '{keyword}' matched {} products", results.len());
        Ok(results)
    }

    /// Reorders the store in place. Equal keys keep their relative order.
    pub fn sort_by(&mut self, criterion: SortCriterion) {
        match criterion {
            SortCriterion::UnitPriceAscending => {
                self.products.sort_by_key(|p| p.unit_price());
            }
            SortCriterion::StockValueDescending => {
                self.products.sort_by(|a, b| b.stock_value().cmp(&a.stock_value()));
            }
        }
        debug!("Sorted {} products by {:?}", self.products.len(), criterion);
    }
}

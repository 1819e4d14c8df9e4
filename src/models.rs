use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantity at or below which a product needs restocking
pub const RESTOCK_THRESHOLD: i64 = 5;
/// Quantity above which a product counts as slow-moving
pub const SLOW_MOVING_THRESHOLD: i64 = 50;

/// Stock status of a product, derived from its quantity.
///
/// The serialized form is the label written to CSV/JSON files, so existing
/// data files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[serde(rename = "Cần nhập")]
    NeedsRestock,
    #[serde(rename = "Bình thường")]
    Normal,
    #[serde(rename = "Khó bán")]
    SlowMoving,
}

impl ProductStatus {
    /// Returns the label used in data files and on screen
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::NeedsRestock => "Cần nhập",
            ProductStatus::Normal => "Bình thường",
            ProductStatus::SlowMoving => "Khó bán",
        }
    }

    /// Returns all statuses in display order
    pub fn all() -> &'static [ProductStatus] {
        &[
            ProductStatus::NeedsRestock,
            ProductStatus::Normal,
            ProductStatus::SlowMoving,
        ]
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Computes the stock value of a product line.
///
/// Both inputs are re-checked, so the result is only ever produced for a
/// positive price and quantity.
pub fn derive_stock_value(unit_price: i64, quantity: i64) -> Result<i64, ValidationError> {
    if unit_price <= 0 {
        return Err(ValidationError::NonPositivePrice(unit_price));
    }
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity(quantity));
    }
    unit_price
        .checked_mul(quantity)
        .ok_or(ValidationError::StockValueOverflow)
}

/// Maps a quantity onto its stock status
pub fn derive_status(quantity: i64) -> ProductStatus {
    if quantity <= RESTOCK_THRESHOLD {
        ProductStatus::NeedsRestock
    } else if quantity > SLOW_MOVING_THRESHOLD {
        ProductStatus::SlowMoving
    } else {
        ProductStatus::Normal
    }
}

/// A single product record.
///
/// Field names on disk are the column names of the data files:
/// `masp, ten_sp, gia_ban, so_luong, gia_tri_ton, trang_thai`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "masp")]
    id: String,
    #[serde(rename = "ten_sp")]
    name: String,
    #[serde(rename = "gia_ban")]
    unit_price: i64,
    #[serde(rename = "so_luong")]
    quantity: i64,
    #[serde(rename = "gia_tri_ton")]
    stock_value: i64,
    #[serde(rename = "trang_thai")]
    status: ProductStatus,
}

impl Product {
    /// Builds a record with freshly derived fields. Inputs must already be validated
    /// except for the stock value overflow check.
    pub(crate) fn with_derived(
        id: String,
        name: String,
        unit_price: i64,
        quantity: i64,
    ) -> Result<Self, ValidationError> {
        let stock_value = derive_stock_value(unit_price, quantity)?;
        Ok(Self {
            id,
            name,
            unit_price,
            quantity,
            stock_value,
            status: derive_status(quantity),
        })
    }

    /// Replaces price and quantity and recomputes the derived fields.
    /// Nothing is changed if the new values are rejected.
    pub(crate) fn reprice(&mut self, unit_price: i64, quantity: i64) -> Result<(), ValidationError> {
        let stock_value = derive_stock_value(unit_price, quantity)?;
        self.unit_price = unit_price;
        self.quantity = quantity;
        self.stock_value = stock_value;
        self.status = derive_status(quantity);
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> i64 {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn stock_value(&self) -> i64 {
        self.stock_value
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    /// Returns true if the id or name contains `needle`, which must already be lowercase
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}

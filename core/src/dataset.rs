//! Record types for the input dataset, before and after cleaning.

use crate::types::Amount;
use serde::{Deserialize, Serialize};

// ── Column names of the transaction relation ─────────────────────────────────

pub const COL_BRAND_NAME: &str = "Brand Name";
pub const COL_OUTLET_ID: &str = "Outlet ID";
pub const COL_OUTLET_NAME: &str = "Outlet Name";
pub const COL_CENTER: &str = "Center";
pub const COL_PHONE_NUMBER: &str = "Phone Number";
pub const COL_AMOUNT: &str = "Cleaned Amount";

/// Every column the transaction relation must carry, in loader order.
pub const TRANSACTION_COLUMNS: [&str; 6] = [
    COL_BRAND_NAME,
    COL_OUTLET_ID,
    COL_OUTLET_NAME,
    COL_CENTER,
    COL_PHONE_NUMBER,
    COL_AMOUNT,
];

/// The amount cell as it arrived, before numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawAmount {
    Number(f64),
    Text(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub brand_name: String,
    pub outlet_id: String,
    pub outlet_name: String,
    pub center: String,
    pub phone_number: String,
    pub amount: RawAmount,
}

/// A transaction that survived cleaning. Amount is finite and > 0,
/// text fields are trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub brand_name: String,
    pub outlet_id: String,
    pub outlet_name: String,
    pub center: String,
    pub phone_number: String,
    pub amount: Amount,
}

impl From<&Transaction> for RawTransaction {
    fn from(t: &Transaction) -> Self {
        Self {
            brand_name: t.brand_name.clone(),
            outlet_id: t.outlet_id.clone(),
            outlet_name: t.outlet_name.clone(),
            center: t.center.clone(),
            phone_number: t.phone_number.clone(),
            amount: RawAmount::Number(t.amount),
        }
    }
}

/// An untyped relation carried through for collaborators outside the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuxiliaryTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub transactions: Vec<RawTransaction>,
    pub monthly_sales: Option<AuxiliaryTable>,
}

impl Dataset {
    pub fn from_transactions(transactions: Vec<RawTransaction>) -> Self {
        Self {
            transactions,
            monthly_sales: None,
        }
    }
}

//! Product shape published by the discount provider.
//!
//! Declared independently of [`crate::domain::product`] so the provider's
//! schema can evolve without touching the catalog. The two shapes only meet
//! in [`crate::convert`].

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountMoney {
    #[serde(default)]
    pub currency_code: String,
    #[serde(default)]
    pub units: i64,
    #[serde(default)]
    pub nanos: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountProduct {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture: String,
    #[serde(rename = "priceUsd", default)]
    pub price: Option<DiscountMoney>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub discount: u32,
}

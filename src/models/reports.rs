// src/models/reports.rs
//
// Formatos de resposta da API: entidades + agregados calculados na hora.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// 1. Listagem de grupos (cards)
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupSummary {
    pub id: Uuid,
    pub group_date: NaiveDate,
    pub owner: Uuid,
    pub count_products: i64,
    pub count_sold_sizes: i64,
    pub count_all_sizes: i64,
    pub group_spend: i64,
    pub products_income: i64,
    pub products_profit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SizeBrief {
    pub size: i32,
}

// 2. Produto dentro do detalhe do grupo
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub image: Option<String>,
    pub product_name: String,
    pub article: Option<String>,
    pub sizes: Vec<SizeBrief>,
    pub products_spend: i64,
    pub products_income: i64,
    pub products_profit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDetail {
    pub id: Uuid,
    pub group_date: NaiveDate,
    pub products: Vec<ProductSummary>,
}

// 3. Detalhe do produto
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitDetail {
    pub id: Uuid,
    pub size: i32,
    pub have: bool,
    pub high_price: Option<i32>,
    pub seller_id: Option<Uuid>,
    pub profit: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub id: Uuid,
    pub image: Option<String>,
    pub product_name: String,
    pub article: Option<String>,
    pub description: Option<String>,
    pub low_price: i32,
    pub sizes: Vec<UnitDetail>,
    pub created_date: DateTime<Utc>,
}

// 4. Histórico de vendas
#[derive(Debug, Serialize, ToSchema)]
pub struct SoldProductView {
    pub product_name: String,
    pub article: Option<String>,
    pub low_price: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerNameView {
    pub seller_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SoldUnitView {
    pub size: i32,
    pub high_price: Option<i32>,
    pub seller: Option<SellerNameView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryItemView {
    pub id: Uuid,
    pub product: SoldProductView,
    pub product_size: SoldUnitView,
    pub sold_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryView {
    pub user: Uuid,
    pub history_items: Vec<HistoryItemView>,
}

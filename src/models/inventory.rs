// src/models/inventory.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Vendedores ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Seller {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub seller_name: String,
}

// --- 2. Grupos (lote datado, único por dono + data) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Group {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub group_date: NaiveDate,
    pub created_date: DateTime<Utc>,
}

// --- 3. Produtos ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub group_id: Uuid,
    pub image: Option<String>,
    pub product_name: String,
    pub description: Option<String>,
    pub low_price: i32, // preço de compra
    pub article: Option<String>,
    pub created_date: DateTime<Utc>,
}

/// Campos editáveis de um produto.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub image: Option<String>,
    pub product_name: String,
    pub description: Option<String>,
    pub low_price: i32,
    pub article: Option<String>,
}

/// Produto + dono da cadeia (groups.owner_id), o necessário para validar uma unidade.
#[derive(Debug, Clone, FromRow)]
pub struct ProductContext {
    pub id: Uuid,
    pub group_id: Uuid,
    pub owner_id: Uuid,
    pub low_price: i32,
}

// --- 4. Unidades (ProductSize) ---
// `have = true` significa "em estoque"; `false` significa vendida.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductSize {
    pub id: Uuid,
    pub product_id: Uuid,
    pub size: i32,
    pub have: bool,
    pub high_price: Option<i32>, // preço de venda
    pub seller_id: Option<Uuid>,
    pub sold_date: DateTime<Utc>,
}

/// Estado gravável de uma unidade (criação e PUT substituem todos estes campos).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitState {
    pub size: i32,
    pub have: bool,
    pub high_price: Option<i32>,
    pub seller_id: Option<Uuid>,
}

impl From<&ProductSize> for UnitState {
    fn from(unit: &ProductSize) -> Self {
        Self {
            size: unit.size,
            have: unit.have,
            high_price: unit.high_price,
            seller_id: unit.seller_id,
        }
    }
}

// --- 5. Histórico de vendas ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct History {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoryItem {
    pub id: Uuid,
    pub history_id: Uuid,
    pub product_id: Uuid,
    pub product_size_id: Uuid,
    pub sold_date: DateTime<Utc>,
}

// Linha achatada usada na listagem do histórico (JOIN produto/unidade/vendedor).
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: Uuid,
    pub sold_date: DateTime<Utc>,
    pub product_name: String,
    pub article: Option<String>,
    pub low_price: i32,
    pub size: i32,
    pub high_price: Option<i32>,
    pub seller_name: Option<String>,
}

// src/db/memory_store.rs
//
// `InventoryStore` em memória para os testes do caminho de escrita.
// `begin` copia o estado; só `commit` o publica, imitando uma transação.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::InventoryStore,
    models::inventory::{
        Group, History, HistoryItem, Product, ProductContext, ProductFields, ProductSize, Seller,
        UnitState,
    },
};

#[derive(Debug, Clone, Default)]
pub struct MemoryData {
    pub groups: HashMap<Uuid, Group>,
    pub products: HashMap<Uuid, Product>,
    pub units: HashMap<Uuid, ProductSize>,
    pub sellers: HashMap<Uuid, Seller>,
    pub histories: HashMap<Uuid, History>,
    pub history_items: Vec<HistoryItem>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub data: MemoryData,
    /// Faz toda escrita de histórico falhar (simula erro do banco).
    pub fail_history_writes: bool,
}

pub struct MemoryTx {
    data: MemoryData,
    fail_history_writes: bool,
}

impl MemoryStore {
    pub fn begin(&self) -> MemoryTx {
        MemoryTx {
            data: self.data.clone(),
            fail_history_writes: self.fail_history_writes,
        }
    }

    pub fn commit(&mut self, tx: MemoryTx) {
        self.data = tx.data;
    }

    // --- Sementes ---

    pub fn seed_group(&mut self, owner_id: Uuid, group_date: NaiveDate) -> Group {
        let group = Group {
            id: Uuid::new_v4(),
            owner_id,
            group_date,
            created_date: Utc::now(),
        };
        self.data.groups.insert(group.id, group.clone());
        group
    }

    pub fn seed_product(&mut self, group_id: Uuid, low_price: i32) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            group_id,
            image: None,
            product_name: "Sneaker".into(),
            description: None,
            low_price,
            article: None,
            created_date: Utc::now(),
        };
        self.data.products.insert(product.id, product.clone());
        product
    }

    pub fn seed_seller(&mut self, owner_id: Uuid, seller_name: &str) -> Seller {
        let seller = Seller {
            id: Uuid::new_v4(),
            owner_id,
            seller_name: seller_name.into(),
        };
        self.data.sellers.insert(seller.id, seller.clone());
        seller
    }

    // --- Consultas ---

    pub fn history_items_of(&self, owner_id: Uuid) -> Vec<&HistoryItem> {
        let Some(history) = self.data.histories.values().find(|h| h.user_id == owner_id) else {
            return Vec::new();
        };
        self.data
            .history_items
            .iter()
            .filter(|i| i.history_id == history.id)
            .collect()
    }

    pub fn history_items_for_unit(&self, owner_id: Uuid, unit_id: Uuid) -> usize {
        self.history_items_of(owner_id)
            .into_iter()
            .filter(|i| i.product_size_id == unit_id)
            .count()
    }

    pub fn unit(&self, unit_id: Uuid) -> Option<&ProductSize> {
        self.data.units.get(&unit_id)
    }
}

impl MemoryTx {
    fn context(&self, product_id: Uuid) -> Option<ProductContext> {
        let product = self.data.products.get(&product_id)?;
        let group = self.data.groups.get(&product.group_id)?;
        Some(ProductContext {
            id: product.id,
            group_id: group.id,
            owner_id: group.owner_id,
            low_price: product.low_price,
        })
    }

    fn check_history_writable(&self) -> Result<(), AppError> {
        if self.fail_history_writes {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "history table unavailable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for MemoryTx {
    async fn find_group(&mut self, group_id: Uuid) -> Result<Option<Group>, AppError> {
        Ok(self.data.groups.get(&group_id).cloned())
    }

    async fn insert_group(&mut self, owner_id: Uuid, group_date: NaiveDate) -> Result<Group, AppError> {
        let taken = self
            .data
            .groups
            .values()
            .any(|g| g.owner_id == owner_id && g.group_date == group_date);
        if taken {
            return Err(AppError::GroupDateAlreadyExists);
        }
        let group = Group {
            id: Uuid::new_v4(),
            owner_id,
            group_date,
            created_date: Utc::now(),
        };
        self.data.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_product(&mut self, product_id: Uuid) -> Result<Option<ProductContext>, AppError> {
        Ok(self.context(product_id))
    }

    async fn lock_product(&mut self, product_id: Uuid) -> Result<Option<ProductContext>, AppError> {
        Ok(self.context(product_id))
    }

    async fn insert_product(&mut self, group_id: Uuid, fields: &ProductFields) -> Result<Product, AppError> {
        let product = Product {
            id: Uuid::new_v4(),
            group_id,
            image: fields.image.clone(),
            product_name: fields.product_name.clone(),
            description: fields.description.clone(),
            low_price: fields.low_price,
            article: fields.article.clone(),
            created_date: Utc::now(),
        };
        self.data.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&mut self, product_id: Uuid, fields: &ProductFields) -> Result<Product, AppError> {
        let product = self
            .data
            .products
            .get_mut(&product_id)
            .ok_or(AppError::ProductNotFound)?;
        product.image = fields.image.clone();
        product.product_name = fields.product_name.clone();
        product.description = fields.description.clone();
        product.low_price = fields.low_price;
        product.article = fields.article.clone();
        Ok(product.clone())
    }

    async fn lowest_sale_price(&mut self, product_id: Uuid) -> Result<Option<i32>, AppError> {
        Ok(self
            .data
            .units
            .values()
            .filter(|u| u.product_id == product_id)
            .filter_map(|u| u.high_price)
            .min())
    }

    async fn find_seller(&mut self, seller_id: Uuid) -> Result<Option<Seller>, AppError> {
        Ok(self.data.sellers.get(&seller_id).cloned())
    }

    async fn lock_unit(&mut self, unit_id: Uuid) -> Result<Option<ProductSize>, AppError> {
        Ok(self.data.units.get(&unit_id).cloned())
    }

    async fn insert_unit(&mut self, product_id: Uuid, state: &UnitState) -> Result<ProductSize, AppError> {
        let unit = ProductSize {
            id: Uuid::new_v4(),
            product_id,
            size: state.size,
            have: state.have,
            high_price: state.high_price,
            seller_id: state.seller_id,
            sold_date: Utc::now(),
        };
        self.data.units.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn update_unit(&mut self, unit_id: Uuid, state: &UnitState) -> Result<ProductSize, AppError> {
        let unit = self
            .data
            .units
            .get_mut(&unit_id)
            .ok_or(AppError::UnitNotFound)?;
        unit.size = state.size;
        unit.have = state.have;
        unit.high_price = state.high_price;
        unit.seller_id = state.seller_id;
        unit.sold_date = Utc::now();
        Ok(unit.clone())
    }

    async fn find_or_create_history(&mut self, owner_id: Uuid) -> Result<History, AppError> {
        self.check_history_writable()?;
        if let Some(history) = self.data.histories.values().find(|h| h.user_id == owner_id) {
            return Ok(history.clone());
        }
        let history = History {
            id: Uuid::new_v4(),
            user_id: owner_id,
        };
        self.data.histories.insert(history.id, history.clone());
        Ok(history)
    }

    async fn append_history_item(
        &mut self,
        history_id: Uuid,
        product_id: Uuid,
        unit_id: Uuid,
    ) -> Result<HistoryItem, AppError> {
        self.check_history_writable()?;
        let item = HistoryItem {
            id: Uuid::new_v4(),
            history_id,
            product_id,
            product_size_id: unit_id,
            sold_date: Utc::now(),
        };
        self.data.history_items.push(item.clone());
        Ok(item)
    }

    async fn remove_history_items(&mut self, owner_id: Uuid, unit_id: Uuid) -> Result<u64, AppError> {
        self.check_history_writable()?;
        let history_ids: Vec<Uuid> = self
            .data
            .histories
            .values()
            .filter(|h| h.user_id == owner_id)
            .map(|h| h.id)
            .collect();
        let before = self.data.history_items.len();
        self.data
            .history_items
            .retain(|i| !(history_ids.contains(&i.history_id) && i.product_size_id == unit_id));
        Ok((before - self.data.history_items.len()) as u64)
    }
}

// src/db/store.rs
//
// Interface transacional usada pelo caminho de escrita do estoque.
// Cada instância representa UMA transação aberta: ou tudo é gravado (commit), ou nada.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{inventory_repo::RowLock, InventoryRepository},
    models::inventory::{
        Group, History, HistoryItem, Product, ProductContext, ProductFields, ProductSize, Seller,
        UnitState,
    },
};

#[async_trait]
pub trait InventoryStore: Send {
    async fn find_group(&mut self, group_id: Uuid) -> Result<Option<Group>, AppError>;

    /// Deve falhar com `GroupDateAlreadyExists` se (dono, data) já existir.
    async fn insert_group(&mut self, owner_id: Uuid, group_date: NaiveDate) -> Result<Group, AppError>;

    /// Lê o produto em modo compartilhado (bloqueia mudanças de preço concorrentes).
    async fn find_product(&mut self, product_id: Uuid) -> Result<Option<ProductContext>, AppError>;

    /// Lê o produto em modo exclusivo (antes de alterar o preço de compra).
    async fn lock_product(&mut self, product_id: Uuid) -> Result<Option<ProductContext>, AppError>;

    async fn insert_product(&mut self, group_id: Uuid, fields: &ProductFields) -> Result<Product, AppError>;

    async fn update_product(&mut self, product_id: Uuid, fields: &ProductFields) -> Result<Product, AppError>;

    async fn lowest_sale_price(&mut self, product_id: Uuid) -> Result<Option<i32>, AppError>;

    /// Lê o vendedor e impede que ele seja apagado até o fim da transação.
    async fn find_seller(&mut self, seller_id: Uuid) -> Result<Option<Seller>, AppError>;

    /// Lê a unidade e a trava até o fim da transação.
    async fn lock_unit(&mut self, unit_id: Uuid) -> Result<Option<ProductSize>, AppError>;

    async fn insert_unit(&mut self, product_id: Uuid, state: &UnitState) -> Result<ProductSize, AppError>;

    async fn update_unit(&mut self, unit_id: Uuid, state: &UnitState) -> Result<ProductSize, AppError>;

    async fn find_or_create_history(&mut self, owner_id: Uuid) -> Result<History, AppError>;

    async fn append_history_item(
        &mut self,
        history_id: Uuid,
        product_id: Uuid,
        unit_id: Uuid,
    ) -> Result<HistoryItem, AppError>;

    /// Remove todas as entradas da unidade no histórico do dono; devolve quantas.
    async fn remove_history_items(&mut self, owner_id: Uuid, unit_id: Uuid) -> Result<u64, AppError>;
}

// ---
// Implementação PostgreSQL
// ---

pub struct PgInventoryStore {
    tx: Transaction<'static, Postgres>,
    repo: InventoryRepository,
}

impl PgInventoryStore {
    pub async fn begin(pool: &PgPool, repo: InventoryRepository) -> Result<Self, AppError> {
        let tx = pool.begin().await?;
        Ok(Self { tx, repo })
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn find_group(&mut self, group_id: Uuid) -> Result<Option<Group>, AppError> {
        self.repo.find_group(&mut *self.tx, group_id).await
    }

    async fn insert_group(&mut self, owner_id: Uuid, group_date: NaiveDate) -> Result<Group, AppError> {
        self.repo.insert_group(&mut *self.tx, owner_id, group_date).await
    }

    async fn find_product(&mut self, product_id: Uuid) -> Result<Option<ProductContext>, AppError> {
        self.repo.find_product_context(&mut *self.tx, product_id, RowLock::Share).await
    }

    async fn lock_product(&mut self, product_id: Uuid) -> Result<Option<ProductContext>, AppError> {
        self.repo.find_product_context(&mut *self.tx, product_id, RowLock::Exclusive).await
    }

    async fn insert_product(&mut self, group_id: Uuid, fields: &ProductFields) -> Result<Product, AppError> {
        self.repo.insert_product(&mut *self.tx, group_id, fields).await
    }

    async fn update_product(&mut self, product_id: Uuid, fields: &ProductFields) -> Result<Product, AppError> {
        self.repo.update_product(&mut *self.tx, product_id, fields).await
    }

    async fn lowest_sale_price(&mut self, product_id: Uuid) -> Result<Option<i32>, AppError> {
        self.repo.lowest_sale_price(&mut *self.tx, product_id).await
    }

    async fn find_seller(&mut self, seller_id: Uuid) -> Result<Option<Seller>, AppError> {
        self.repo.lock_seller_shared(&mut *self.tx, seller_id).await
    }

    async fn lock_unit(&mut self, unit_id: Uuid) -> Result<Option<ProductSize>, AppError> {
        self.repo.lock_unit(&mut *self.tx, unit_id).await
    }

    async fn insert_unit(&mut self, product_id: Uuid, state: &UnitState) -> Result<ProductSize, AppError> {
        self.repo.insert_unit(&mut *self.tx, product_id, state).await
    }

    async fn update_unit(&mut self, unit_id: Uuid, state: &UnitState) -> Result<ProductSize, AppError> {
        self.repo.update_unit(&mut *self.tx, unit_id, state).await
    }

    async fn find_or_create_history(&mut self, owner_id: Uuid) -> Result<History, AppError> {
        self.repo.find_or_create_history(&mut *self.tx, owner_id).await
    }

    async fn append_history_item(
        &mut self,
        history_id: Uuid,
        product_id: Uuid,
        unit_id: Uuid,
    ) -> Result<HistoryItem, AppError> {
        self.repo
            .insert_history_item(&mut *self.tx, history_id, product_id, unit_id)
            .await
    }

    async fn remove_history_items(&mut self, owner_id: Uuid, unit_id: Uuid) -> Result<u64, AppError> {
        self.repo.delete_history_items(&mut *self.tx, owner_id, unit_id).await
    }
}

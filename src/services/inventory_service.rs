// src/services/inventory_service.rs

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        inventory_repo::{GroupFilter, RowLock},
        InventoryRepository, PgInventoryStore,
    },
    models::{
        inventory::{Group, Product, ProductContext, ProductFields, ProductSize, Seller, UnitState},
        reports::{GroupDetail, GroupSummary, HistoryView, ProductDetail},
    },
    services::{
        reports::{self, ProductStock},
        stock::{self, ensure_owner, UnitWrite},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self { inventory_repo }
    }

    async fn begin(&self) -> Result<PgInventoryStore, AppError> {
        PgInventoryStore::begin(self.inventory_repo.pool(), self.inventory_repo.clone()).await
    }

    // Grupo/vendedor de outro dono responde como inexistente.
    async fn owned_group(&self, actor_id: Uuid, group_id: Uuid) -> Result<Group, AppError> {
        match self.inventory_repo.find_group(self.inventory_repo.pool(), group_id).await? {
            Some(group) if group.owner_id == actor_id => Ok(group),
            _ => Err(AppError::GroupNotFound),
        }
    }

    async fn owned_seller(&self, actor_id: Uuid, seller_id: Uuid) -> Result<Seller, AppError> {
        match self.inventory_repo.find_seller(self.inventory_repo.pool(), seller_id).await? {
            Some(seller) if seller.owner_id == actor_id => Ok(seller),
            _ => Err(AppError::SellerNotFound),
        }
    }

    async fn product_context(&self, actor_id: Uuid, product_id: Uuid) -> Result<ProductContext, AppError> {
        let ctx = self
            .inventory_repo
            .find_product_context(self.inventory_repo.pool(), product_id, RowLock::None)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        ensure_owner(actor_id, ctx.owner_id)?;
        Ok(ctx)
    }

    // ---
    // Grupos
    // ---

    /// Sem data explícita, o grupo é do dia corrente (UTC).
    pub async fn create_group(&self, actor_id: Uuid, group_date: Option<NaiveDate>) -> Result<Group, AppError> {
        let today = Utc::now().date_naive();
        let mut store = self.begin().await?;
        let group = stock::create_group(&mut store, actor_id, group_date.unwrap_or(today), today).await?;
        store.commit().await?;

        tracing::info!(group_id = %group.id, group_date = %group.group_date, "grupo criado");
        Ok(group)
    }

    pub async fn list_groups(&self, actor_id: Uuid, filter: &GroupFilter) -> Result<Vec<GroupSummary>, AppError> {
        let pool = self.inventory_repo.pool();
        let groups = self.inventory_repo.list_groups(pool, actor_id, filter).await?;

        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let products = self.inventory_repo.list_products_for_groups(pool, &group_ids).await?;

        let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let units = self.inventory_repo.list_units_for_products(pool, &product_ids).await?;

        Ok(reports::assemble(groups, products, units)
            .iter()
            .map(reports::group_summary)
            .collect())
    }

    pub async fn group_detail(&self, actor_id: Uuid, group_id: Uuid) -> Result<GroupDetail, AppError> {
        let group = self.owned_group(actor_id, group_id).await?;
        let pool = self.inventory_repo.pool();

        let products = self.inventory_repo.list_products_for_groups(pool, &[group.id]).await?;
        let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let units = self.inventory_repo.list_units_for_products(pool, &product_ids).await?;

        reports::assemble(vec![group], products, units)
            .first()
            .map(reports::group_detail)
            .ok_or(AppError::GroupNotFound)
    }

    /// Apaga o grupo com produtos, unidades e entradas de histórico (cascata no banco).
    pub async fn delete_group(&self, actor_id: Uuid, group_id: Uuid) -> Result<(), AppError> {
        self.owned_group(actor_id, group_id).await?;
        if self.inventory_repo.delete_group(self.inventory_repo.pool(), group_id).await? == 0 {
            return Err(AppError::GroupNotFound);
        }
        tracing::info!(group_id = %group_id, "grupo removido");
        Ok(())
    }

    // ---
    // Produtos
    // ---

    pub async fn create_product(
        &self,
        actor_id: Uuid,
        group_id: Uuid,
        fields: &ProductFields,
    ) -> Result<Product, AppError> {
        let mut store = self.begin().await?;
        let product = stock::create_product(&mut store, actor_id, group_id, fields).await?;
        store.commit().await?;

        tracing::info!(product_id = %product.id, group_id = %group_id, "produto criado");
        Ok(product)
    }

    pub async fn product_detail(&self, actor_id: Uuid, product_id: Uuid) -> Result<ProductDetail, AppError> {
        self.product_context(actor_id, product_id).await?;
        let pool = self.inventory_repo.pool();

        let product = self
            .inventory_repo
            .find_product(pool, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        let units = self.inventory_repo.list_units_for_products(pool, &[product_id]).await?;

        Ok(reports::product_detail(&ProductStock { product, units }))
    }

    pub async fn update_product(
        &self,
        actor_id: Uuid,
        product_id: Uuid,
        fields: &ProductFields,
    ) -> Result<ProductDetail, AppError> {
        let mut store = self.begin().await?;
        stock::update_product(&mut store, actor_id, product_id, fields).await?;
        store.commit().await?;

        self.product_detail(actor_id, product_id).await
    }

    pub async fn delete_product(&self, actor_id: Uuid, product_id: Uuid) -> Result<(), AppError> {
        self.product_context(actor_id, product_id).await?;
        if self.inventory_repo.delete_product(self.inventory_repo.pool(), product_id).await? == 0 {
            return Err(AppError::ProductNotFound);
        }
        tracing::info!(product_id = %product_id, "produto removido");
        Ok(())
    }

    // ---
    // Unidades
    // ---

    async fn write_unit(&self, actor_id: Uuid, write: UnitWrite) -> Result<ProductSize, AppError> {
        let mut store = self.begin().await?;
        let outcome = stock::apply_unit_write(&mut store, actor_id, write).await?;
        store.commit().await?;

        tracing::info!(unit_id = %outcome.unit.id, edge = ?outcome.edge, "unidade salva");
        Ok(outcome.unit)
    }

    pub async fn create_unit(
        &self,
        actor_id: Uuid,
        product_id: Uuid,
        state: UnitState,
    ) -> Result<ProductSize, AppError> {
        self.write_unit(actor_id, UnitWrite::Create { product_id, state }).await
    }

    pub async fn update_unit(
        &self,
        actor_id: Uuid,
        unit_id: Uuid,
        state: UnitState,
    ) -> Result<ProductSize, AppError> {
        self.write_unit(actor_id, UnitWrite::Update { unit_id, state }).await
    }

    pub async fn get_unit(&self, actor_id: Uuid, unit_id: Uuid) -> Result<ProductSize, AppError> {
        let unit = self
            .inventory_repo
            .find_unit(self.inventory_repo.pool(), unit_id)
            .await?
            .ok_or(AppError::UnitNotFound)?;
        self.product_context(actor_id, unit.product_id).await?;
        Ok(unit)
    }

    /// As entradas de histórico da unidade somem junto (cascata).
    pub async fn delete_unit(&self, actor_id: Uuid, unit_id: Uuid) -> Result<(), AppError> {
        self.get_unit(actor_id, unit_id).await?;
        if self.inventory_repo.delete_unit(self.inventory_repo.pool(), unit_id).await? == 0 {
            return Err(AppError::UnitNotFound);
        }
        tracing::info!(unit_id = %unit_id, "unidade removida");
        Ok(())
    }

    // ---
    // Vendedores
    // ---

    pub async fn list_sellers(&self, actor_id: Uuid) -> Result<Vec<Seller>, AppError> {
        self.inventory_repo.list_sellers(self.inventory_repo.pool(), actor_id).await
    }

    pub async fn create_seller(&self, actor_id: Uuid, seller_name: &str) -> Result<Seller, AppError> {
        self.inventory_repo
            .insert_seller(self.inventory_repo.pool(), actor_id, seller_name)
            .await
    }

    pub async fn get_seller(&self, actor_id: Uuid, seller_id: Uuid) -> Result<Seller, AppError> {
        self.owned_seller(actor_id, seller_id).await
    }

    pub async fn rename_seller(&self, actor_id: Uuid, seller_id: Uuid, seller_name: &str) -> Result<Seller, AppError> {
        self.owned_seller(actor_id, seller_id).await?;
        self.inventory_repo
            .rename_seller(self.inventory_repo.pool(), seller_id, seller_name)
            .await
    }

    /// Unidades que apontavam para o vendedor ficam sem vendedor.
    pub async fn delete_seller(&self, actor_id: Uuid, seller_id: Uuid) -> Result<(), AppError> {
        self.owned_seller(actor_id, seller_id).await?;
        if self.inventory_repo.delete_seller(self.inventory_repo.pool(), seller_id).await? == 0 {
            return Err(AppError::SellerNotFound);
        }
        Ok(())
    }

    // ---
    // Histórico
    // ---

    pub async fn history(
        &self,
        actor_id: Uuid,
        sold_from: Option<NaiveDate>,
        sold_until: Option<NaiveDate>,
    ) -> Result<HistoryView, AppError> {
        let rows = self
            .inventory_repo
            .list_history(self.inventory_repo.pool(), actor_id, sold_from, sold_until)
            .await?;
        Ok(reports::history_view(actor_id, rows))
    }
}

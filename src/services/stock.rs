// src/services/stock.rs
//
// Caminho de escrita do estoque. Toda mudança de `have` passa por `apply_unit_write`:
// valida -> grava -> compara have antigo/novo -> espelha no histórico,
// tudo dentro da mesma transação do `InventoryStore`.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::InventoryStore,
    models::inventory::{Group, Product, ProductFields, ProductSize, UnitState},
};

/// Só o dono da cadeia (grupo -> produto -> unidade) pode escrever nela.
pub fn ensure_owner(actor_id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
    if actor_id != owner_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn validate_group_date(group_date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if group_date > today {
        return Err(AppError::FutureGroupDate);
    }
    Ok(())
}

/// Invariantes da unidade: vendida exige preço; preço nunca abaixo do custo.
pub fn validate_unit(state: &UnitState, low_price: i32) -> Result<(), AppError> {
    if !state.have && state.high_price.is_none() {
        return Err(AppError::MissingSalePrice);
    }
    if let Some(high_price) = state.high_price {
        if high_price < low_price {
            return Err(AppError::PriceBelowCost {
                high_price,
                low_price,
            });
        }
    }
    Ok(())
}

/// Transição de `have` observada numa escrita.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEdge {
    /// true -> false
    Sold,
    /// false -> true
    Restocked,
    Unchanged,
}

impl HistoryEdge {
    pub fn between(previous_have: bool, new_have: bool) -> Self {
        match (previous_have, new_have) {
            (true, false) => Self::Sold,
            (false, true) => Self::Restocked,
            _ => Self::Unchanged,
        }
    }
}

#[derive(Debug, Clone)]
pub enum UnitWrite {
    Create { product_id: Uuid, state: UnitState },
    Update { unit_id: Uuid, state: UnitState },
}

#[derive(Debug, Clone)]
pub struct UnitWriteOutcome {
    pub unit: ProductSize,
    pub edge: HistoryEdge,
}

pub async fn apply_unit_write<S>(
    store: &mut S,
    actor_id: Uuid,
    write: UnitWrite,
) -> Result<UnitWriteOutcome, AppError>
where
    S: InventoryStore + ?Sized,
{
    // 1. Resolve a unidade anterior (travada) e o produto dono
    let (product_id, previous, state) = match write {
        UnitWrite::Create { product_id, state } => (product_id, None, state),
        UnitWrite::Update { unit_id, state } => {
            let unit = store
                .lock_unit(unit_id)
                .await?
                .ok_or(AppError::UnitNotFound)?;
            (unit.product_id, Some(unit), state)
        }
    };

    let product = store
        .find_product(product_id)
        .await?
        .ok_or(AppError::ProductNotFound)?;
    ensure_owner(actor_id, product.owner_id)?;

    // Vendedor de outro dono é tratado como inexistente.
    if let Some(seller_id) = state.seller_id {
        match store.find_seller(seller_id).await? {
            Some(seller) if seller.owner_id == actor_id => {}
            _ => return Err(AppError::SellerNotFound),
        }
    }

    // 2. Valida antes de qualquer gravação
    validate_unit(&state, product.low_price)?;

    // 3. Grava. Unidade nova nasce "em estoque", então criar já vendida conta como venda.
    let previous_have = previous.as_ref().map_or(true, |u| u.have);
    let unit = match previous {
        Some(old) => store.update_unit(old.id, &state).await?,
        None => store.insert_unit(product.id, &state).await?,
    };

    // 4. Espelha no histórico
    let edge = HistoryEdge::between(previous_have, unit.have);
    mirror_history(store, product.owner_id, &unit, edge).await?;

    tracing::debug!(
        unit_id = %unit.id,
        product_id = %unit.product_id,
        ?edge,
        "unidade gravada"
    );

    Ok(UnitWriteOutcome { unit, edge })
}

async fn mirror_history<S>(
    store: &mut S,
    owner_id: Uuid,
    unit: &ProductSize,
    edge: HistoryEdge,
) -> Result<(), AppError>
where
    S: InventoryStore + ?Sized,
{
    match edge {
        HistoryEdge::Sold => {
            let history = store.find_or_create_history(owner_id).await?;
            store
                .append_history_item(history.id, unit.product_id, unit.id)
                .await?;
        }
        HistoryEdge::Restocked => {
            let removed = store.remove_history_items(owner_id, unit.id).await?;
            if removed > 1 {
                tracing::warn!(
                    unit_id = %unit.id,
                    removed,
                    "histórico tinha entradas duplicadas para a unidade"
                );
            }
        }
        HistoryEdge::Unchanged => {}
    }
    Ok(())
}

// ---
// Grupos e produtos
// ---

pub async fn create_group<S>(
    store: &mut S,
    actor_id: Uuid,
    group_date: NaiveDate,
    today: NaiveDate,
) -> Result<Group, AppError>
where
    S: InventoryStore + ?Sized,
{
    validate_group_date(group_date, today)?;
    store.insert_group(actor_id, group_date).await
}

pub async fn create_product<S>(
    store: &mut S,
    actor_id: Uuid,
    group_id: Uuid,
    fields: &ProductFields,
) -> Result<Product, AppError>
where
    S: InventoryStore + ?Sized,
{
    // Grupo alheio é tratado como inexistente.
    match store.find_group(group_id).await? {
        Some(group) if group.owner_id == actor_id => {}
        _ => return Err(AppError::GroupNotFound),
    }
    store.insert_product(group_id, fields).await
}

/// Atualiza o produto; recusa subir o custo acima de um preço de venda já registrado.
pub async fn update_product<S>(
    store: &mut S,
    actor_id: Uuid,
    product_id: Uuid,
    fields: &ProductFields,
) -> Result<Product, AppError>
where
    S: InventoryStore + ?Sized,
{
    let product = store
        .lock_product(product_id)
        .await?
        .ok_or(AppError::ProductNotFound)?;
    ensure_owner(actor_id, product.owner_id)?;

    if let Some(lowest) = store.lowest_sale_price(product_id).await? {
        if lowest < fields.low_price {
            return Err(AppError::PriceBelowCost {
                high_price: lowest,
                low_price: fields.low_price,
            });
        }
    }

    store.update_product(product_id, fields).await
}

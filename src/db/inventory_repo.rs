// src/db/inventory_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{
        Group, History, HistoryItem, HistoryRow, Product, ProductContext, ProductFields,
        ProductSize, Seller, UnitState,
    },
};

/// Ordenações aceitas na listagem de grupos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupOrdering {
    GroupDate,
    #[default]
    GroupDateDesc,
    CreatedDate,
    CreatedDateDesc,
}

impl GroupOrdering {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "group_date" => Some(Self::GroupDate),
            "-group_date" => Some(Self::GroupDateDesc),
            "created_date" => Some(Self::CreatedDate),
            "-created_date" => Some(Self::CreatedDateDesc),
            _ => None,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::GroupDate => "g.group_date ASC",
            Self::GroupDateDesc => "g.group_date DESC",
            Self::CreatedDate => "g.created_date ASC",
            Self::CreatedDateDesc => "g.created_date DESC",
        }
    }
}

/// Filtros da listagem de grupos.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    /// Só grupos com uma unidade EM ESTOQUE deste tamanho.
    pub size: Option<i32>,
    /// Só grupos com alguma unidade neste estado.
    pub have: Option<bool>,
    /// Trecho do nome de um produto (case-insensitive).
    pub search: Option<String>,
    pub ordering: GroupOrdering,
}

/// Trava de linha pedida junto com a leitura.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLock {
    None,
    Share,
    Exclusive,
}

/// Escapa curingas do LIKE para que a busca seja literal.
pub fn like_pattern(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

// Vendedor apagado entre a checagem e a gravação da unidade
fn map_unit_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation()
            && db_err.constraint().is_some_and(|c| c.contains("seller_id"))
        {
            return AppError::SellerNotFound;
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ---
    // Grupos
    // ---

    pub async fn find_group<'e, E>(&self, executor: E, group_id: Uuid) -> Result<Option<Group>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_optional(executor)
            .await?;
        Ok(group)
    }

    pub async fn insert_group<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        group_date: NaiveDate,
    ) -> Result<Group, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Group>(
            "INSERT INTO groups (owner_id, group_date) VALUES ($1, $2) RETURNING *",
        )
        .bind(owner_id)
        .bind(group_date)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if unique_violation(&e) {
                return AppError::GroupDateAlreadyExists;
            }
            e.into()
        })
    }

    pub async fn list_groups<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        filter: &GroupFilter,
    ) -> Result<Vec<Group>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Parâmetros NULL desligam o respectivo filtro.
        let sql = format!(
            r#"
            SELECT g.* FROM groups g
            WHERE g.owner_id = $1
              AND ($2::INTEGER IS NULL OR EXISTS (
                    SELECT 1 FROM products p JOIN product_sizes s ON s.product_id = p.id
                    WHERE p.group_id = g.id AND s.size = $2 AND s.have))
              AND ($3::BOOLEAN IS NULL OR EXISTS (
                    SELECT 1 FROM products p JOIN product_sizes s ON s.product_id = p.id
                    WHERE p.group_id = g.id AND s.have = $3))
              AND ($4::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM products p
                    WHERE p.group_id = g.id AND p.product_name ILIKE $4))
            ORDER BY {}
            "#,
            filter.ordering.sql()
        );

        let groups = sqlx::query_as::<_, Group>(&sql)
            .bind(owner_id)
            .bind(filter.size)
            .bind(filter.have)
            .bind(filter.search.as_deref().map(like_pattern))
            .fetch_all(executor)
            .await?;
        Ok(groups)
    }

    pub async fn delete_group<'e, E>(&self, executor: E, group_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Produtos
    // ---

    pub async fn find_product<'e, E>(&self, executor: E, product_id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Produto + dono do grupo.
    pub async fn find_product_context<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        lock: RowLock,
    ) -> Result<Option<ProductContext>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lock = match lock {
            RowLock::None => "",
            RowLock::Share => "FOR SHARE OF p",
            RowLock::Exclusive => "FOR UPDATE OF p",
        };
        let sql = format!(
            r#"
            SELECT p.id, p.group_id, g.owner_id, p.low_price
            FROM products p
            JOIN groups g ON g.id = p.group_id
            WHERE p.id = $1
            {lock}
            "#
        );
        let ctx = sqlx::query_as::<_, ProductContext>(&sql)
            .bind(product_id)
            .fetch_optional(executor)
            .await?;
        Ok(ctx)
    }

    pub async fn list_products_for_groups<'e, E>(
        &self,
        executor: E,
        group_ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE group_id = ANY($1) ORDER BY product_name DESC",
        )
        .bind(group_ids)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn insert_product<'e, E>(
        &self,
        executor: E,
        group_id: Uuid,
        fields: &ProductFields,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (group_id, image, product_name, description, low_price, article)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(group_id)
        .bind(&fields.image)
        .bind(&fields.product_name)
        .bind(&fields.description)
        .bind(fields.low_price)
        .bind(&fields.article)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        fields: &ProductFields,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET image = $2, product_name = $3, description = $4, low_price = $5, article = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(&fields.image)
        .bind(&fields.product_name)
        .bind(&fields.description)
        .bind(fields.low_price)
        .bind(&fields.article)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ProductNotFound)
    }

    pub async fn delete_product<'e, E>(&self, executor: E, product_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Menor preço de venda registrado entre as unidades do produto.
    pub async fn lowest_sale_price<'e, E>(&self, executor: E, product_id: Uuid) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lowest = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MIN(high_price) FROM product_sizes WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(executor)
        .await?;
        Ok(lowest)
    }

    // ---
    // Unidades (ProductSize)
    // ---

    pub async fn find_unit<'e, E>(&self, executor: E, unit_id: Uuid) -> Result<Option<ProductSize>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, ProductSize>("SELECT * FROM product_sizes WHERE id = $1")
            .bind(unit_id)
            .fetch_optional(executor)
            .await?;
        Ok(unit)
    }

    /// Lê a unidade travando a linha até o fim da transação.
    pub async fn lock_unit<'e, E>(&self, executor: E, unit_id: Uuid) -> Result<Option<ProductSize>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, ProductSize>(
            "SELECT * FROM product_sizes WHERE id = $1 FOR UPDATE",
        )
        .bind(unit_id)
        .fetch_optional(executor)
        .await?;
        Ok(unit)
    }

    pub async fn list_units_for_products<'e, E>(
        &self,
        executor: E,
        product_ids: &[Uuid],
    ) -> Result<Vec<ProductSize>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let units = sqlx::query_as::<_, ProductSize>(
            "SELECT * FROM product_sizes WHERE product_id = ANY($1) ORDER BY size ASC, id ASC",
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(units)
    }

    pub async fn insert_unit<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        state: &UnitState,
    ) -> Result<ProductSize, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, ProductSize>(
            r#"
            INSERT INTO product_sizes (product_id, size, have, high_price, seller_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(state.size)
        .bind(state.have)
        .bind(state.high_price)
        .bind(state.seller_id)
        .fetch_one(executor)
        .await
        .map_err(map_unit_write_error)?;
        Ok(unit)
    }

    pub async fn update_unit<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        state: &UnitState,
    ) -> Result<ProductSize, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProductSize>(
            r#"
            UPDATE product_sizes
            SET size = $2, have = $3, high_price = $4, seller_id = $5, sold_date = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(unit_id)
        .bind(state.size)
        .bind(state.have)
        .bind(state.high_price)
        .bind(state.seller_id)
        .fetch_optional(executor)
        .await
        .map_err(map_unit_write_error)?
        .ok_or(AppError::UnitNotFound)
    }

    pub async fn delete_unit<'e, E>(&self, executor: E, unit_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_sizes WHERE id = $1")
            .bind(unit_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Vendedores
    // ---

    pub async fn find_seller<'e, E>(&self, executor: E, seller_id: Uuid) -> Result<Option<Seller>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seller = sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE id = $1")
            .bind(seller_id)
            .fetch_optional(executor)
            .await?;
        Ok(seller)
    }

    /// Lê o vendedor com FOR SHARE: ninguém o apaga até o fim da transação.
    pub async fn lock_seller_shared<'e, E>(&self, executor: E, seller_id: Uuid) -> Result<Option<Seller>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seller = sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE id = $1 FOR SHARE")
            .bind(seller_id)
            .fetch_optional(executor)
            .await?;
        Ok(seller)
    }

    pub async fn list_sellers<'e, E>(&self, executor: E, owner_id: Uuid) -> Result<Vec<Seller>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sellers = sqlx::query_as::<_, Seller>(
            "SELECT * FROM sellers WHERE owner_id = $1 ORDER BY seller_name ASC",
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await?;
        Ok(sellers)
    }

    pub async fn insert_seller<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        seller_name: &str,
    ) -> Result<Seller, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seller = sqlx::query_as::<_, Seller>(
            "INSERT INTO sellers (owner_id, seller_name) VALUES ($1, $2) RETURNING *",
        )
        .bind(owner_id)
        .bind(seller_name)
        .fetch_one(executor)
        .await?;
        Ok(seller)
    }

    pub async fn rename_seller<'e, E>(
        &self,
        executor: E,
        seller_id: Uuid,
        seller_name: &str,
    ) -> Result<Seller, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Seller>(
            "UPDATE sellers SET seller_name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(seller_id)
        .bind(seller_name)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::SellerNotFound)
    }

    /// O banco zera `product_sizes.seller_id` (ON DELETE SET NULL).
    pub async fn delete_seller<'e, E>(&self, executor: E, seller_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM sellers WHERE id = $1")
            .bind(seller_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Histórico
    // ---

    /// "Find or create" atômico: o upsert devolve a linha nos dois casos.
    pub async fn find_or_create_history(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<History, AppError> {
        let history = sqlx::query_as::<_, History>(
            r#"
            INSERT INTO histories (user_id) VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(history)
    }

    pub async fn insert_history_item<'e, E>(
        &self,
        executor: E,
        history_id: Uuid,
        product_id: Uuid,
        product_size_id: Uuid,
    ) -> Result<HistoryItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, HistoryItem>(
            r#"
            INSERT INTO history_items (history_id, product_id, product_size_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(history_id)
        .bind(product_id)
        .bind(product_size_id)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Remove TODAS as entradas da unidade no histórico do dono (delete por conjunto).
    pub async fn delete_history_items<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        product_size_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM history_items hi
            USING histories h
            WHERE hi.history_id = h.id
              AND h.user_id = $1
              AND hi.product_size_id = $2
            "#,
        )
        .bind(user_id)
        .bind(product_size_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_history<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        sold_from: Option<NaiveDate>,
        sold_until: Option<NaiveDate>,
    ) -> Result<Vec<HistoryRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT hi.id, hi.sold_date,
                   p.product_name, p.article, p.low_price,
                   s.size, s.high_price,
                   sl.seller_name
            FROM history_items hi
            JOIN histories h ON h.id = hi.history_id
            JOIN products p ON p.id = hi.product_id
            JOIN product_sizes s ON s.id = hi.product_size_id
            LEFT JOIN sellers sl ON sl.id = s.seller_id
            WHERE h.user_id = $1
              AND ($2::DATE IS NULL OR hi.sold_date::DATE >= $2)
              AND ($3::DATE IS NULL OR hi.sold_date::DATE <= $3)
            ORDER BY hi.sold_date DESC
            "#,
        )
        .bind(user_id)
        .bind(sold_from)
        .bind(sold_until)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}

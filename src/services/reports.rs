// src/services/reports.rs
//
// Agregados calculados sob demanda varrendo as unidades (nada é persistido).
// Todos os preços são inteiros não negativos; somas em i64, conjunto vazio = 0.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{
    inventory::{Group, HistoryRow, Product, ProductSize},
    reports::{
        GroupDetail, GroupSummary, HistoryItemView, HistoryView, ProductDetail, ProductSummary,
        SellerNameView, SizeBrief, SoldProductView, SoldUnitView, UnitDetail,
    },
};

/// Um produto com todas as suas unidades.
#[derive(Debug, Clone)]
pub struct ProductStock {
    pub product: Product,
    pub units: Vec<ProductSize>,
}

/// Um grupo com todos os seus produtos.
#[derive(Debug, Clone)]
pub struct GroupStock {
    pub group: Group,
    pub products: Vec<ProductStock>,
}

impl ProductStock {
    fn sold(&self) -> impl Iterator<Item = &ProductSize> {
        self.units.iter().filter(|u| !u.have)
    }

    fn sold_count(&self) -> i64 {
        self.sold().count() as i64
    }
}

// ---
// Por produto
// ---

pub fn product_spend(stock: &ProductStock) -> i64 {
    stock.units.len() as i64 * i64::from(stock.product.low_price)
}

pub fn product_income(stock: &ProductStock) -> i64 {
    // Unidade vendida sempre tem high_price; o filter_map só protege dados legados.
    stock
        .sold()
        .filter_map(|u| u.high_price)
        .map(i64::from)
        .sum()
}

pub fn product_profit(stock: &ProductStock) -> i64 {
    product_income(stock) - stock.sold_count() * i64::from(stock.product.low_price)
}

pub fn unit_profit(unit: &ProductSize, low_price: i32) -> i64 {
    match unit.high_price {
        Some(high) => i64::from(high) - i64::from(low_price),
        None => 0,
    }
}

// ---
// Por grupo
// ---

pub fn count_products(stock: &GroupStock) -> i64 {
    stock.products.len() as i64
}

pub fn count_sold_sizes(stock: &GroupStock) -> i64 {
    stock.products.iter().map(ProductStock::sold_count).sum()
}

pub fn count_all_sizes(stock: &GroupStock) -> i64 {
    stock.products.iter().map(|p| p.units.len() as i64).sum()
}

pub fn group_spend(stock: &GroupStock) -> i64 {
    stock.products.iter().map(product_spend).sum()
}

pub fn group_income(stock: &GroupStock) -> i64 {
    stock.products.iter().map(product_income).sum()
}

pub fn group_profit(stock: &GroupStock) -> i64 {
    stock.products.iter().map(product_profit).sum()
}

// ---
// Montagem a partir das linhas do banco
// ---

/// Distribui produtos e unidades pelos grupos, preservando a ordem recebida de cada lista.
pub fn assemble(
    groups: Vec<Group>,
    products: Vec<Product>,
    units: Vec<ProductSize>,
) -> Vec<GroupStock> {
    let mut units_by_product: HashMap<Uuid, Vec<ProductSize>> = HashMap::new();
    for unit in units {
        units_by_product.entry(unit.product_id).or_default().push(unit);
    }

    let mut products_by_group: HashMap<Uuid, Vec<ProductStock>> = HashMap::new();
    for product in products {
        let units = units_by_product.remove(&product.id).unwrap_or_default();
        products_by_group
            .entry(product.group_id)
            .or_default()
            .push(ProductStock { product, units });
    }

    groups
        .into_iter()
        .map(|group| {
            let products = products_by_group.remove(&group.id).unwrap_or_default();
            GroupStock { group, products }
        })
        .collect()
}

pub fn group_summary(stock: &GroupStock) -> GroupSummary {
    GroupSummary {
        id: stock.group.id,
        group_date: stock.group.group_date,
        owner: stock.group.owner_id,
        count_products: count_products(stock),
        count_sold_sizes: count_sold_sizes(stock),
        count_all_sizes: count_all_sizes(stock),
        group_spend: group_spend(stock),
        products_income: group_income(stock),
        products_profit: group_profit(stock),
    }
}

pub fn product_summary(stock: &ProductStock) -> ProductSummary {
    ProductSummary {
        id: stock.product.id,
        image: stock.product.image.clone(),
        product_name: stock.product.product_name.clone(),
        article: stock.product.article.clone(),
        sizes: stock.units.iter().map(|u| SizeBrief { size: u.size }).collect(),
        products_spend: product_spend(stock),
        products_income: product_income(stock),
        products_profit: product_profit(stock),
    }
}

pub fn group_detail(stock: &GroupStock) -> GroupDetail {
    GroupDetail {
        id: stock.group.id,
        group_date: stock.group.group_date,
        products: stock.products.iter().map(product_summary).collect(),
    }
}

pub fn product_detail(stock: &ProductStock) -> ProductDetail {
    let low_price = stock.product.low_price;
    ProductDetail {
        id: stock.product.id,
        image: stock.product.image.clone(),
        product_name: stock.product.product_name.clone(),
        article: stock.product.article.clone(),
        description: stock.product.description.clone(),
        low_price,
        sizes: stock
            .units
            .iter()
            .map(|u| UnitDetail {
                id: u.id,
                size: u.size,
                have: u.have,
                high_price: u.high_price,
                seller_id: u.seller_id,
                profit: unit_profit(u, low_price),
            })
            .collect(),
        created_date: stock.product.created_date,
    }
}

pub fn history_view(user_id: Uuid, rows: Vec<HistoryRow>) -> HistoryView {
    HistoryView {
        user: user_id,
        history_items: rows
            .into_iter()
            .map(|row| HistoryItemView {
                id: row.id,
                product: SoldProductView {
                    product_name: row.product_name,
                    article: row.article,
                    low_price: row.low_price,
                },
                product_size: SoldUnitView {
                    size: row.size,
                    high_price: row.high_price,
                    seller: row.seller_name.map(|seller_name| SellerNameView { seller_name }),
                },
                sold_date: row.sold_date,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;

    fn group() -> Group {
        Group {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            group_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_date: Utc::now(),
        }
    }

    fn product(group_id: Uuid, low_price: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            group_id,
            image: None,
            product_name: "Sneaker".into(),
            description: None,
            low_price,
            article: Some("A-1".into()),
            created_date: Utc::now(),
        }
    }

    fn unit(product_id: Uuid, size: i32, sold_for: Option<i32>) -> ProductSize {
        ProductSize {
            id: Uuid::new_v4(),
            product_id,
            size,
            have: sold_for.is_none(),
            high_price: sold_for,
            seller_id: None,
            sold_date: Utc::now(),
        }
    }

    fn stock(low_price: i32, sales: &[Option<i32>]) -> ProductStock {
        let product = product(Uuid::new_v4(), low_price);
        let units = sales
            .iter()
            .enumerate()
            .map(|(i, s)| unit(product.id, 40 + i as i32, *s))
            .collect();
        ProductStock { product, units }
    }

    #[test]
    fn empty_group_aggregates_to_zero() {
        let stock = GroupStock {
            group: group(),
            products: vec![],
        };

        let summary = group_summary(&stock);
        assert_eq!(summary.count_products, 0);
        assert_eq!(summary.count_sold_sizes, 0);
        assert_eq!(summary.count_all_sizes, 0);
        assert_eq!(summary.group_spend, 0);
        assert_eq!(summary.products_income, 0);
        assert_eq!(summary.products_profit, 0);
    }

    #[test]
    fn product_without_units_aggregates_to_zero() {
        let s = stock(80, &[]);
        assert_eq!(product_spend(&s), 0);
        assert_eq!(product_income(&s), 0);
        assert_eq!(product_profit(&s), 0);
    }

    #[test]
    fn group_fixture_matches_hand_computation() {
        // Produto A: custo 80, 3 unidades, vendidas por 100 e 120.
        // Produto B: custo 30, 2 unidades, nenhuma vendida.
        let g = group();
        let a = {
            let mut s = stock(80, &[Some(100), Some(120), None]);
            s.product.group_id = g.id;
            s
        };
        let b = {
            let mut s = stock(30, &[None, None]);
            s.product.group_id = g.id;
            s
        };
        let stock = GroupStock {
            group: g,
            products: vec![a, b],
        };

        assert_eq!(count_products(&stock), 2);
        assert_eq!(count_sold_sizes(&stock), 2);
        assert_eq!(count_all_sizes(&stock), 5);
        assert_eq!(group_spend(&stock), 3 * 80 + 2 * 30);
        assert_eq!(group_income(&stock), 220);
        assert_eq!(group_profit(&stock), 220 - 2 * 80);
    }

    #[test]
    fn unsold_inventory_counts_in_spend_but_not_profit() {
        let s = stock(50, &[None, None, Some(70)]);
        assert_eq!(product_spend(&s), 150);
        assert_eq!(product_profit(&s), 20);
    }

    #[test]
    fn unit_profit_is_zero_without_sale_price() {
        let u = unit(Uuid::new_v4(), 42, None);
        assert_eq!(unit_profit(&u, 80), 0);

        let sold = unit(Uuid::new_v4(), 42, Some(100));
        assert_eq!(unit_profit(&sold, 80), 20);
    }

    #[test]
    fn in_stock_unit_with_asking_price_has_unit_profit() {
        let mut u = unit(Uuid::new_v4(), 42, None);
        u.high_price = Some(95);
        assert_eq!(unit_profit(&u, 80), 15);
    }

    #[test]
    fn assemble_routes_rows_to_their_parents() {
        let g1 = group();
        let g2 = group();
        let p1 = product(g1.id, 10);
        let p2 = product(g1.id, 20);
        let units = vec![
            unit(p1.id, 38, None),
            unit(p2.id, 39, Some(25)),
            unit(p1.id, 40, Some(11)),
        ];

        let stocks = assemble(vec![g1.clone(), g2.clone()], vec![p1.clone(), p2.clone()], units);

        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].group.id, g1.id);
        assert_eq!(stocks[0].products.len(), 2);
        assert_eq!(stocks[0].products[0].units.len(), 2);
        assert_eq!(stocks[0].products[1].units.len(), 1);
        assert!(stocks[1].products.is_empty());
        assert_eq!(group_income(&stocks[0]), 36);
    }

    #[test]
    fn history_view_nests_seller_only_when_present() {
        let rows = vec![
            HistoryRow {
                id: Uuid::new_v4(),
                sold_date: Utc::now(),
                product_name: "Boot".into(),
                article: None,
                low_price: 10,
                size: 41,
                high_price: Some(15),
                seller_name: Some("Aibek".into()),
            },
            HistoryRow {
                id: Uuid::new_v4(),
                sold_date: Utc::now(),
                product_name: "Boot".into(),
                article: None,
                low_price: 10,
                size: 42,
                high_price: Some(12),
                seller_name: None,
            },
        ];

        let view = history_view(Uuid::nil(), rows);
        assert_eq!(view.history_items.len(), 2);
        assert_eq!(
            view.history_items[0]
                .product_size
                .seller
                .as_ref()
                .map(|s| s.seller_name.as_str()),
            Some("Aibek")
        );
        assert!(view.history_items[1].product_size.seller.is_none());
    }

    proptest! {
        #[test]
        fn profit_is_income_minus_cost_of_sold_units(
            products in prop::collection::vec(
                (0i32..5_000, prop::collection::vec(prop::option::of(0i32..20_000), 0..8)),
                0..6,
            )
        ) {
            let g = group();
            let products: Vec<ProductStock> = products
                .iter()
                .map(|(low, sales)| {
                    // Preço de venda nunca abaixo do custo.
                    let sales: Vec<Option<i32>> = sales.iter().map(|s| s.map(|p| p + low)).collect();
                    let mut s = stock(*low, &sales);
                    s.product.group_id = g.id;
                    s
                })
                .collect();
            let stock = GroupStock { group: g, products };

            let cogs: i64 = stock
                .products
                .iter()
                .map(|p| p.sold_count() * i64::from(p.product.low_price))
                .sum();

            prop_assert_eq!(group_profit(&stock), group_income(&stock) - cogs);
            prop_assert!(group_profit(&stock) >= 0);
            prop_assert!(count_sold_sizes(&stock) <= count_all_sizes(&stock));
        }
    }
}

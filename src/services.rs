pub mod auth;
pub mod inventory_service;
pub mod password_reset;
pub mod reports;
pub mod stock;

pub mod auth;
pub mod groups;
pub mod history;
pub mod password_reset;
pub mod products;
pub mod sellers;
pub mod units;

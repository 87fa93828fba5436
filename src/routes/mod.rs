pub mod airlines;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod packages;
pub mod server;
pub mod users;

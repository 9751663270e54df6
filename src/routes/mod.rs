pub mod admin;
pub mod auth;
pub mod customers;
pub mod health;
pub mod tickets;

pub mod audit;
pub mod contract;
pub mod customer;
pub mod dashboard;
pub mod file;
pub mod notification;
pub mod sale;
pub mod ticket;
pub mod user;

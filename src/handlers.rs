// src/handlers.rs

pub mod admin;
pub mod audit;
pub mod auth;
pub mod certificates;
pub mod clients;
pub mod companies;
pub mod imports;
pub mod invoices;
pub mod payments;
pub mod users;

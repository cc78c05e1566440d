// src/services.rs

pub mod admin_service;
pub mod audit_service;
pub mod auth;
pub mod certificate_service;
pub mod client_service;
pub mod company_service;
pub mod import_service;
pub mod invoice_service;
pub mod notifier;
pub mod payment_service;
pub mod storage;

// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::db;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Companies ---
        handlers::companies::create_company,
        handlers::companies::get_my_company,

        // --- Users ---
        handlers::users::list_members,
        handlers::users::update_role,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,

        // --- Invoices ---
        handlers::invoices::create_invoice,
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::delete_invoice,

        // --- Payments ---
        handlers::payments::register_payment,
        handlers::payments::reverse_payment,

        // --- Imports ---
        handlers::imports::import_document,

        // --- Certificates ---
        handlers::certificates::upload_certificate,
        handlers::certificates::list_certificates,
        handlers::certificates::delete_certificate,

        // --- Admin ---
        handlers::admin::inspect_schema,
        handlers::admin::cleanup_certificates,

        // --- Audit ---
        handlers::audit::list_audit,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Profile,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::UpdateRolePayload,

            // --- Companies ---
            models::company::Company,
            models::company::CreateCompanyPayload,

            // --- Billing ---
            models::billing::InvoiceStatus,
            models::billing::PaymentMethod,
            models::billing::Client,
            models::billing::Invoice,
            models::billing::InvoiceWithClient,
            models::billing::InvoiceItem,
            models::billing::Payment,
            models::billing::StatusSnapshot,
            models::billing::InvoiceDetail,
            models::billing::PaymentResult,

            // --- Payloads ---
            models::billing::CreateClientPayload,
            models::billing::InvoiceItemPayload,
            models::billing::CreateInvoicePayload,
            models::billing::RegisterPaymentPayload,
            models::billing::ReversePaymentPayload,

            // --- Imports ---
            models::import::ImportDocumentPayload,
            models::import::ImportItemPayload,
            models::import::ImportOutcome,
            models::import::ImportResult,

            // --- Certificates ---
            models::certificate::Certificate,

            // --- Audit ---
            models::audit::AuditLogEntry,

            // --- Admin ---
            db::admin_repo::SchemaColumn,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Companies", description = "Onboarding e dados da Empresa"),
        (name = "Users", description = "Membros e Papéis"),
        (name = "Clients", description = "Clientes faturáveis da Empresa"),
        (name = "Invoices", description = "Ciclo de vida de Faturas"),
        (name = "Payments", description = "Razão de Pagamentos e Status"),
        (name = "Imports", description = "Importação de Documentos Fiscais"),
        (name = "Certificates", description = "Certificados de Conformidade"),
        (name = "Admin", description = "Operações privilegiadas (cross-tenant)"),
        (name = "Audit", description = "Trilha de Auditoria")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

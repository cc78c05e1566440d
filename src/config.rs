// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AdminRepository, AuditRepository, CertificateRepository, ClientRepository,
        CompanyRepository, InvoiceRepository, PaymentRepository, UserRepository,
    },
    services::{
        admin_service::AdminService, audit_service::AuditService, auth::AuthService,
        certificate_service::CertificateService, client_service::ClientService,
        company_service::CompanyService, import_service::ImportService,
        invoice_service::InvoiceService, notifier::TracingNotifier,
        payment_service::PaymentService, storage::FsStorage,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub client_service: ClientService,
    pub invoice_service: InvoiceService,
    pub payment_service: PaymentService,
    pub import_service: ImportService,
    pub certificate_service: CertificateService,
    pub admin_service: AdminService,
    pub audit_service: AuditService,
}

impl AppState {
    // Carrega as configurações e monta o gráfico de dependências
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let storage_dir = env::var("STORAGE_DIR").unwrap_or_else(|_| "./storage".to_string());

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Colaboradores externos ---
        let storage = Arc::new(FsStorage::new(storage_dir));
        let notifier = Arc::new(TracingNotifier);

        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let certificate_repo = CertificateRepository::new(db_pool.clone());
        let audit_repo = AuditRepository::new(db_pool.clone());
        let admin_repo = AdminRepository::new(db_pool.clone());

        // --- Serviços ---
        let audit_service = AuditService::new(audit_repo);
        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let company_service = CompanyService::new(
            company_repo.clone(),
            user_repo,
            audit_service.clone(),
            db_pool.clone(),
        );
        let client_service = ClientService::new(client_repo.clone(), audit_service.clone());
        let invoice_service = InvoiceService::new(
            invoice_repo.clone(),
            client_repo.clone(),
            payment_repo.clone(),
            audit_service.clone(),
        );
        let payment_service = PaymentService::new(
            payment_repo,
            invoice_repo.clone(),
            company_repo,
            audit_service.clone(),
            notifier,
        );
        let import_service =
            ImportService::new(client_repo, invoice_repo, audit_service.clone());
        let certificate_service = CertificateService::new(
            certificate_repo,
            audit_service.clone(),
            storage.clone(),
        );
        let admin_service = AdminService::new(
            admin_repo,
            audit_service.clone(),
            storage,
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            i18n_store: I18nStore::new(),
            auth_service,
            company_service,
            client_service,
            invoice_service,
            payment_service,
            import_service,
            certificate_service,
            admin_service,
            audit_service,
        })
    }
}

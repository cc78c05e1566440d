// src/services/notifier.rs

use async_trait::async_trait;

// O núcleo só decide QUE uma notificação é necessária; a entrega (e-mail,
// fila...) pertence à infraestrutura de fora.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

// Implementação padrão: registra no log estruturado.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(to, subject, body, "notificação emitida");
        Ok(())
    }
}

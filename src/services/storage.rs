// src/services/storage.rs

use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

// Contrato do object storage consumido pelo núcleo. A implementação real
// (S3, GCS...) fica na infraestrutura; aqui só precisamos de put/delete.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Grava os bytes e devolve a URL de referência.
    async fn put(&self, bytes: &[u8], name_hint: &str) -> anyhow::Result<String>;

    /// Remove o blob. Falha aqui é tratada como não-fatal pelo chamador.
    async fn delete(&self, url: &str) -> anyhow::Result<()>;
}

// Implementação em disco local, suficiente para desenvolvimento e testes.
pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    fn sanitize(name_hint: &str) -> String {
        name_hint
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect()
    }
}

#[async_trait]
impl ObjectStorage for FsStorage {
    async fn put(&self, bytes: &[u8], name_hint: &str) -> anyhow::Result<String> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        // Prefixo aleatório evita colisão entre uploads de mesmo nome
        let file_name = format!("{}_{}", Uuid::new_v4(), Self::sanitize(name_hint));
        let path = self.base_dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        Ok(format!("file://{}", path.display()))
    }

    async fn delete(&self, url: &str) -> anyhow::Result<()> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}

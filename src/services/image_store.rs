// src/services/image_store.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::produto::ImagemUpload;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Imagens de produto em disco, servidas como arquivos estáticos em `/uploads`.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn extension_for(file_name: Option<&str>) -> Result<String, AppError> {
        let ext = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string());

        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::InvalidMultipart(format!("extensão de imagem não suportada: {}", ext)));
        }
        Ok(ext)
    }

    /// Grava a imagem com nome gerado e devolve esse nome.
    pub async fn save(&self, upload: &ImagemUpload) -> Result<String, AppError> {
        let ext = Self::extension_for(upload.file_name.as_deref())?;
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Falha ao criar diretório {}", self.dir.display()))?;
        tokio::fs::write(self.dir.join(&file_name), &upload.bytes)
            .await
            .with_context(|| format!("Falha ao gravar imagem {}", file_name))?;

        Ok(file_name)
    }

    /// Remoção "best-effort": falhas só geram log.
    pub async fn remove(&self, file_name: &str) {
        // Nomes gerados nunca têm separadores; qualquer outra coisa é ignorada
        if file_name.contains(['/', '\\']) || file_name.contains("..") {
            tracing::warn!(file_name, "Nome de imagem suspeito; remoção ignorada");
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            tracing::warn!(file_name, error = %e, "Falha ao remover imagem do produto");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_defaults_to_jpg_and_rejects_unknown() {
        assert_eq!(ImageStore::extension_for(None).unwrap(), "jpg");
        assert_eq!(ImageStore::extension_for(Some("foto.PNG")).unwrap(), "png");
        assert!(ImageStore::extension_for(Some("script.sh")).is_err());
    }

    #[tokio::test]
    async fn save_then_remove_round_trip_on_disk() {
        let dir = std::env::temp_dir().join(format!("estoque-img-{}", Uuid::new_v4()));
        let store = ImageStore::new(&dir);

        let name = store
            .save(&ImagemUpload { file_name: Some("a.webp".into()), bytes: vec![1, 2, 3] })
            .await
            .unwrap();
        assert!(name.ends_with(".webp"));
        assert_eq!(tokio::fs::read(dir.join(&name)).await.unwrap(), vec![1, 2, 3]);

        store.remove(&name).await;
        assert!(!dir.join(&name).exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}

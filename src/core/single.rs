use crate::config::{RenderOptions, SingleConfig};
use crate::core::render::QrMatrix;
use crate::core::Storage;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct SingleOutcome {
    /// Terminal rendering of the code, ready to print.
    pub terminal: String,
    pub saved_to: Option<String>,
}

/// Renders one ad-hoc QR code, optionally saving it as `<filename>.png`.
pub struct SingleRun<S: Storage> {
    storage: S,
    config: SingleConfig,
    render: RenderOptions,
}

impl<S: Storage> SingleRun<S> {
    pub fn new(storage: S, config: SingleConfig, render: RenderOptions) -> Self {
        Self {
            storage,
            config,
            render,
        }
    }

    pub async fn run(&self) -> Result<SingleOutcome> {
        let matrix = QrMatrix::encode(&self.config.content)?;
        let terminal = matrix.to_terminal(self.render.border);

        if !self.config.save {
            return Ok(SingleOutcome {
                terminal,
                saved_to: None,
            });
        }

        let filename = self
            .config
            .filename
            .clone()
            .unwrap_or_else(timestamp_filename);
        let path = format!("{}.png", filename);
        let png = matrix.to_png(self.render)?;
        self.storage.write_file(&path, &png).await?;
        tracing::info!("QR code saved to {}", path);

        Ok(SingleOutcome {
            terminal,
            saved_to: Some(path),
        })
    }
}

fn timestamp_filename() -> String {
    chrono::Local::now().format("qr-%Y%m%d-%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use tempfile::TempDir;

    fn config(save: bool, filename: Option<&str>) -> SingleConfig {
        SingleConfig {
            content: "https://example.com".to_string(),
            save,
            filename: filename.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_single_without_save_writes_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let run = SingleRun::new(
            LocalStorage::new(temp_dir.path()),
            config(false, Some("ignored")),
            RenderOptions::default(),
        );

        let outcome = run.run().await.unwrap();

        assert!(outcome.terminal.contains("██"));
        assert_eq!(outcome.saved_to, None);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_single_with_save_writes_png() {
        let temp_dir = TempDir::new().unwrap();
        let run = SingleRun::new(
            LocalStorage::new(temp_dir.path()),
            config(true, Some("homepage")),
            RenderOptions::default(),
        );

        let outcome = run.run().await.unwrap();

        assert_eq!(outcome.saved_to.as_deref(), Some("homepage.png"));
        let bytes = std::fs::read(temp_dir.path().join("homepage.png")).unwrap();
        assert!(image::load_from_memory(&bytes).is_ok());
    }

    #[tokio::test]
    async fn test_single_with_save_and_no_name_uses_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let run = SingleRun::new(
            LocalStorage::new(temp_dir.path()),
            config(true, None),
            RenderOptions::default(),
        );

        let saved = run.run().await.unwrap().saved_to.unwrap();
        assert!(saved.starts_with("qr-"));
        assert!(temp_dir.path().join(&saved).exists());
    }
}

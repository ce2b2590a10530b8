use crate::config::{RenderOptions, MANIFEST_FILE};
use crate::core::loader::DataLoader;
use crate::core::render;
use crate::core::template::{ManifestBuilder, Template};
use crate::core::{ConfigProvider, Dataset, LoadReport, Manifest, Pipeline, Storage};
use crate::utils::error::Result;

pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    loader: DataLoader,
    render: RenderOptions,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            loader: DataLoader::new(),
            render: RenderOptions::default(),
        }
    }

    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    fn summarize(&self, manifest: &Manifest) {
        for (group, entries) in manifest.groups() {
            tracing::info!("Group '{}': {} QR codes", group, entries.len());
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        self.loader
            .load(self.config.source_kind(), self.config.data_location())
            .await
    }

    async fn transform(&self, data: Dataset) -> Result<Manifest> {
        let payload = Template::new(self.config.payload_template());
        let naming = Template::new(self.config.naming_template());
        let manifest = ManifestBuilder::new(&payload, &naming, self.config.group_by()).build(&data);
        Ok(manifest)
    }

    async fn load(&self, manifest: Manifest) -> Result<LoadReport> {
        let mut report = LoadReport {
            groups: manifest.group_count(),
            entries: manifest.entry_count(),
            ..LoadReport::default()
        };

        self.summarize(&manifest);

        if !self.config.save() {
            tracing::info!("Save not requested, nothing written");
            return Ok(report);
        }

        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        self.storage
            .write_file(MANIFEST_FILE, manifest_json.as_bytes())
            .await?;
        tracing::debug!("Manifest written to {}", MANIFEST_FILE);
        report.manifest_path = Some(MANIFEST_FILE.to_string());

        let folder = self.config.folder_name();
        for (group, entries) in manifest.groups() {
            let group_dir = format!("{}/{}", folder, group);
            self.storage.create_dir_all(&group_dir).await?;

            for (filename, payload) in entries {
                let png = render::render_png(payload, self.render)?;
                let path = format!("{}/{}.png", group_dir, filename);
                self.storage.write_file(&path, &png).await?;
                tracing::debug!("Wrote {} ({} bytes)", path, png.len());
                report.images.push(path);
            }
        }

        Ok(report)
    }
}

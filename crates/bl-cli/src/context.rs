use anyhow::Context;
use bl_config::BlConfig;
use bl_registry::BatchRegistry;

/// Everything a registry-backed command needs.
pub struct AppContext {
    pub registry: BatchRegistry,
    pub project_id: String,
}

impl AppContext {
    pub fn init(config: BlConfig) -> anyhow::Result<Self> {
        let project_id = config.general.default_project.clone();
        let registry = BatchRegistry::new(config).context("failed to initialize batch registry")?;
        Ok(Self {
            registry,
            project_id,
        })
    }
}

use bl_config::BlConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration (with `.env` support) and apply CLI overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<BlConfig> {
    let mut config = BlConfig::load_with_dotenv()?;
    if let Some(project) = &flags.project {
        config.general.default_project.clone_from(project);
    }
    Ok(config)
}

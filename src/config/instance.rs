//! config singleton management stuff
use {
    crate::config::options::ThemeCap,
    color_eyre::{
        Result,
        eyre::{Context, eyre},
    },
    std::sync::{LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// global config instance
///
/// falls back to the built-in defaults if loading fails, [`reload_config`] reports why
static CONFIG: LazyLock<RwLock<ThemeCap>> = LazyLock::new(|| {
    RwLock::new(ThemeCap::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load configuration, using defaults");
        ThemeCap::default()
    }))
});

/// get a ro ref to the config
pub fn config() -> Result<RwLockReadGuard<'static, ThemeCap>> {
    CONFIG
        .read()
        .map_err(|e| eyre!("Configuration lock poisoned: {}", e))
}

/// get a rw ref to the config
pub fn config_mut() -> Result<RwLockWriteGuard<'static, ThemeCap>> {
    CONFIG
        .write()
        .map_err(|e| eyre!("Configuration lock poisoned: {}", e))
}

/// reload cfg from disk
pub fn reload_config() -> Result<()> {
    let new_config = ThemeCap::load().wrap_err("Failed to reload config from disk")?;
    let mut config = config_mut().wrap_err("failed to acquire write lock for cfg reload")?;

    *config = new_config;

    Ok(())
}

/// get a specific config value with a default fallback
pub fn get_or_default<T, F>(getter: F, default: T) -> T
where
    F: FnOnce(&ThemeCap) -> Option<T>,
    T: Clone,
{
    config()
        .ok()
        .and_then(|cfg| getter(&cfg))
        .unwrap_or(default)
}

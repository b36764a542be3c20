//! every available configuration option and its type is listed in this file
use {
    crate::{
        config::validate::{Validate, format_validation_errors},
        models::SourceCategory,
    },
    color_eyre::{
        Section, SectionExt,
        eyre::{Context, OptionExt, Result, eyre},
    },
    config::{Config, ConfigBuilder},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    smart_default::SmartDefault,
    std::path::{Path, PathBuf},
    tracing::info,
};

/// the name of the config file, both global and local
pub const CONFIG_FILE_NAME: &str = "themecap.toml";

/// The themes to capture
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct ThemesCfg {
    /// Theme names, captured in this order
    #[default(Some(vec!["light".to_string(), "dark".to_string(), "blue".to_string()]))]
    pub names: Option<Vec<String>>,
}

/// Where the host lives
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct HostCfg {
    /// The host directory (holding `catalog.toml`, `themes/` and `active.toml`)
    #[default(Some("host".to_string()))]
    pub dir: Option<String>,
}

/// What to capture
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct CaptureCfg {
    /// The sources to capture, in this order
    #[default(Some(SourceCategory::ALL.to_vec()))]
    pub sources: Option<Vec<SourceCategory>>,
}

/// Where and how to export
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct ExportCfg {
    /// The output directory (defaults to the system temp directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// The name every output file starts with
    #[default(Some("ThemeColors".to_string()))]
    pub file_stem: Option<String>,

    /// Write an xlsx workbook with color swatches
    #[default(Some(true))]
    pub workbook: Option<bool>,

    /// Write a json document with every record
    #[default(Some(true))]
    pub json: Option<bool>,

    /// Write one csv file per source
    #[default(Some(false))]
    pub csv: Option<bool>,

    /// Indent the json document
    #[default(Some(true))]
    pub pretty_json: Option<bool>,

    /// Open the workbook once it's written
    #[default(Some(false))]
    pub open_after: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema, SmartDefault)]
/// The format to log in
pub enum LoggingFormat {
    /// Use the compact output format
    Compact,

    /// Use the pretty, multi-line output format
    #[default]
    Pretty,
}

/// Settings for logging
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct LoggingConfig {
    /// Enable logging
    #[default(Some(true))]
    pub enable: Option<bool>,

    /// The max level to log at (trace, debug, info, warn, error, off)
    #[default(Some("info".to_string()))]
    pub level: Option<String>,

    /// The output format
    #[default(Some(LoggingFormat::Compact))]
    pub format: Option<LoggingFormat>,

    /// Enable ANSI escape codes for colors and stuff
    #[default(Some(true))]
    pub ansi: Option<bool>,

    /// Display event targets in log messages
    #[default(Some(false))]
    pub event_targets: Option<bool>,

    /// Display line numbers in log messages
    #[default(Some(false))]
    pub line_numbers: Option<bool>,
}

/// The themecap configuration
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct ThemeCap {
    /// Theme settings
    #[default(Some(ThemesCfg::default()))]
    pub themes: Option<ThemesCfg>,

    /// Host settings
    #[default(Some(HostCfg::default()))]
    pub host: Option<HostCfg>,

    /// Capture settings
    #[default(Some(CaptureCfg::default()))]
    pub capture: Option<CaptureCfg>,

    /// Export settings
    #[default(Some(ExportCfg::default()))]
    pub export: Option<ExportCfg>,

    /// Logging settings
    #[default(Some(LoggingConfig::default()))]
    pub logging: Option<LoggingConfig>,
}

impl ThemeCap {
    /// load config from default locations
    ///
    /// load prio: env > local > global > defaults
    pub fn load() -> Result<Self> {
        let global_config_path = Self::global_config_path()?;
        let defaults = Self::load_defaults()?;
        let mut builder = Self::create_builder(&defaults)?;

        builder =
            builder.add_source(config::File::from(global_config_path.as_path()).required(false));

        if let Some(local_config) = Self::find_local_config()? {
            info!(path = %local_config.display(), "Using local configuration");
            builder =
                builder.add_source(config::File::from(local_config.as_path()).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("THEMECAP")
                .prefix_separator("_")
                .separator("__"),
        );

        let cfg = Self::finish(builder)?;

        if !global_config_path.exists() {
            Self::create_default_config(&global_config_path, &defaults)?;
        }

        Ok(cfg)
    }

    /// load config from the defaults and a single file, ignoring every other location
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let builder = Self::create_builder(&Self::load_defaults()?)?
            .add_source(config::File::from(path).required(true));

        Self::finish(builder).with_section(|| path.display().to_string().header("File path"))
    }

    /// build, deserialize and validate
    fn finish(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder.build().wrap_err("Failed to build configuration")?;
        let cfg: ThemeCap = settings
            .try_deserialize::<ThemeCap>()
            .wrap_err("Failed to deserialize configuration")?;

        cfg.run_validation()?;
        info!("Configuration validation successful");

        Ok(cfg)
    }

    /// get the global config file path
    pub fn global_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_eyre("Unable to determine system config directory")
            .suggestion("Ensure XDG_CONFIG_HOME or HOME environment variables are set")
            .suggestion("On Windows, APPDATA should be set")?;

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// load default config from embedded default config file
    fn load_defaults() -> Result<Self> {
        toml::from_str(include_str!("../../resources/themecap.default.toml"))
            .wrap_err("Failed to parse embedded default configuration")
            .note("This is a bug - the embedded defaults are malformed")
    }

    /// create a config builder with defaults
    fn create_builder(defaults: &ThemeCap) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let config_source = Config::try_from(defaults)
            .wrap_err("Failed to convert the default configuration to a config source")?;

        Ok(Config::builder().add_source(config_source))
    }

    /// run validation and return a pretty error if it fails
    fn run_validation(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| eyre!(format_validation_errors(&errors)))
            .wrap_err("config validation failed")
            .suggestion("Check your themecap.toml for invalid values")
            .suggestion("Run with --gen-default to see valid options")
    }

    /// find the nearest local config file
    fn find_local_config() -> Result<Option<PathBuf>> {
        let curr_dir = std::env::current_dir()
            .wrap_err("Failed to get current working directory")
            .suggestion("Ensure the current directory exists and is accessible")?;

        Ok(curr_dir
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
            .find(|path| path.exists()))
    }

    /// create the default config file
    fn create_default_config(path: &Path, defaults: &ThemeCap) -> Result<()> {
        let config_dir = path
            .parent()
            .ok_or_eyre("Unable to determine parent directory of config path")?;

        std::fs::create_dir_all(config_dir)
            .wrap_err("Failed to create config directory")
            .with_section(|| format!("{}", config_dir.display()).header("Directory:"))?;

        defaults
            .save_to_file(path)
            .wrap_err("Failed to write default configuration file")?;

        info!(path = %path.display(), "Created default configuration");
        Ok(())
    }

    /// save config to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml_str =
            toml::to_string_pretty(self).wrap_err("Failed to serialize config to TOML")?;

        std::fs::write(path, &toml_str)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))
            .with_section(|| path.display().to_string().header("File path"))
            .with_section(|| format!("{} bytes", toml_str.len()).header("Content size:"))?;

        Ok(())
    }

    /// save config to the global config location
    pub fn save(&self) -> Result<()> {
        let path = Self::global_config_path()?;
        self.save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    #[test]
    fn test_embedded_defaults_match_struct_defaults() {
        let embedded = ThemeCap::load_defaults().unwrap();
        let built = ThemeCap::default();

        assert_eq!(
            toml::to_string(&embedded).unwrap(),
            toml::to_string(&built).unwrap()
        );
        assert!(embedded.validate().is_ok());
    }

    #[test]
    fn test_load_from_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[themes]\nnames = [\"dark\"]\n\n[export]\ndir = \"out\"\ncsv = true\n",
        )
        .unwrap();

        let cfg = ThemeCap::load_from(&path).unwrap();
        let export = cfg.export.unwrap();

        assert_eq!(cfg.themes.unwrap().names.unwrap(), ["dark"]);
        assert_eq!(export.dir.as_deref(), Some("out"));
        assert_eq!(export.csv, Some(true));
        assert_eq!(export.workbook, Some(true));
        assert_eq!(cfg.host.unwrap().dir.as_deref(), Some("host"));
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[themes]\nnames = [\"dark\", \"dark\"]\n").unwrap();

        let err = ThemeCap::load_from(&path).unwrap_err();
        assert!(format!("{:?}", err).contains("names"));
    }

    #[test]
    fn test_save_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved.toml");

        ThemeCap::default().save_to_file(&path).unwrap();
        let loaded = ThemeCap::load_from(&path).unwrap();

        assert_eq!(
            loaded.capture.unwrap().sources.unwrap(),
            SourceCategory::ALL.to_vec()
        );
    }
}

//! configuration validation stuff
use {
    crate::{config::options::*, validator, validator_nested},
    hashbrown::HashSet,
};

/// trait for validating config structs
pub trait Validate {
    /// validate the config
    fn validate(&self) -> Result<(), Vec<String>>;

    /// check if the config is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// whether every item of a list is distinct
fn all_distinct<T: Eq + std::hash::Hash>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item))
}

validator! { ThemesCfg,
    names => |v: &Vec<String>| !v.is_empty(),
        "must list at least one theme";
    names => |v: &Vec<String>| v.iter().all(|n| !n.trim().is_empty()),
        "must not contain empty names";
    names => |v: &Vec<String>| all_distinct(v),
        "must not contain the same theme twice";
}

validator! { HostCfg,
    dir => |v: &String| !v.trim().is_empty(),
        "must not be empty";
}

validator! { CaptureCfg,
    sources => |v: &Vec<crate::models::SourceCategory>| !v.is_empty(),
        "must list at least one source";
    sources => |v: &Vec<crate::models::SourceCategory>| all_distinct(v),
        "must not contain the same source twice";
}

impl Validate for ExportCfg {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors: Vec<String> = Vec::new();

        if let Some(ref stem) = self.file_stem
            && (stem.trim().is_empty() || stem.contains(['/', '\\']))
        {
            errors.push("file_stem: must not be empty or contain path separators".to_string());
        }

        if let Some(ref dir) = self.dir
            && dir.trim().is_empty()
        {
            errors.push("dir: must not be empty when set".to_string());
        }

        let formats = [self.workbook, self.json, self.csv];
        if formats.iter().all(|f| *f == Some(false)) {
            errors.push(
                "workbook, json, csv: at least one export format must be enabled".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

validator! { LoggingConfig,
    level => |v: &String| VALID_LOG_LEVELS.contains(&v.to_lowercase().as_str()),
        "must be one of: trace, debug, info, warn, error, off";
}

validator_nested! { ThemeCap,
    fields: {}
    nested: {
        themes;
        host;
        capture;
        export;
        logging;
    }
}

/// format validation errors for display
pub fn format_validation_errors(errors: &[String]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, err) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, err));
    }
    output
}

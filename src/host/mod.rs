//! the host environment as seen by a capture run
//!
//! a host owns one piece of global state, its active theme, and knows how to enumerate and
//! resolve the themeable resources it exposes. [`ThemeSwitch`] covers the former and
//! [`SourceCatalog`] the latter
pub mod file;
pub mod memory;

use {
    crate::{
        color::NativeColor,
        models::{ResourceDescriptor, SourceCategory, ThemeName},
    },
    std::path::{Path, PathBuf},
    thiserror::Error,
};

/// something a host collaborator failed to do
#[derive(Debug, Error)]
pub enum HostError {
    /// a host file couldn't be read or written
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        /// the file involved
        path: PathBuf,
        /// the underlying error
        #[source]
        source: std::io::Error,
    },

    /// a host file isn't valid TOML for what it should hold
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// the file involved
        path: PathBuf,
        /// the underlying error
        #[source]
        source: toml::de::Error,
    },

    /// the active settings couldn't be put back, the backup was kept where it was
    #[error(
        "failed to restore {}: {source}. the original settings were kept at {}",
        .path.display(),
        .kept.display()
    )]
    RestoreKept {
        /// the active settings file
        path: PathBuf,
        /// the kept backup
        kept: PathBuf,
        /// the underlying error
        #[source]
        source: std::io::Error,
    },

    /// the host has no theme by that name
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    /// a resource of a keyed source was listed without a stable key
    #[error("{category} '{name}' has no stable key")]
    MissingKey {
        /// the source of the resource
        category: SourceCategory,
        /// the resource name
        name: String,
    },

    /// a resource of a keyed source was listed twice under the same stable key
    #[error("{category} key '{key}' is listed more than once")]
    DuplicateKey {
        /// the source of the resource
        category: SourceCategory,
        /// the repeated key
        key: String,
    },

    /// the host refused the request
    #[error("host rejected the request: {0}")]
    Rejected(String),
}

impl HostError {
    /// the backup left behind by a failed restore, if any
    pub fn kept_backup(&self) -> Option<&Path> {
        match self {
            Self::RestoreKept { kept, .. } => Some(kept),
            _ => None,
        }
    }
}

/// the host's active theme, a single piece of global mutable state
///
/// implementations are not expected to be reentrant. callers go through
/// [`crate::capture::switch::ScopedThemeSwitch`], which takes a backup before applying anything
/// and restores it exactly once on every exit path
#[async_trait::async_trait]
pub trait ThemeSwitch: Send + Sync {
    /// an opaque token holding the configuration to go back to
    type Backup: Send;

    /// capture the current theme configuration
    async fn backup(&self) -> Result<Self::Backup, HostError>;

    /// make a theme the active one
    async fn apply(&self, theme: &ThemeName) -> Result<(), HostError>;

    /// re-apply a backed up configuration, consuming the token
    async fn restore(&self, backup: Self::Backup) -> Result<(), HostError>;
}

/// the themeable resources a host exposes
#[async_trait::async_trait]
pub trait SourceCatalog: Send + Sync {
    /// list the resources of a source
    ///
    /// the result must not depend on the active theme and must come back in the same order
    /// every time
    async fn descriptors(
        &self,
        source: SourceCategory,
    ) -> Result<Vec<ResourceDescriptor>, HostError>;

    /// resolve a resource's color under the active theme
    ///
    /// `Ok(None)` means the host has no value for it right now. never mutates host state
    async fn resolve(
        &self,
        descriptor: &ResourceDescriptor,
    ) -> Result<Option<NativeColor>, HostError>;
}

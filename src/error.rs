//! error handling stuff
use {
    crate::{
        host::HostError,
        models::{SourceCategory, ThemeName},
    },
    miette::Diagnostic,
    std::path::PathBuf,
    thiserror::Error,
};

#[derive(Debug, Error, Diagnostic)]
/// An error
pub enum TcError {
    /// the host theme state couldn't be backed up, nothing was touched
    #[error("failed to back up the active theme: {0}")]
    #[diagnostic(code(themecap::theme::backup))]
    ThemeBackup(#[source] HostError),

    /// a theme couldn't be applied (the original theme was restored afterwards)
    #[error("failed to apply theme '{theme}': {source}")]
    #[diagnostic(
        code(themecap::theme::apply),
        help("check that the theme exists on the host and is spelled the same way")
    )]
    ThemeApply {
        /// the theme being applied
        theme: ThemeName,
        /// what the host reported
        #[source]
        source: HostError,
    },

    /// the original theme couldn't be restored, the host may be left on a captured theme
    #[error("failed to restore the original theme, host state may be inconsistent: {source}")]
    #[diagnostic(
        code(themecap::theme::restore),
        help(
            "re-apply your usual theme on the host by hand, or copy back the kept backup if the \
             error names one"
        )
    )]
    ThemeRestore {
        /// what the host reported
        #[source]
        source: HostError,
        /// the error that was already in flight when the restore was attempted, if any
        #[related]
        interrupted: Vec<TcError>,
    },

    /// no themes were requested
    #[error("no themes to capture")]
    #[diagnostic(code(themecap::theme::none), help("set `themes.names` or pass --themes"))]
    NoThemes,

    /// the same theme was requested twice
    #[error("theme '{0}' was requested more than once")]
    #[diagnostic(code(themecap::theme::duplicate))]
    DuplicateTheme(ThemeName),

    /// the descriptors of a source couldn't be enumerated
    #[error("failed to enumerate {category} resources: {error}")]
    #[diagnostic(code(themecap::catalog))]
    Catalog {
        /// the source being enumerated
        category: SourceCategory,
        /// what the host reported
        #[source]
        error: HostError,
    },

    /// the host failed (rather than simply having no value) while resolving a resource
    #[error("failed to resolve '{identity}' under theme '{theme}': {error}")]
    #[diagnostic(code(themecap::resolve))]
    Resolve {
        /// the active theme
        theme: ThemeName,
        /// the resource being resolved
        identity: String,
        /// what the host reported
        #[source]
        error: HostError,
    },

    /// positional snapshots disagree in length
    #[error(
        "{category} snapshot for theme '{theme}' has {found} entries, expected {expected} \
         (positional merge needs theme-independent enumeration)"
    )]
    #[diagnostic(code(themecap::merge::arity))]
    MergeArityMismatch {
        /// the source being merged
        category: SourceCategory,
        /// the theme whose snapshot is off
        theme: ThemeName,
        /// the length of the first snapshot
        expected: usize,
        /// the length of the offending snapshot
        found: usize,
    },

    /// positional snapshots disagree on which resource sits at an index
    #[error(
        "{category} snapshots are misaligned at index {index}: expected '{expected}', found \
         '{found}'"
    )]
    #[diagnostic(code(themecap::merge::misaligned))]
    MergeMisaligned {
        /// the source being merged
        category: SourceCategory,
        /// the index where identities diverge
        index: usize,
        /// the identity in the first snapshot
        expected: String,
        /// the identity in the offending snapshot
        found: String,
    },

    /// a positional snapshot lists the same resource twice
    #[error("{category} resource '{identity}' appears more than once (at index {index})")]
    #[diagnostic(
        code(themecap::merge::duplicate),
        help("positionally merged resources need a unique stable key each")
    )]
    MergeDuplicate {
        /// the source being merged
        category: SourceCategory,
        /// the repeated identity
        identity: String,
        /// the index of the repeat
        index: usize,
    },

    /// snapshots of different sources were handed to a single merge
    #[error("cannot merge {expected} snapshots with {found} snapshots")]
    #[diagnostic(code(themecap::merge::mixed))]
    MixedSources {
        /// the source of the first snapshot
        expected: SourceCategory,
        /// the source of the offending snapshot
        found: SourceCategory,
    },

    /// the run was interrupted (the original theme was restored first)
    #[error("capture cancelled")]
    #[diagnostic(code(themecap::cancelled))]
    Cancelled,

    /// an export file couldn't be written
    #[error("failed to write {}: {source}", .path.display())]
    #[diagnostic(
        code(themecap::export::io),
        help("make sure the file isn't open in another program and the directory is writable")
    )]
    Export {
        /// the target path
        path: PathBuf,
        /// the underlying io error
        #[source]
        source: std::io::Error,
    },

    /// an IO error
    #[error("i/o error: {0}")]
    IO(#[from] std::io::Error),

    /// a json error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// a csv error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// a workbook error
    #[error("workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// a host error outside of a theme switch
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// a report from color_eyre
    #[error("{0}")]
    EyreReport(#[from] color_eyre::Report),

    /// a custom error
    #[error("error: {0}")]
    Other(String),
}

impl TcError {
    /// whether this error means the host may not be back on its original theme
    pub fn host_left_dirty(&self) -> bool {
        matches!(self, Self::ThemeRestore { .. })
    }
}

impl From<String> for TcError {
    fn from(value: String) -> Self {
        Self::Other(value)
    }
}

/// A result using [`TcError`] as the `Err` variant
pub type Result<T, U = TcError> = miette::Result<T, U>;

/// bail
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::error::TcError::from(String::from($msg)))
    };

    ($err:expr $(,)?) => {
        return Err($crate::error::TcError::from($err))
    };

    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::TcError::from(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_failure_is_distinct() {
        let err = TcError::ThemeRestore {
            source: HostError::Rejected("locked".into()),
            interrupted: vec![TcError::Cancelled],
        };

        assert!(err.host_left_dirty());
        assert!(!TcError::Cancelled.host_left_dirty());
        assert!(err.to_string().contains("inconsistent"));
    }

    #[test]
    fn test_restore_failure_reports_the_inflight_error() {
        let err = TcError::ThemeRestore {
            source: HostError::Rejected("locked".into()),
            interrupted: vec![TcError::ThemeApply {
                theme: "dark".into(),
                source: HostError::UnknownTheme("dark".into()),
            }],
        };

        let related: Vec<String> = err
            .related()
            .into_iter()
            .flatten()
            .map(|e| e.to_string())
            .collect();

        assert_eq!(related, ["failed to apply theme 'dark': unknown theme 'dark'"]);
    }

    #[test]
    fn test_bail_formats() {
        fn fails(n: usize) -> Result<()> {
            bail!("bad count: {}", n);
        }

        assert_eq!(fails(3).unwrap_err().to_string(), "error: bad count: 3");
    }
}

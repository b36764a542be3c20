//! the snapshot-and-merge pipeline
//!
//! [`ThemeCapture`] enumerates every source once, applies each theme in turn through a
//! [`ScopedThemeSwitch`](switch::ScopedThemeSwitch), snapshots every source under it, puts the
//! original theme back and merges the snapshots per source
pub mod interrupt;
pub mod merge;
pub mod snapshot;
pub mod switch;

use {
    crate::{
        capture::{interrupt::InterruptHandler, snapshot::Snapshotter, switch::ScopedThemeSwitch},
        error::{Result, TcError},
        host::{SourceCatalog, ThemeSwitch},
        models::{
            MergedDataset, ResourceDescriptor, Snapshot, SourceCategory, SourceRecords, ThemeName,
        },
    },
    hashbrown::HashSet,
    tracing::{info, warn},
};

/// one capture run over a host
pub struct ThemeCapture<H> {
    /// the host, owned for the whole run
    host: H,
    /// the themes to capture, in order
    themes: Vec<ThemeName>,
    /// the sources to capture, in order
    sources: Vec<SourceCategory>,
    /// stops the run between host calls
    interrupt: InterruptHandler,
}

impl<H: ThemeSwitch + SourceCatalog> ThemeCapture<H> {
    /// capture every source of `host` under `themes`
    pub fn new<T: Into<ThemeName>>(host: H, themes: impl IntoIterator<Item = T>) -> Self {
        Self {
            host,
            themes: themes.into_iter().map(Into::into).collect(),
            sources: SourceCategory::ALL.to_vec(),
            interrupt: InterruptHandler::new(),
        }
    }

    /// only capture these sources, in this order
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = SourceCategory>) -> Self {
        let mut seen = HashSet::new();
        self.sources = sources.into_iter().filter(|s| seen.insert(*s)).collect();
        self
    }

    /// share a cancellation flag with the run
    pub fn with_interrupt(mut self, interrupt: InterruptHandler) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// the host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// give the host back
    pub fn into_host(self) -> H {
        self.host
    }

    /// the themes that will be captured
    pub fn themes(&self) -> &[ThemeName] {
        &self.themes
    }

    /// run the whole pipeline
    ///
    /// the host's active theme is the same before and after, unless
    /// [`TcError::ThemeRestore`] is returned
    ///
    /// # Errors
    ///
    /// returns [`TcError::NoThemes`] or [`TcError::DuplicateTheme`] for a bad theme list, before
    /// the host is touched
    /// returns [`TcError::Catalog`] if a source can't be enumerated, before the host is touched
    /// returns any error of [`ScopedThemeSwitch::run_under_themes`], [`Snapshotter::capture`] or
    /// [`merge::merge`]
    pub async fn run(&mut self) -> Result<MergedDataset> {
        self.check_themes()?;

        let catalog = self.enumerate().await?;
        let mut snapshots: Vec<Vec<Snapshot>> = catalog.iter().map(|_| Vec::new()).collect();
        let snapshotter = Snapshotter::new(&self.host).with_interrupt(self.interrupt.clone());

        ScopedThemeSwitch::new(&self.host)
            .with_interrupt(self.interrupt.clone())
            .run_under_themes(&self.themes, async |theme: &ThemeName| {
                for ((source, descriptors), taken) in catalog.iter().zip(snapshots.iter_mut()) {
                    taken.push(snapshotter.capture(*source, descriptors, theme).await?);
                }

                Ok(())
            })
            .await?;

        let mut dataset = MergedDataset {
            themes: self.themes.clone(),
            ..Default::default()
        };

        for ((source, _), taken) in catalog.iter().zip(&snapshots) {
            dataset
                .gaps
                .extend(taken.iter().flat_map(|s| s.gaps().iter().cloned()));

            let records = merge::merge(*source, taken)?;
            info!(%source, records = records.len(), "Merged source");

            dataset.sources.push(SourceRecords {
                source: *source,
                records,
            });
        }

        if !dataset.gaps.is_empty() {
            warn!(
                gaps = dataset.gaps.len(),
                "Some resources could not be resolved under every theme"
            );
        }

        Ok(dataset)
    }

    /// reject empty and repeating theme lists
    fn check_themes(&self) -> Result<()> {
        if self.themes.is_empty() {
            return Err(TcError::NoThemes);
        }

        let mut seen = HashSet::with_capacity(self.themes.len());

        match self.themes.iter().find(|theme| !seen.insert(*theme)) {
            Some(theme) => Err(TcError::DuplicateTheme(theme.clone())),
            None => Ok(()),
        }
    }

    /// list the descriptors of every source, once, since they don't depend on the theme
    async fn enumerate(&self) -> Result<Vec<(SourceCategory, Vec<ResourceDescriptor>)>> {
        let mut catalog = Vec::with_capacity(self.sources.len());

        for &source in &self.sources {
            let descriptors = self
                .host
                .descriptors(source)
                .await
                .map_err(|error| TcError::Catalog {
                    category: source,
                    error,
                })?;

            info!(%source, descriptors = descriptors.len(), "Enumerated source");
            catalog.push((source, descriptors));
        }

        Ok(catalog)
    }
}

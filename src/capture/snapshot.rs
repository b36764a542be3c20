//! capturing one source under the active theme
use {
    crate::{
        capture::interrupt::InterruptHandler,
        error::{Result, TcError},
        host::SourceCatalog,
        models::{
            ResolutionGap, ResourceDescriptor, Snapshot, SnapshotEntry, SourceCategory, ThemeName,
        },
    },
    tracing::{debug, info},
};

/// how many descriptors are resolved between two interrupt checks
const INTERRUPT_CHECK_EVERY: usize = 64;

/// resolves descriptors against the active theme
pub struct Snapshotter<'h, C: SourceCatalog + ?Sized> {
    /// the host
    catalog: &'h C,
    /// checked before a source and every [`INTERRUPT_CHECK_EVERY`] descriptors
    interrupt: Option<InterruptHandler>,
}

impl<'h, C: SourceCatalog + ?Sized> Snapshotter<'h, C> {
    /// make a snapshotter over a host's catalog
    pub fn new(catalog: &'h C) -> Self {
        Self {
            catalog,
            interrupt: None,
        }
    }

    /// stop between batches once `interrupt` is triggered
    pub fn with_interrupt(mut self, interrupt: InterruptHandler) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// whether the run should stop here
    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(InterruptHandler::check_and_reset)
    }

    /// resolve every descriptor of a source under the active theme
    ///
    /// `theme` must already be applied, it only tags the snapshot. descriptors the host has no
    /// value for are left out and recorded as gaps, colors are normalized on the way in
    ///
    /// # Errors
    ///
    /// returns [`TcError::MixedSources`] if a descriptor belongs to another source
    /// returns [`TcError::Resolve`] if the host fails while resolving
    /// returns [`TcError::Cancelled`] if the interrupt handler was triggered
    pub async fn capture(
        &self,
        source: SourceCategory,
        descriptors: &[ResourceDescriptor],
        theme: &ThemeName,
    ) -> Result<Snapshot> {
        if self.interrupted() {
            return Err(TcError::Cancelled);
        }

        let mut entries = Vec::with_capacity(descriptors.len());
        let mut gaps = Vec::new();

        for (i, descriptor) in descriptors.iter().enumerate() {
            if i > 0 && i % INTERRUPT_CHECK_EVERY == 0 && self.interrupted() {
                return Err(TcError::Cancelled);
            }

            if descriptor.source != source {
                return Err(TcError::MixedSources {
                    expected: source,
                    found: descriptor.source,
                });
            }

            let resolved = self
                .catalog
                .resolve(descriptor)
                .await
                .map_err(|error| TcError::Resolve {
                    theme: theme.clone(),
                    identity: descriptor.identity().to_string(),
                    error,
                })?;

            match resolved {
                Some(native) => entries.push(SnapshotEntry {
                    descriptor: descriptor.clone(),
                    color: native.normalize(),
                }),
                None => {
                    debug!(
                        theme = %theme,
                        %source,
                        identity = descriptor.identity(),
                        "Unresolved resource"
                    );

                    gaps.push(ResolutionGap {
                        theme: theme.clone(),
                        source,
                        identity: descriptor.identity().to_string(),
                    });
                }
            }
        }

        info!(
            theme = %theme,
            %source,
            resolved = entries.len(),
            skipped = gaps.len(),
            "Captured source"
        );

        Ok(Snapshot::new(theme.clone(), source, entries).with_gaps(gaps))
    }
}

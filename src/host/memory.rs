//! an in-memory host
//!
//! colors are looked up by `(theme, source, identity)` against whichever theme is active.
//! every backup, apply and restore is logged, and failures can be injected at each step
use {
    crate::{
        capture::interrupt::InterruptHandler,
        color::NativeColor,
        host::{HostError, SourceCatalog, ThemeSwitch},
        models::{ResourceDescriptor, SourceCategory, ThemeName},
    },
    hashbrown::HashMap,
    std::sync::{Mutex, MutexGuard, PoisonError},
};

/// something that happened to a [`MemoryHost`]'s theme state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// the active theme was backed up
    Backup,
    /// a theme was applied
    Apply(ThemeName),
    /// a backup was restored, holding the theme it went back to
    Restore(ThemeName),
}

/// the backup of a [`MemoryHost`]
#[derive(Debug)]
pub struct MemoryBackup {
    /// the theme that was active
    theme: ThemeName,
}

/// the mutable part of a [`MemoryHost`]
#[derive(Debug)]
struct MemoryState {
    /// the active theme
    active: ThemeName,
    /// every switch event so far
    events: Vec<HostEvent>,
}

/// colors per source per identity
type ThemeTable = HashMap<SourceCategory, HashMap<String, NativeColor>>;

/// a host that lives in memory
#[derive(Debug)]
pub struct MemoryHost {
    /// descriptors per source, in enumeration order
    catalog: HashMap<SourceCategory, Vec<ResourceDescriptor>>,
    /// the colors of every known theme
    themes: HashMap<ThemeName, ThemeTable>,
    /// a theme whose apply fails
    fail_apply: Option<ThemeName>,
    /// whether restoring fails
    fail_restore: bool,
    /// an identity whose resolution fails
    fail_resolve: Option<String>,
    /// a handler to trigger once a theme has been applied
    interrupt_after: Option<(ThemeName, InterruptHandler)>,
    /// the active theme and event log
    state: Mutex<MemoryState>,
}

impl MemoryHost {
    /// make an empty host with `active` as its current theme
    ///
    /// the initial theme doesn't need any colors, it only has to come back after a run
    pub fn new(active: impl Into<ThemeName>) -> Self {
        Self {
            catalog: HashMap::new(),
            themes: HashMap::new(),
            fail_apply: None,
            fail_restore: false,
            fail_resolve: None,
            interrupt_after: None,
            state: Mutex::new(MemoryState {
                active: active.into(),
                events: Vec::new(),
            }),
        }
    }

    /// list a resource, after any already listed for its source
    pub fn with_resource(mut self, descriptor: ResourceDescriptor) -> Self {
        self.catalog
            .entry(descriptor.source)
            .or_default()
            .push(descriptor);
        self
    }

    /// make a theme applicable, even with no colors
    pub fn with_theme(mut self, theme: impl Into<ThemeName>) -> Self {
        self.themes.entry(theme.into()).or_default();
        self
    }

    /// give a resource a color under a theme, making the theme applicable
    pub fn with_color(
        mut self,
        theme: impl Into<ThemeName>,
        source: SourceCategory,
        identity: impl Into<String>,
        color: NativeColor,
    ) -> Self {
        self.themes
            .entry(theme.into())
            .or_default()
            .entry(source)
            .or_default()
            .insert(identity.into(), color);
        self
    }

    /// make applying `theme` fail
    pub fn fail_apply_on(mut self, theme: impl Into<ThemeName>) -> Self {
        self.fail_apply = Some(theme.into());
        self
    }

    /// make every restore fail
    pub fn fail_restore(mut self) -> Self {
        self.fail_restore = true;
        self
    }

    /// make resolving `identity` fail under every theme
    pub fn fail_resolve_on(mut self, identity: impl Into<String>) -> Self {
        self.fail_resolve = Some(identity.into());
        self
    }

    /// trigger `handler` right after `theme` is applied
    pub fn interrupt_after(
        mut self,
        theme: impl Into<ThemeName>,
        handler: InterruptHandler,
    ) -> Self {
        self.interrupt_after = Some((theme.into(), handler));
        self
    }

    /// lock the mutable state
    ///
    /// a panic while holding the lock can't leave the state half-written, so poisoning is
    /// ignored
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// the active theme
    pub fn active(&self) -> ThemeName {
        self.state().active.clone()
    }

    /// every switch event so far
    pub fn events(&self) -> Vec<HostEvent> {
        self.state().events.clone()
    }

    /// how many times a backup was restored
    pub fn restore_count(&self) -> usize {
        self.state()
            .events
            .iter()
            .filter(|event| matches!(event, HostEvent::Restore(_)))
            .count()
    }
}

#[async_trait::async_trait]
impl ThemeSwitch for MemoryHost {
    type Backup = MemoryBackup;

    async fn backup(&self) -> Result<MemoryBackup, HostError> {
        let mut state = self.state();
        state.events.push(HostEvent::Backup);

        Ok(MemoryBackup {
            theme: state.active.clone(),
        })
    }

    async fn apply(&self, theme: &ThemeName) -> Result<(), HostError> {
        let mut state = self.state();
        state.events.push(HostEvent::Apply(theme.clone()));

        if self.fail_apply.as_ref() == Some(theme) {
            return Err(HostError::Rejected(format!("cannot apply '{}'", theme)));
        }

        if !self.themes.contains_key(theme) {
            return Err(HostError::UnknownTheme(theme.to_string()));
        }

        state.active = theme.clone();

        if let Some((after, handler)) = &self.interrupt_after
            && after == theme
        {
            handler.trigger();
        }

        Ok(())
    }

    async fn restore(&self, backup: MemoryBackup) -> Result<(), HostError> {
        let mut state = self.state();
        state.events.push(HostEvent::Restore(backup.theme.clone()));

        if self.fail_restore {
            return Err(HostError::Rejected("settings store is locked".to_string()));
        }

        state.active = backup.theme;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SourceCatalog for MemoryHost {
    async fn descriptors(
        &self,
        source: SourceCategory,
    ) -> Result<Vec<ResourceDescriptor>, HostError> {
        Ok(self.catalog.get(&source).cloned().unwrap_or_default())
    }

    async fn resolve(
        &self,
        descriptor: &ResourceDescriptor,
    ) -> Result<Option<NativeColor>, HostError> {
        let identity = descriptor.identity();

        if self.fail_resolve.as_deref() == Some(identity) {
            return Err(HostError::Rejected(format!("cannot resolve '{}'", identity)));
        }

        let active = self.active();

        Ok(self
            .themes
            .get(&active)
            .and_then(|table| table.get(&descriptor.source))
            .and_then(|colors| colors.get(identity))
            .copied())
    }
}

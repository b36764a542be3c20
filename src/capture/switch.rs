//! the scoped theme switch
use {
    crate::{
        capture::interrupt::InterruptHandler,
        error::{Result, TcError},
        host::ThemeSwitch,
        models::ThemeName,
    },
    futures::FutureExt,
    std::panic::{AssertUnwindSafe, resume_unwind},
    tracing::{error, info},
};

/// exclusive, bracketed use of a host's active theme
///
/// the backup is taken before anything is applied and restored exactly once afterwards, whether
/// the themes all went through, one of them failed, the body failed or panicked, or the run was
/// cancelled through the [`InterruptHandler`]
///
/// a run has to be driven to completion. dropping the future halfway skips the restore, so stop
/// a run by triggering the interrupt handler instead
pub struct ScopedThemeSwitch<'h, S: ThemeSwitch + ?Sized> {
    /// the host
    switch: &'h S,
    /// checked before each theme is applied
    interrupt: Option<InterruptHandler>,
}

impl<'h, S: ThemeSwitch + ?Sized> ScopedThemeSwitch<'h, S> {
    /// wrap a host's theme switch
    pub fn new(switch: &'h S) -> Self {
        Self {
            switch,
            interrupt: None,
        }
    }

    /// stop between themes once `interrupt` is triggered
    pub fn with_interrupt(mut self, interrupt: InterruptHandler) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// apply each theme in order and run `body` under it, then put the original theme back
    ///
    /// # Errors
    ///
    /// returns [`TcError::ThemeBackup`] if the backup can't be taken, nothing is touched then
    /// returns [`TcError::ThemeApply`] if a theme can't be applied, the rest are skipped
    /// returns whatever `body` returns if it fails, the rest are skipped
    /// returns [`TcError::Cancelled`] if the interrupt handler was triggered
    /// returns [`TcError::ThemeRestore`] if the original theme can't be restored, carrying the
    /// error that was already in flight, if any
    pub async fn run_under_themes<F>(&mut self, themes: &[ThemeName], mut body: F) -> Result<()>
    where
        F: AsyncFnMut(&ThemeName) -> Result<()>,
    {
        let backup = self.switch.backup().await.map_err(TcError::ThemeBackup)?;
        info!("Backed up the active theme");

        let outcome = AssertUnwindSafe(self.apply_each(themes, &mut body))
            .catch_unwind()
            .await;

        info!("Restoring the original theme");
        let restored = self.switch.restore(backup).await;

        match (outcome, restored) {
            (Err(panic), restored) => {
                if let Err(e) = restored {
                    error!(error = %e, "Failed to restore the original theme after a panic");
                }

                resume_unwind(panic)
            }
            (Ok(outcome), Ok(())) => outcome,
            (Ok(outcome), Err(source)) => {
                error!(error = %source, "Failed to restore the original theme");

                Err(TcError::ThemeRestore {
                    source,
                    interrupted: outcome.err().into_iter().collect(),
                })
            }
        }
    }

    /// the part of a run that happens between backup and restore
    async fn apply_each<F>(&self, themes: &[ThemeName], body: &mut F) -> Result<()>
    where
        F: AsyncFnMut(&ThemeName) -> Result<()>,
    {
        for theme in themes {
            if let Some(interrupt) = &self.interrupt
                && interrupt.check_and_reset()
            {
                info!(theme = %theme, "Interrupted before applying theme");
                return Err(TcError::Cancelled);
            }

            info!(theme = %theme, "Applying theme");
            self.switch
                .apply(theme)
                .await
                .map_err(|source| TcError::ThemeApply {
                    theme: theme.clone(),
                    source,
                })?;

            body(theme).await?;
        }

        Ok(())
    }
}

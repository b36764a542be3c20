//! the core app
use {
    super::{cli::Cli, logging, preview},
    crate::{
        capture::{ThemeCapture, interrupt::InterruptHandler},
        config::{
            instance::{config_mut, reload_config},
            options::ThemeCap,
        },
        error::{Result, TcError},
        export::{ExportPlan, ExportReport, export},
        getopt,
        host::file::FileHost,
        models::ThemeName,
        utils::expand_dir,
    },
    clap::Parser,
    color_eyre::eyre::Context,
    std::path::PathBuf,
    tracing::{info, warn},
};

/// the themecap app
pub struct TcApp {
    /// the parsed command line
    cli: Cli,
    /// triggered by ctrl+c
    interrupt: InterruptHandler,
}

impl TcApp {
    /// initialize themecap
    ///
    /// - 1. installs the miette error handler hook
    /// - 2. parses the command line and handles the generator flags
    /// - 3. loads the config file
    /// - 4. sets up logging
    /// - 5. sets up the ctrl+c handler
    ///
    /// returns `None` if a generator flag was handled and there's nothing left to do
    ///
    /// # Errors
    ///
    /// returns an error if the miette hook can't be installed
    /// returns an error if a generator fails
    /// returns an error if the configuration can't be loaded or is invalid
    /// returns an error if it fails to setup logging
    /// returns an error if it fails to setup the interrupt handler
    pub async fn init() -> Result<Option<Self>> {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::MietteHandlerOpts::new()
                    .terminal_links(true)
                    .unicode(true)
                    .context_lines(3)
                    .tab_width(4)
                    .build(),
            )
        }))
        .map_err(|e| TcError::Other(e.to_string()))?;

        let cli = Cli::parse();

        if cli.run_generators()? {
            return Ok(None);
        }

        match &cli.config {
            Some(path) => {
                let loaded = ThemeCap::load_from(path)?;
                *config_mut()? = loaded;
            }
            None => reload_config()?,
        }

        logging::setup()?;
        let interrupt = Self::setup_interrupt_handler()?;

        info!(
            "Starting {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        );

        Ok(Some(Self { cli, interrupt }))
    }

    /// capture, preview and export
    ///
    /// # Errors
    ///
    /// returns an error if the host can't be opened
    /// returns an error if the capture fails, see [`ThemeCapture::run`]
    /// returns an error if the export fails
    pub async fn run(&self) -> Result<()> {
        let host = FileHost::open(self.host_dir()).await?;
        let mut capture = ThemeCapture::new(host, self.themes())
            .with_sources(getopt!(capture.sources))
            .with_interrupt(self.interrupt.clone());

        let dataset = capture.run().await?;

        info!(
            records = dataset.record_count(),
            themes = dataset.themes.len(),
            gaps = dataset.gaps.len(),
            "Capture finished"
        );

        if self.cli.preview {
            preview::print_preview(&dataset);
        }

        let report = export(&dataset, &self.export_plan()).await?;

        for path in report.files() {
            println!("{}", path.display());
        }

        if self.cli.open || getopt!(export.open_after) {
            Self::open_workbook(&report);
        }

        Ok(())
    }

    /// the themes to capture, command line first
    fn themes(&self) -> Vec<ThemeName> {
        self.cli
            .themes
            .clone()
            .unwrap_or_else(|| getopt!(themes.names))
            .into_iter()
            .map(ThemeName::from)
            .collect()
    }

    /// the host directory, command line first
    fn host_dir(&self) -> PathBuf {
        self.cli
            .host_dir
            .clone()
            .unwrap_or_else(|| expand_dir(&getopt!(host.dir)))
    }

    /// the export plan from the config with command line overrides applied
    fn export_plan(&self) -> ExportPlan {
        let dir = self
            .cli
            .out_dir
            .clone()
            .or_else(|| getopt!(raw export.dir).map(|dir| expand_dir(&dir)))
            .unwrap_or_else(std::env::temp_dir);

        ExportPlan {
            file_stem: getopt!(export.file_stem),
            workbook: getopt!(export.workbook) && !self.cli.no_workbook,
            json: getopt!(export.json) && !self.cli.no_json,
            csv: getopt!(export.csv) || self.cli.csv,
            pretty_json: getopt!(export.pretty_json),
            ..ExportPlan::new(dir)
        }
    }

    /// open the workbook with the system handler, if one was written
    fn open_workbook(report: &ExportReport) {
        let Some(workbook) = &report.workbook else {
            warn!("No workbook was written, nothing to open");
            return;
        };

        if let Err(e) = open::that_detached(workbook) {
            warn!(error = %e, path = %workbook.display(), "Failed to open the workbook");
        }
    }

    /// setup the interruption handler
    fn setup_interrupt_handler() -> Result<InterruptHandler> {
        let handler = InterruptHandler::new();
        let handler_clone = handler.clone();

        ctrlc::set_handler(move || {
            handler_clone.trigger();
        })
        .context("failed to set Ctrl+C handler")?;

        Ok(handler)
    }
}

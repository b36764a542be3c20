//! cli stuff
use {
    crate::config::options::ThemeCap,
    clap::Parser,
    color_eyre::{Report, eyre::Result},
    schemars::generate::SchemaSettings,
    std::{
        fs::OpenOptions,
        io::{BufWriter, Write},
        path::PathBuf,
    },
};

/// Capture the colors of every themed resource of a host under several themes
#[derive(Debug, Default, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Load configuration from this file only (plus built-in defaults)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The host directory to capture from
    #[arg(long, value_name = "DIR")]
    pub host_dir: Option<PathBuf>,

    /// Themes to capture, comma separated, in order
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub themes: Option<Vec<String>>,

    /// Where to write the exported files
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Skip the xlsx workbook
    #[arg(long)]
    pub no_workbook: bool,

    /// Also write one csv file per source
    #[arg(long)]
    pub csv: bool,

    /// Skip the json document
    #[arg(long)]
    pub no_json: bool,

    /// Print the merged colors to the terminal
    #[arg(short, long)]
    pub preview: bool,

    /// Open the workbook once it's written
    #[arg(long)]
    pub open: bool,

    /// Save instead of printing
    #[arg(long)]
    pub save: bool,

    /// Generate a JSON schemafile based on the defaults
    #[arg(short = 's', long)]
    pub gen_schema: bool,

    /// Generate the default config file
    #[arg(short = 'd', long)]
    pub gen_default: bool,

    /// Generate both the schema and the default config file
    #[arg(short = 'a', long)]
    pub gen_all: bool,
}

impl Cli {
    /// handle the generator flags
    ///
    /// returns whether anything was generated, in which case there's nothing left to do
    ///
    /// # Errors
    ///
    /// returns an error if it fails to generate and/or save the json schema
    /// returns an error if it fails to generate and/or save the default config
    pub fn run_generators(&self) -> Result<bool> {
        if self.gen_schema || self.gen_all {
            Self::gen_schema(self.save)?;
        }

        if self.gen_default || self.gen_all {
            Self::gen_defaults(self.save)?;
        }

        Ok(self.gen_schema || self.gen_default || self.gen_all)
    }

    /// save a string to a file
    ///
    /// # Arguments
    ///
    /// * `path` - the path to the file being written
    /// * `contents` - the data to write to the file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to open `path`
    pub fn write_to_file(path: &str, contents: &str) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;
        let mut w = BufWriter::new(file);
        w.write_all(contents.as_bytes()).map_err(Report::new)
    }

    /// the config schema as pretty json
    pub fn schema() -> Result<String> {
        let settings = SchemaSettings::draft2020_12().for_serialize();
        let generator = settings.into_generator();
        let schema = generator.into_root_schema_for::<ThemeCap>();

        Ok(serde_json::to_string_pretty(&schema)?)
    }

    /// generate/save the config schema
    ///
    /// # Arguments
    ///
    /// * `save` - save instead of printing
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the schema to a JSON string
    /// returns an error if it fails to save the schema to `resources/themecap.schema.json`
    pub fn gen_schema(save: bool) -> Result<()> {
        let schema_str = Self::schema()?;

        if save {
            Self::write_to_file("resources/themecap.schema.json", &schema_str)?;
        } else {
            println!("{}", schema_str);
        }

        Ok(())
    }

    /// generate/save the default config file
    ///
    /// # Arguments
    ///
    /// * `save` - save instead of printing
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the default config to TOML
    /// returns an error if it fails to save the default config to `resources/themecap.default.toml`
    pub fn gen_defaults(save: bool) -> Result<()> {
        let defaults = toml::to_string_pretty(&ThemeCap::default())?;

        if save {
            Self::write_to_file("resources/themecap.default.toml", &defaults)?;
        } else {
            println!("{}", defaults);
        }

        Ok(())
    }
}

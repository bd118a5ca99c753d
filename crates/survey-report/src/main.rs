#![doc = include_str!("../README.md")]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use survey_report::font::SystemFontResolver;
use survey_report::{Format, ReportFeat, ReportUser, SurveyRecord, SurveyReport, UploadedImage};

/// Renders a survey record into a report.
#[derive(Debug, Clone, Parser)]
#[clap(name = "survey-report", version)]
pub struct ReportArgs {
    /// Path to the survey record, as JSON
    #[clap(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path to output file. Defaults to the suggested file name
    #[clap(value_name = "OUTPUT", default_value = None)]
    pub output: Option<PathBuf>,

    /// The format of the report
    #[clap(long, short, value_enum, default_value_t = Format::Pdf)]
    pub format: Format,

    /// Path to a TOML file overriding the report features
    #[clap(long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// The full name printed in the report footer
    #[clap(long, default_value = "")]
    pub user: String,

    /// Photos not uploaded yet, drawn instead of the record's top-level
    /// images
    #[clap(long = "upload", value_name = "IMAGE")]
    pub uploads: Vec<PathBuf>,

    /// Looks fonts up in the system font database instead of probing the
    /// configured directories
    #[clap(long)]
    pub system_fonts: bool,

    /// Prints a text outline of the report instead of writing it
    #[clap(long)]
    pub outline: bool,

    /// Logs every fetched photo and layout decision
    #[clap(long, short)]
    pub verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = ReportArgs::parse();

    // Starts logging
    let _ = {
        use log::LevelFilter::*;

        let level = if args.verbose { Debug } else { Info };
        env_logger::builder()
            .filter_module("survey_report", level)
            .try_init()
    };

    let feat = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            ReportFeat::from_toml_str(&content)?
        }
        None => ReportFeat::default(),
    };

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read record {}", args.input.display()))?;
    let mut record: SurveyRecord = serde_json::from_str(&input)
        .with_context(|| format!("invalid record {}", args.input.display()))?;

    for path in &args.uploads {
        let data =
            std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        record.uploads.push(UploadedImage::new(name, data));
    }

    let mut builder = SurveyReport::new(ReportUser::new(args.user))
        .with_feature(feat)
        .with_format(args.format);
    if args.system_fonts {
        builder = builder.with_font_resolver(SystemFontResolver::default());
    }

    if args.outline {
        let outline = builder.outline(&record)?;
        std::io::stdout().write_all(outline.as_bytes())?;
        return Ok(());
    }

    let report = builder.build(&record)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&report.filename));
    std::fs::write(&output, &report.bytes)
        .with_context(|| format!("cannot write {}", output.display()))?;

    Ok(())
}

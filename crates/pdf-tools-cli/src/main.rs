mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logger::CliLogger;
use pdf_collate::{
    LopdfBackend, MergeOptions, Orientation, PaperSize, SizeMode, SplitMode, TransformMode,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdft", about = "Merge and split PDFs with page size normalization", version)]
struct Cli {
    /// More log output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge PDFs into one, normalizing every page to a single size
    Merge {
        /// Input PDF files, in merge order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Pages to delete per input, in input order (e.g. "1,3-4"; "" keeps all)
        #[arg(short, long, num_args = 1..)]
        delete: Vec<String>,

        #[command(flatten)]
        settings: MergeSettings,
    },

    /// Split a PDF into several documents
    Split {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory receiving the parts
        #[arg(short, long)]
        output_dir: PathBuf,

        /// One page spec per output document; one document per page when omitted
        #[arg(short, long, num_args = 1..)]
        ranges: Vec<String>,
    },

    /// Report the page sizes of PDFs and the size a merge would choose
    Sizes {
        /// Input PDF files
        #[arg(required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        #[command(flatten)]
        settings: MergeSettings,
    },

    /// Preview which pages a page spec selects
    Pages {
        /// Page spec, e.g. "1,3,5-7"
        spec: String,

        /// Page count of the document the page spec applies to
        #[arg(short, long)]
        total: Option<usize>,
    },
}

#[derive(Args)]
struct MergeSettings {
    /// JSON options file; flags given below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// How the target page size is chosen
    #[arg(long, value_enum)]
    size_mode: Option<SizeModeArg>,

    /// How pages are placed on the target canvas
    #[arg(long, value_enum)]
    transform: Option<TransformArg>,

    /// Size used when no input page has a usable size
    #[arg(long, value_enum)]
    default_paper: Option<PaperArg>,

    /// Orientation of the default size
    #[arg(long, value_enum, default_value = "portrait")]
    default_orientation: OrientationArg,

    /// Size matching tolerance in points
    #[arg(long)]
    tolerance: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SizeModeArg {
    MostCommon,
    MostCommonStandard,
    BestFit,
}

#[derive(Clone, Copy, ValueEnum)]
enum TransformArg {
    Fit,
    CanvasOnly,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<SizeModeArg> for SizeMode {
    fn from(arg: SizeModeArg) -> Self {
        match arg {
            SizeModeArg::MostCommon => Self::MostCommonExact,
            SizeModeArg::MostCommonStandard => Self::MostCommonStandard,
            SizeModeArg::BestFit => Self::BestFitStandard,
        }
    }
}

impl From<TransformArg> for TransformMode {
    fn from(arg: TransformArg) -> Self {
        match arg {
            TransformArg::Fit => Self::FitCentered,
            TransformArg::CanvasOnly => Self::CanvasOnly,
        }
    }
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl MergeSettings {
    async fn resolve(&self) -> Result<MergeOptions> {
        let mut options = match &self.config {
            Some(path) => MergeOptions::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => MergeOptions::default(),
        };

        if let Some(mode) = self.size_mode {
            options.size_mode = mode.into();
        }
        if let Some(transform) = self.transform {
            options.transform_mode = transform.into();
        }
        if let Some(paper) = self.default_paper {
            options.default_size =
                PaperSize::from(paper).size_with_orientation(self.default_orientation.into());
        }
        if let Some(tolerance) = self.tolerance {
            options.tolerance_pt = tolerance;
        }

        options.validate()?;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(CliLogger::level_for(cli.verbose, cli.quiet)).init()?;

    match cli.command {
        Commands::Merge {
            input,
            output,
            delete,
            settings,
        } => {
            if delete.len() > input.len() {
                bail!(
                    "{} deletion specs given for {} inputs",
                    delete.len(),
                    input.len()
                );
            }
            let options = settings.resolve().await?;

            let outcome = pdf_collate::merge_files(&input, delete, &options, None).await?;
            pdf_collate::save_bytes(&outcome.bytes, &output).await?;

            let stats = &outcome.stats;
            println!("Merge Statistics:");
            println!(
                "  Target size: {} ({:.0} × {:.0} mm)",
                stats.target_size,
                pdf_collate::constants::pt_to_mm(stats.target_size.width),
                pdf_collate::constants::pt_to_mm(stats.target_size.height)
            );
            println!("  Original pages: {}", stats.original_pages);
            println!("  Removed pages: {}", stats.removed_pages);
            println!("  Final pages: {}", stats.final_pages);
            println!("  Documents processed: {}", stats.documents_processed);
            if stats.documents_failed > 0 {
                println!("  Documents failed: {}", stats.documents_failed);
            }
            for warning in &stats.warnings {
                println!("  Warning: {}", warning);
            }
            println!("Merged → {}", output.display());
        }

        Commands::Split {
            input,
            output_dir,
            ranges,
        } => {
            let mode = if ranges.is_empty() {
                SplitMode::All
            } else {
                SplitMode::Ranges(ranges)
            };

            let outcome = pdf_collate::split_file(&input, mode).await?;
            let written = pdf_collate::write_split_outputs(&outcome, &output_dir).await?;
            for (part, path) in outcome.parts.iter().zip(&written) {
                println!("  {} pages → {}", part.pages.len(), path.display());
            }
            if outcome.dropped_entries > 0 {
                println!("  Skipped {} ranges with no pages", outcome.dropped_entries);
            }
            println!("Split into {} documents", written.len());
        }

        Commands::Sizes { input, settings } => {
            let options = settings.resolve().await?;
            let documents = pdf_collate::load_multiple(&input).await?;
            let report = pdf_collate::analyze_page_sizes(&LopdfBackend, &documents);

            for sizes in &report.documents {
                println!(
                    "{} ({} pages):",
                    input[sizes.document].display(),
                    sizes.page_count
                );
                for (size, count) in &sizes.sizes {
                    println!("  {}: {} pages", size, count);
                }
            }
            for (document, reason) in &report.unreadable {
                println!("{}: unreadable ({})", input[*document].display(), reason);
            }

            if report.documents.len() > 1 {
                println!("All documents ({} pages):", report.total_pages());
                for (size, count) in &report.overall {
                    println!("  {}: {} pages", size, count);
                }
            }

            let selection = pdf_collate::preview_target_size(&LopdfBackend, &documents, &options);
            match selection.standard_name {
                Some(name) => println!("Merge target: {} ({})", selection.size, name),
                None if selection.is_default => {
                    println!("Merge target: {} (default)", selection.size)
                }
                None => println!("Merge target: {}", selection.size),
            }
        }

        Commands::Pages { spec, total } => {
            let pages = pdf_collate::parse_page_spec(&spec, total);
            if pages.is_empty() {
                println!("No pages selected");
            } else {
                println!("Pages: {}", pages);
            }
            if let Some(total) = total {
                println!("{} of {} pages remain after deletion", pages.remaining(total), total);
            }
        }
    }

    Ok(())
}

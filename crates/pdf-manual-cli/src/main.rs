use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use pdf_paginate::{
    PaperSize, Paginator, SourceDocument, apply_running_heads_async, extract_page_texts,
    extract_sections, load_pdf, save_pdf,
};
use pdf_publish::{
    BlobStore, FsBlobStore, FsVersionStore, MemoryBlobStore, MemoryVersionStore, PublishConfig,
    Publisher, RendererKind, VERSION_KEY, VersionMeta, VersionStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pdfm", about = "Versioned manual publisher", version)]
struct Cli {
    /// Publish configuration (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store directory, overrides the configuration
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the manual and publish it as a new version
    Publish {
        /// Input HTML file
        #[arg(short, long)]
        input: PathBuf,

        /// Version component to bump: major, minor or patch
        #[arg(short, long)]
        bump: String,

        /// Renderer, overrides the configuration
        #[arg(long, value_enum)]
        renderer: Option<RendererArg>,

        /// Paper size, overrides the configuration
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Also write the published PDF here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render without touching the store (requires --output)
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the sections found in a rendered PDF
    Sections {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Draw running heads on an already rendered PDF
    Stamp {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Version string for the header, e.g. v1.3.0
        #[arg(long = "as-version")]
        as_version: String,
    },

    /// List published versions, newest first
    List,

    /// Download a published PDF
    Fetch {
        /// Version to fetch, e.g. 1.3.0; latest when omitted
        #[arg(long = "of")]
        of: Option<String>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the current version
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum RendererArg {
    Chrome,
    Text,
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

impl From<RendererArg> for RendererKind {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Chrome => Self::Chrome,
            RendererArg::Text => Self::Text,
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

async fn load_config(path: Option<&Path>, store: Option<PathBuf>) -> Result<PublishConfig> {
    let mut config = match path {
        Some(path) => PublishConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => PublishConfig::default(),
    };
    if let Some(root) = store {
        config.store.root = root;
    }
    Ok(config)
}

fn paginator(config: &PublishConfig) -> Result<Paginator<pdf_paginate::AnyRenderer>> {
    let layout = config.layout.resolve()?;
    Ok(Paginator::new(config.renderer.build(), Arc::new(layout))
        .with_timeout(config.renderer.timeout()))
}

fn fs_publisher(
    config: &PublishConfig,
) -> Result<Publisher<pdf_paginate::AnyRenderer, FsVersionStore, FsBlobStore>> {
    Ok(Publisher::new(
        paginator(config)?,
        FsVersionStore::new(&config.store.root),
        FsBlobStore::new(&config.store.root),
    ))
}

async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref(), cli.store).await?;

    match cli.command {
        Commands::Publish {
            input,
            bump,
            renderer,
            paper,
            output,
            dry_run,
        } => {
            if let Some(renderer) = renderer {
                config.renderer.kind = renderer.into();
            }
            if let Some(paper) = paper {
                config.layout.format = paper.into();
            }
            config.validate()?;

            if dry_run && output.is_none() {
                bail!("--dry-run needs --output");
            }

            let source = SourceDocument::load(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;

            let (receipt, bytes) = if dry_run {
                // start from the stored version, write nothing back
                let current = FsVersionStore::new(&config.store.root)
                    .get(VERSION_KEY)
                    .await?
                    .unwrap_or_default();
                let publisher = Publisher::new(
                    paginator(&config)?,
                    MemoryVersionStore::with_version(VERSION_KEY, current),
                    MemoryBlobStore::new(),
                );
                let receipt = publisher.publish(&bump, source).await?;
                let bytes = publisher.blobs().get(&receipt.key).await?;
                (receipt, bytes)
            } else {
                let publisher = fs_publisher(&config)?;
                let receipt = publisher.publish(&bump, source).await?;
                let bytes = match output {
                    Some(_) => publisher.blobs().get(&receipt.key).await?,
                    None => None,
                };
                (receipt, bytes)
            };

            if let (Some(path), Some(bytes)) = (&output, &bytes) {
                write_output(path, bytes).await?;
                println!("Wrote {}", path.display());
            }
            let verb = if dry_run { "Rendered" } else { "Published" };
            println!(
                "{} {} → {} ({} bytes)",
                verb, receipt.version, receipt.key, receipt.size
            );
        }

        Commands::Sections { input } => {
            let doc = load_pdf(&input).await?;
            let texts = extract_page_texts(&doc);
            let sections = extract_sections(&texts);
            println!("{} pages, {} sections", texts.len(), sections.len());
            print!("{}", sections);
        }

        Commands::Stamp {
            input,
            output,
            as_version,
        } => {
            let layout = Arc::new(config.layout.resolve()?);
            let doc = load_pdf(&input).await?;
            let sections = extract_sections(&extract_page_texts(&doc));
            if sections.is_empty() {
                warn!(
                    "{} contains no section markers, pages keep their content only",
                    input.display()
                );
            }
            let (doc, stats) = apply_running_heads_async(doc, sections, layout, as_version).await?;
            save_pdf(doc, &output).await?;
            println!(
                "Stamped {} pages ({} unlabeled, {} already stamped) → {}",
                stats.decorated,
                stats.unlabeled,
                stats.already_decorated,
                output.display()
            );
        }

        Commands::List => {
            let publisher = fs_publisher(&config)?;
            let history = publisher.history().await?;
            if history.is_empty() {
                println!("Nothing published in {}", config.store.root.display());
            }
            for (version, entry) in history {
                println!(
                    "{:<10} {:>10} bytes  {}  {}",
                    version.to_string(),
                    entry.size,
                    entry.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    entry.key
                );
            }
        }

        Commands::Fetch { of, output } => {
            let publisher = fs_publisher(&config)?;
            let (version, bytes) = match of {
                Some(of) => {
                    let version: VersionMeta = of.parse()?;
                    (version, publisher.fetch(version).await?)
                }
                None => publisher.latest().await?,
            };
            write_output(&output, &bytes).await?;
            info!("Fetched {} ({} bytes)", version, bytes.len());
            println!("{} → {}", version, output.display());
        }

        Commands::Version => {
            let publisher = fs_publisher(&config)?;
            match publisher.current_version().await? {
                Some(version) => println!("{}", version),
                None => println!("Nothing published yet"),
            }
        }
    }

    Ok(())
}

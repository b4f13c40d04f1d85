use clap::{Parser, Subcommand};
use gallery_view::catalog::Catalog;
use gallery_view::config::{self, GalleryConfig};
use gallery_view::filter::{self, CategoryFilter, FilterQuery};
use gallery_view::loader::{self, FsImageLoader};
use gallery_view::types::ItemId;
use gallery_view::view::GalleryView;
use gallery_view::{output, render};
use std::path::{Path, PathBuf};

/// Query flags shared by `filter` and `render`.
#[derive(clap::Args, Clone)]
struct QueryArgs {
    /// Case-insensitive text to match against caption, section and category
    #[arg(long, default_value = "")]
    text: String,

    /// Category to keep ("all" keeps everything)
    #[arg(long, default_value = filter::ALL_CATEGORIES)]
    category: String,
}

impl QueryArgs {
    fn query(&self) -> FilterQuery {
        FilterQuery::new(self.text.clone(), CategoryFilter::parse(&self.category))
    }
}

#[derive(Parser)]
#[command(name = "gallery-view")]
#[command(about = "Inspect, filter and render media gallery catalogs")]
#[command(long_about = "\
Inspect, filter and render media gallery catalogs

The catalog is a JSON or TOML manifest of titled sections, each holding
ordered media items:

  {
    \"sections\": [
      {
        \"title\": \"2024\",
        \"items\": [
          { \"id\": \"2024-lecture\", \"source_url\": \"photos/lecture.jpg\",
            \"caption\": \"Guest lecture\", \"category\": \"events\" }
        ]
      }
    ]
  }

Invalid items (empty id or url, duplicate ids) are reported and skipped.

Run 'gallery-view gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Catalog manifest (.json or .toml)
    #[arg(long, default_value = "gallery.json", global = true)]
    catalog: PathBuf,

    /// Gallery config file (defaults apply when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug events to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the catalog and optionally probe its images
    Check {
        /// Read every local image and report failures
        #[arg(long)]
        probe_images: bool,

        /// Directory relative image urls resolve against
        #[arg(long, default_value = ".")]
        image_root: PathBuf,
    },
    /// Print the sections and items matching a query
    Filter(QueryArgs),
    /// Write the gallery view as an HTML page
    Render {
        #[command(flatten)]
        query: QueryArgs,

        /// Open the lightbox on this item
        #[arg(long)]
        open: Option<String>,

        /// Output HTML file
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check {
            probe_images,
            ref image_root,
        } => {
            let catalog = Catalog::load_file(&cli.catalog)?;
            println!("==> Checking {}", cli.catalog.display());
            if probe_images {
                let probes = loader::probe_catalog(&catalog, &FsImageLoader::new(image_root));
                output::print_check_output(&catalog, Some(probes.as_slice()));
            } else {
                output::print_check_output(&catalog, None);
            }
            if catalog.rejected().is_empty() {
                println!("==> Catalog is valid");
            } else {
                println!("==> {} item(s) rejected", catalog.rejected().len());
            }
        }
        Command::Filter(ref args) => {
            let catalog = Catalog::load_file(&cli.catalog)?;
            let query = args.query();
            let result = filter::filter(&catalog, &query);
            output::print_filter_output(&catalog, &query, &result);
        }
        Command::Render {
            ref query,
            ref open,
            ref out,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let catalog = Catalog::load_file(&cli.catalog)?;
            let mut view = GalleryView::headless(config);
            view.mount();
            view.resolve(catalog);
            view.set_query(query.query());
            if let Some(id) = open {
                view.activate(&ItemId::new(id.as_str()))?;
            }
            let title = cli
                .catalog
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Gallery".to_string());
            let html = render::render_document(&view, &title).into_string();
            std::fs::write(out, html)?;
            output::print_render_output(&view, out);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; stdout stays reserved for command output.
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Explicit `--config` path, or `gallery.toml` in the working directory.
fn resolve_config(path: Option<&Path>) -> Result<GalleryConfig, config::ConfigError> {
    let path = path.unwrap_or(Path::new(config::CONFIG_FILE));
    config::load_config(path)
}

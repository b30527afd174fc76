//! flatcontainer CLI
//!
//! Publishes and removes packages in a local flat container feed.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use flatcontainer::{
    Config, FileStore, FlatContainer, PackageId, PackageIdentity, PackageInput, Result,
};
use tracing_subscriber::{fmt, EnvFilter};

/// flatcontainer CLI
#[derive(Parser, Debug)]
#[command(name = "flatcontainer-cli")]
#[command(about = "Manage the flat container of a local package feed")]
#[command(version)]
struct Args {
    /// Feed root directory
    #[arg(short, long, default_value = "./feed")]
    root: PathBuf,

    /// Container segment under the root
    #[arg(short, long, default_value = "flatcontainer")]
    container: String,

    /// Maximum package ids processed in parallel
    #[arg(short, long, default_value = "8")]
    jobs: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add package archives (identity read from each manifest)
    Add {
        /// Paths to .nupkg files
        #[arg(required = true)]
        packages: Vec<PathBuf>,
    },

    /// Remove versions of a package
    Remove {
        /// Package id
        id: String,

        /// Versions to remove
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// List published versions of a package
    Versions {
        /// Package id
        id: String,
    },

    /// Print the storage keys of a package version
    Paths {
        /// Package id
        id: String,

        /// Package version
        version: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flatcontainer=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::debug!("flatcontainer v{}", flatcontainer::VERSION);
    tracing::debug!("Feed root: {}", args.root.display());

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        for failure in e.failures() {
            tracing::error!("  {}", failure);
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .root_dir(&args.root)
        .container(&args.container)
        .max_parallelism(args.jobs)
        .build();

    let store = Arc::new(FileStore::open(&config.root_dir)?);
    let container = FlatContainer::open(config, store)?;

    match args.command {
        Commands::Add { packages } => {
            let mut inputs = Vec::with_capacity(packages.len());
            for path in &packages {
                let bytes = std::fs::read(path)?;
                let input = PackageInput::from_archive(bytes)?;
                tracing::info!("Read {} from {}", input.identity, path.display());
                inputs.push(input);
            }

            container.add_packages(&inputs)?;
            println!("Added {} package(s)", inputs.len());
        }

        Commands::Remove { id, versions } => {
            let packages = versions
                .iter()
                .map(|version| PackageIdentity::parse(&id, version))
                .collect::<Result<Vec<_>>>()?;

            container.remove_packages(&packages)?;
            println!("Removed {} package(s)", packages.len());
        }

        Commands::Versions { id } => {
            let id = PackageId::new(id)?;
            for version in container.versions(&id)? {
                println!("{}", version);
            }
        }

        Commands::Paths { id, version } => {
            let package = PackageIdentity::parse(&id, &version)?;
            println!("index:    {}", container.index_path(&package.id)?);
            println!("archive:  {}", container.archive_path(&package)?);
            println!("manifest: {}", container.manifest_path(&package)?);
        }
    }

    Ok(())
}

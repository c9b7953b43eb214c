use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use kernel_finder::config::loader::{configure_database, load_pacman_config};
use kernel_finder::{
    find_kernels, installed_kernels, AlpmDatabase, AppError, ConfigPaths, KernelInfo, LogCollector,
};

/// List kernel packages available in the configured pacman repositories
#[derive(Parser, Debug)]
#[command(name = "kernel_finder", version, about)]
struct Cli {
    /// Package-manager configuration file
    #[arg(long, default_value = kernel_finder::config::PACMAN_CONF_PATH)]
    config: PathBuf,

    /// Only list kernels that are installed
    #[arg(long)]
    installed: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let mut collector = LogCollector::new(level);
    if let Some(path) = &cli.log_file {
        collector = collector.with_file(path).map_err(AppError::Logging)?;
    }
    collector.install().map_err(AppError::Logging)?;

    let paths = ConfigPaths::default().with_pacman_conf(&cli.config);
    let config = load_pacman_config(&paths.pacman_conf);

    let mut db = AlpmDatabase::open(config.root_dir(), config.db_path())?;
    configure_database(&mut db, &config, &paths);

    let mut kernels = find_kernels(&db);
    if cli.installed {
        kernels = installed_kernels(&kernels);
    }

    if cli.json {
        let infos: Vec<KernelInfo> = kernels.iter().map(|k| k.info()).collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    for kernel in &kernels {
        let info = kernel.info();
        let version = info.version.as_deref().unwrap_or("unknown");
        if info.installed {
            println!("{} {} [installed]", info.qualified_name, version);
        } else {
            println!("{} {}", info.qualified_name, version);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(&cli).map_err(|e| anyhow::anyhow!(e.user_message()))
}

use std::{
    io::{self, BufWriter},
    path::PathBuf,
};

use clap::Parser;
use gpstel_cli::{ExportConfig, ExportPipeline};
use gpstel_core::DumpOpener;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "gpstel",
    version = env!("CARGO_PKG_VERSION"),
    about = "Convert GPS telemetry of one or more recordings into a continuous CSV stream",
    long_about = None,
)]
struct Cli {
    /// Файлы с телеметрией; сшиваются в порядке перечисления
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // stdout занят CSV, журнал идёт в stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let config = ExportConfig::new(cli.files);
    let pipeline = ExportPipeline::new(config);

    let stdout = io::stdout();
    let sink = BufWriter::new(stdout.lock());

    match pipeline.run(&DumpOpener, sink) {
        Ok(stats) => {
            info!("\n{stats}");
        }
        Err(e) => {
            error!("{}", e.diagnostic());
            std::process::exit(1);
        }
    }
}

//! Draws the allocator benchmark charts from the CSV files in a directory.
//!
//! Writes `speed_comparison.png`, `utilization_comparison.png` and, when
//! their inputs exist, `average_utilization_bar.png` and `overhead_bar.png`.

extern crate chrono;
extern crate env_logger;
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate structopt;
extern crate tdmm_graph;

use error_chain::ChainedError;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;
use tdmm_graph::errors::*;
use tdmm_graph::Setting;

fn main() {
    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        let t = chrono::Local::now();
        writeln!(
            buf,
            "{} {}:{}: {}",
            t.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.module_path().unwrap_or("?"),
            record.args()
        )
    });
    builder.filter_level(log::LevelFilter::Warn);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();

    let opt = Opt::from_args();
    if let Err(ref e) = run(opt) {
        error!("{}", e.display_chain());
        ::std::process::exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    let mut setting = match opt.config {
        Some(ref path) => Setting::init(path)?,
        None => Setting::default(),
    };
    if let Some(dir) = opt.input_dir {
        setting.output_dir = dir.clone();
        setting.input_dir = dir;
    }
    if let Some(dir) = opt.output_dir {
        setting.output_dir = dir;
    }
    debug!("{:?}", setting);

    let summary = tdmm_graph::render_all(&setting)?;
    for path in &summary.written {
        println!("{}", path.display());
    }
    if !summary.failed.is_empty() {
        warn!("{} chart(s) could not be drawn", summary.failed.len());
    }
    Ok(())
}

#[derive(StructOpt, Debug)]
#[structopt(name = "graph")]
#[structopt(about = "Draw allocator benchmark charts from CSV measurements.")]
struct Opt {
    /// The folder that contains the CSV measurements.
    #[structopt(help = "Input directory, current directory if empty", parse(from_os_str))]
    input_dir: Option<PathBuf>,

    /// Where the charts go.
    #[structopt(short = "o", long = "out", parse(from_os_str))]
    #[structopt(help = "Output directory, the input directory if empty")]
    output_dir: Option<PathBuf>,

    /// A TOML setting with directories and policies.
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    #[structopt(help = "The path to the setting file")]
    config: Option<PathBuf>,
}

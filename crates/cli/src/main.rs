//! Runvault CLI — one invocation per completed test cycle.
//!
//! The external test harness runs this once per cycle with the finished
//! run directory. Exit status: non-zero on configuration errors or an
//! unrecoverable pack/mount failure for the current run; zero when the
//! run is published and index/pointer are consistent, even if an old
//! run's eviction was deferred because its mount was busy.

use std::path::Path;
use std::process;

use clap::{value_parser, Arg, Command};
use tracing_subscriber::EnvFilter;

use runvault::{
    ArchiveBackend, ArchiveManager, SquashfsBackend, TarZstdBackend, UtcIds, VaultConfig,
};

fn build_cli() -> Command {
    Command::new("runvault")
        .about("Publish a completed test-run directory into the bounded archive")
        .arg(
            Arg::new("keep")
                .short('n')
                .long("keep")
                .value_name("N")
                .required(true)
                .value_parser(value_parser!(usize))
                .help("Keep this many published runs"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .default_value("web")
                .help("Public root holding images, mounts, index and the latest link"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("KIND")
                .value_parser(["squashfs", "tar-zstd"])
                .default_value("squashfs")
                .help("Archive technology used for pack/mount/unmount"),
        )
        .arg(
            Arg::new("run_dir")
                .value_name("RUN_DIR")
                .required(true)
                .help("Completed run directory handed over by the test harness"),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let matches = build_cli().get_matches();
    let keep = *matches.get_one::<usize>("keep").expect("--keep is required");
    let root = matches.get_one::<String>("root").expect("has default");
    let run_dir = matches
        .get_one::<String>("run_dir")
        .expect("RUN_DIR is required");

    let backend: Box<dyn ArchiveBackend> =
        match matches.get_one::<String>("backend").map(String::as_str) {
            Some("tar-zstd") => Box::new(TarZstdBackend::default()),
            _ => Box::new(SquashfsBackend),
        };

    // Configuration problems abort before any filesystem mutation.
    let mut manager = match ArchiveManager::new(
        VaultConfig::new(root, keep),
        backend,
        Box::new(UtcIds),
    ) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("runvault: {e}");
            process::exit(2);
        }
    };

    match manager.run_cycle(Path::new(run_dir)) {
        Ok(report) => {
            println!("published {}", report.published);
            for id in &report.evicted {
                println!("evicted {id}");
            }
            for deferred in &report.deferred {
                // Non-fatal: retried on the next invocation.
                eprintln!("deferred eviction of {}: {}", deferred.id, deferred.reason);
            }
        }
        Err(e) => {
            eprintln!("runvault: {e}");
            process::exit(1);
        }
    }
}

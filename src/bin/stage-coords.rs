// stage-coords --input pointDataInput.txt
// stage-coords --local-ranks 4 --echo-store
// mpirun -n 4 stage-coords            (built with --features mpi-support)
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use coord_stage::prelude::*;

/// Stage 3D points from a text file into a row-distributed coordinate store.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Args {
    /// Input file with whitespace separated `x y z` records.
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Number of points to read and stage.
    #[arg(long, default_value_t = DEFAULT_NUM_POINTS)]
    num_points: usize,
    /// Rank that prints the point listing.
    #[arg(long, default_value_t = 0)]
    root: usize,
    /// Print each rank's stored rows after the copy.
    #[arg(long)]
    echo_store: bool,
    /// Run this many ranks as threads of this process instead of the
    /// default process group.
    #[arg(long, default_value_t = 1)]
    local_ranks: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let cfg = StageConfig {
        input: args.input,
        num_points: args.num_points,
        root: args.root,
        echo_store: args.echo_store,
    };

    match run(&cfg, args.local_ranks) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if matches!(e, StageError::InputOpen { .. }) {
                eprintln!("Error opening file!");
            }
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cfg: &StageConfig, local_ranks: usize) -> Result<(), StageError> {
    if local_ranks > 1 {
        return run_local_group(cfg, local_ranks);
    }

    #[cfg(feature = "mpi-support")]
    let comm = MpiComm::new()?;
    #[cfg(not(feature = "mpi-support"))]
    let comm = NoComm;

    stage_from_path(cfg, &comm, io::stdout(), io::stdout()).map(|_| ())
}

/// One thread per rank; the first failing rank's error is returned.
fn run_local_group(cfg: &StageConfig, ranks: usize) -> Result<(), StageError> {
    let group = LocalComm::group(ranks);
    log::info!("running {ranks} in-process ranks");
    let results: Vec<Result<(), StageError>> = std::thread::scope(|s| {
        let handles: Vec<_> = group
            .into_iter()
            .map(|comm| {
                s.spawn(move || {
                    stage_from_path(cfg, &comm, io::stdout(), io::stdout()).map(|staged| {
                        log::debug!("rank {} staged {} rows", comm.rank(), staged.copied);
                    })
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| {
                h.join().unwrap_or_else(|_| {
                    Err(StageError::Communication("rank thread panicked".into()))
                })
            })
            .collect()
    });
    results.into_iter().collect()
}

use std::io::{self, Write};
use std::sync::mpsc;
use std::time::Duration;

use coord_stage::prelude::*;

const EXAMPLE: &str = "0 0 0\n1 0 0\n0 1 0\n0 0 1\n1 1 1\n2 2 2\n3 3 3\n4 4 4\n5 5 5\n6 6 6";

struct RankRun {
    echo: String,
    debug: String,
    staged: StagedCoordinates,
}

/// Run the staging pipeline on `ranks` in-process ranks over `input`.
fn run_group(ranks: usize, cfg: &StageConfig, input: &str) -> Vec<RankRun> {
    let group = LocalComm::group(ranks);
    std::thread::scope(|s| {
        let handles: Vec<_> = group
            .into_iter()
            .map(|comm| {
                s.spawn(move || {
                    let mut echo = Vec::new();
                    let mut debug = Vec::new();
                    let staged =
                        stage_from_reader(cfg, &comm, input.as_bytes(), &mut echo, &mut debug)
                            .unwrap();
                    RankRun {
                        echo: String::from_utf8(echo).unwrap(),
                        debug: String::from_utf8(debug).unwrap(),
                        staged,
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn ranges_tile_and_rows_match_for_many_group_sizes() {
    let cfg = StageConfig::default();
    let points = PointFileReader::new(10).read(EXAMPLE.as_bytes()).unwrap();

    for ranks in [1, 2, 3, 4, 7, 10] {
        let runs = run_group(ranks, &cfg, EXAMPLE);
        let mut owner = vec![None; 10];
        for (rank, run) in runs.iter().enumerate() {
            let range = run.staged.map.my_range();
            assert!(!range.is_empty(), "ranks={ranks} rank={rank}");
            for row in range.iter() {
                assert_eq!(owner[row], None, "row {row} owned twice");
                owner[row] = Some(rank);
            }
            for (row, values) in run.staged.store.local_rows() {
                assert_eq!(values, points.try_get(row).unwrap().to_array());
            }
        }
        assert!(owner.iter().all(Option::is_some), "ranks={ranks}");
        let copied: usize = runs.iter().map(|r| r.staged.copied).sum();
        assert_eq!(copied, 10);
    }
}

#[test]
fn only_root_echoes_but_every_rank_reports() {
    let cfg = StageConfig {
        root: 2,
        ..Default::default()
    };
    let runs = run_group(3, &cfg, EXAMPLE);
    for (rank, run) in runs.iter().enumerate() {
        if rank == 2 {
            assert_eq!(run.echo.lines().count(), 11);
        } else {
            assert!(run.echo.is_empty(), "rank {rank} echoed");
        }
    }
    assert_eq!(
        runs[1].debug,
        "myRank: 1; lowGlobIndx: 4\nmyRank: 1; highGlobIndx: 6\n"
    );
}

#[test]
fn more_ranks_than_points_leaves_idle_ranks() {
    let cfg = StageConfig::default();
    let runs = run_group(12, &cfg, EXAMPLE);
    for (rank, run) in runs.iter().enumerate() {
        if rank < 10 {
            assert_eq!(run.staged.copied, 1);
            assert_eq!(run.staged.map.min_global(), Some(rank));
            assert_eq!(run.staged.map.max_global(), Some(rank));
        } else {
            assert_eq!(run.staged.copied, 0);
            assert_eq!(run.staged.store.num_local_rows(), 0);
            assert!(run.debug.contains("lowGlobIndx: none"));
        }
    }
}

#[test]
fn echo_store_prints_each_ranks_rows() {
    let cfg = StageConfig {
        echo_store: true,
        ..Default::default()
    };
    let runs = run_group(4, &cfg, EXAMPLE);
    // Rank 3 of 4 owns rows 8 and 9.
    assert_eq!(
        runs[3].debug,
        "myRank: 3; lowGlobIndx: 8\nmyRank: 3; highGlobIndx: 9\n5 5 5\n6 6 6\n"
    );
}

/// Writer whose every write fails like a closed pipe.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

#[test]
fn failing_root_echo_does_not_strand_other_ranks() {
    let (tx, rx) = mpsc::channel();
    for comm in LocalComm::group(2) {
        let tx = tx.clone();
        std::thread::spawn(move || {
            let cfg = StageConfig::default();
            let rank = comm.rank();
            let res = if rank == 0 {
                stage_from_reader(&cfg, &comm, EXAMPLE.as_bytes(), ClosedPipe, Vec::new())
            } else {
                stage_from_reader(&cfg, &comm, EXAMPLE.as_bytes(), Vec::new(), Vec::new())
            };
            let _ = tx.send((rank, res.map(|staged| staged.copied)));
        });
    }
    drop(tx);

    let mut done: Vec<_> = (0..2)
        .map_while(|_| rx.recv_timeout(Duration::from_secs(10)).ok())
        .collect();
    done.sort_by_key(|(rank, _)| *rank);
    assert_eq!(done.len(), 2, "finished ranks: {done:?}");
    assert!(matches!(done[0].1, Err(StageError::Output(_))));
    assert_eq!(done[1].1, Ok(5));
}

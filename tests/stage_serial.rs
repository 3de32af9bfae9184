use std::path::PathBuf;

use coord_stage::prelude::*;
use serial_test::serial;

const EXAMPLE: &str = "0 0 0\n1 0 0\n0 1 0\n0 0 1\n1 1 1\n2 2 2\n3 3 3\n4 4 4\n5 5 5\n6 6 6";

fn example_points() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(2.0, 2.0, 2.0),
        Point3::new(3.0, 3.0, 3.0),
        Point3::new(4.0, 4.0, 4.0),
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(6.0, 6.0, 6.0),
    ]
}

fn temp_input(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "coord_stage_{}_{}.txt",
        name,
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn example_file_on_one_process() {
    let input = temp_input("serial_example", EXAMPLE);
    let cfg = StageConfig {
        input: input.clone(),
        ..Default::default()
    };
    let mut echo = Vec::new();
    let mut debug = Vec::new();
    let staged = stage_from_path(&cfg, &NoComm, &mut echo, &mut debug).unwrap();
    std::fs::remove_file(&input).unwrap();

    assert_eq!(staged.points.as_slice(), example_points().as_slice());

    let echo = String::from_utf8(echo).unwrap();
    let lines: Vec<_> = echo.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "Coordinates of the points:");
    assert_eq!(lines[1], "Point 1: (0, 0, 0)");
    assert_eq!(lines[4], "Point 4: (0, 0, 1)");
    assert_eq!(lines[10], "Point 10: (6, 6, 6)");

    assert_eq!(
        String::from_utf8(debug).unwrap(),
        "myRank: 0; lowGlobIndx: 0\nmyRank: 0; highGlobIndx: 9\n"
    );

    assert_eq!(staged.copied, 10);
    assert_eq!(staged.store.num_local_rows(), 10);
    for (row, values) in staged.store.local_rows() {
        assert_eq!(values, example_points()[row].to_array(), "row {row}");
    }
}

#[test]
fn missing_file_stops_before_staging() {
    let cfg = StageConfig {
        input: PathBuf::from("no/such/dir/pointDataInput.txt"),
        ..Default::default()
    };
    let mut echo = Vec::new();
    let mut debug = Vec::new();
    let err = stage_from_path(&cfg, &NoComm, &mut echo, &mut debug).unwrap_err();
    assert!(matches!(err, StageError::InputOpen { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(echo.is_empty());
    assert!(debug.is_empty());
}

#[test]
fn short_file_is_a_staging_error() {
    let cfg = StageConfig::default();
    let err = stage_from_reader(&cfg, &NoComm, "1 2 3\n4 5 6".as_bytes(), Vec::new(), Vec::new())
        .unwrap_err();
    assert_eq!(
        err,
        StageError::ShortInput {
            expected: 10,
            found: 2
        }
    );
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn configurable_point_count() {
    let cfg = StageConfig {
        num_points: 4,
        ..Default::default()
    };
    let staged =
        stage_from_reader(&cfg, &NoComm, EXAMPLE.as_bytes(), Vec::new(), Vec::new()).unwrap();
    assert_eq!(staged.points.len(), 4);
    assert_eq!(staged.map.num_global(), 4);
    assert_eq!(staged.store.global_value(3, 2), Ok(1.0));
    assert!(staged.store.global_value(4, 0).is_err());
}

#[test]
fn zero_points_stage_nothing() {
    let cfg = StageConfig {
        num_points: 0,
        ..Default::default()
    };
    let mut debug = Vec::new();
    let staged = stage_from_reader(&cfg, &NoComm, "".as_bytes(), Vec::new(), &mut debug).unwrap();
    assert_eq!(staged.copied, 0);
    assert_eq!(
        String::from_utf8(debug).unwrap(),
        "myRank: 0; lowGlobIndx: none\nmyRank: 0; highGlobIndx: none\n"
    );
}

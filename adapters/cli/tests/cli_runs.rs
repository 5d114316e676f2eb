use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

const SMALL_MAZE: &str = r#"
side = 10
waypoints = [[0, 1], [9, 1], [5, 5], [9, 9]]

[evolution]
population_size = 7
gradient_tries = 8
mutation_tries = 3
"#;

fn small_maze_config(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gem-maze-{name}-{}.toml", std::process::id()));
    fs::write(&path, SMALL_MAZE).expect("write config");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gem-maze"))
        .args(args)
        .output()
        .expect("failed to launch gem-maze")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn prints_grid_and_layout_for_small_maze() {
    let config = small_maze_config("print");
    let output = run(&[
        "--config",
        config.to_str().expect("utf-8 path"),
        "--generations",
        "3",
        "--seed",
        "17",
        "--print-grid",
        "--export",
    ]);

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("generation 3: best route length "));

    let grid_rows = &lines[1..11];
    for row in grid_rows {
        assert_eq!(row.len(), 10);
        assert!(row.chars().all(|symbol| matches!(symbol, '0' | '1' | '*')));
    }
    assert!(grid_rows.iter().any(|row| row.contains('*')));
    assert!(lines[11].starts_with("maze:v1:10x10:"));

    let _ = fs::remove_file(config);
}

#[test]
fn same_seed_gives_same_output() {
    let config = small_maze_config("replay");
    let path = config.to_str().expect("utf-8 path");
    let args = ["--config", path, "--generations", "4", "--export"];

    let first = run(&args);
    let second = run(&args);

    assert!(first.status.success(), "{first:?}");
    assert_eq!(stdout(&first), stdout(&second));

    let _ = fs::remove_file(config);
}

#[test]
fn exported_layout_seeds_a_new_run() {
    let config = small_maze_config("seed");
    let path = config.to_str().expect("utf-8 path");

    let exported = run(&["--config", path, "--generations", "2", "--export"]);
    assert!(exported.status.success(), "{exported:?}");
    let exported_text = stdout(&exported);
    let layout = exported_text
        .lines()
        .find(|line| line.starts_with("maze:v1:"))
        .expect("layout line");

    let seeded = run(&[
        "--config",
        path,
        "--generations",
        "0",
        "--layout",
        layout,
    ]);
    assert!(seeded.status.success(), "{seeded:?}");

    let _ = fs::remove_file(config);
}

#[test]
fn malformed_layout_is_reported() {
    let output = run(&["--generations", "0", "--layout", "maze:v9:40x40:e30"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--layout"), "{stderr}");
    assert!(stderr.contains("v9"), "{stderr}");
}

#[test]
fn missing_config_file_is_reported() {
    let output = run(&["--config", "/nonexistent/gem-maze.toml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not read config file"), "{stderr}");
}

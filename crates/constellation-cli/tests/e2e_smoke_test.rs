use std::{fs, path::Path};

use tempfile::tempdir;

use constellation_cli::{Args, run};

const LINKED_NOTES: &str = r#"
[[nodes]]
id = "rust"
title = "Rust"
category = "topic"

[[nodes]]
id = "ownership"
title = "Ownership"
category = "topic"

[[nodes]]
id = "borrowing"
title = "Borrowing"
category = "topic"

[[nodes]]
id = "coffee"
title = "Coffee"
category = "hobby"

[[nodes]]
id = "espresso"
title = "Espresso"
category = "hobby"

[[nodes]]
id = "inbox"
title = "Inbox"

[[edges]]
source = "rust"
target = "ownership"
document = "rust.md"
index = 0

[[edges]]
source = "ownership"
target = "borrowing"
document = "ownership.md"
index = 0
weight = 2.0

[[edges]]
source = "espresso"
target = "coffee"
"#;

const DANGLING_EDGE: &str = r#"
[[nodes]]
id = "alone"

[[edges]]
source = "alone"
target = "missing"
"#;

fn args(input: &Path, output: &Path, config: Option<&Path>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: config.map(|path| path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_linked_notes() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("notes.toml");
    let output = temp_dir.path().join("layout.toml");
    fs::write(&input, LINKED_NOTES).unwrap();

    run(&args(&input, &output, None)).expect("Layout should succeed");

    let rendered = fs::read_to_string(&output).unwrap();
    let layout: toml::Table = toml::from_str(&rendered).unwrap();

    assert_eq!(layout["stats"]["cluster_count"].as_integer(), Some(2));
    assert_eq!(layout["stats"]["standalone_count"].as_integer(), Some(1));

    let positions = layout["positions"].as_array().unwrap();
    let ids: Vec<&str> = positions
        .iter()
        .map(|position| position["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        ["rust", "ownership", "borrowing", "coffee", "espresso", "inbox"]
    );

    for position in positions {
        let [x, y, z] = ["x", "y", "z"].map(|axis| position[axis].as_float().unwrap());
        let norm = (x * x + y * y + z * z).sqrt();
        assert!((norm - 5000.0).abs() < 1e-6, "off-sphere position: {position}");
    }
}

#[test]
fn e2e_smoke_test_explicit_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("notes.toml");
    let output = temp_dir.path().join("layout.toml");
    let config = temp_dir.path().join("config.toml");
    fs::write(&input, LINKED_NOTES).unwrap();
    fs::write(&config, "sphere_radius = 10.0\nlocal_engine = \"ring\"\n").unwrap();

    run(&args(&input, &output, Some(&config))).expect("Layout should succeed");

    let layout: toml::Table = toml::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let first = &layout["positions"].as_array().unwrap()[0];
    let [x, y, z] = ["x", "y", "z"].map(|axis| first[axis].as_float().unwrap());
    assert!(((x * x + y * y + z * z).sqrt() - 10.0).abs() < 1e-9);
}

#[test]
fn e2e_smoke_test_error_inputs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("layout.toml");

    let dangling = temp_dir.path().join("dangling.toml");
    fs::write(&dangling, DANGLING_EDGE).unwrap();
    let malformed = temp_dir.path().join("malformed.toml");
    fs::write(&malformed, "[[nodes]]\nid = 7\n").unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let mut unexpectedly_succeeded = Vec::new();
    for input in [&dangling, &malformed, &missing] {
        if run(&args(input, &output, None)).is_ok() {
            unexpectedly_succeeded.push(input.clone());
        }
    }

    assert!(
        unexpectedly_succeeded.is_empty(),
        "error inputs succeeded unexpectedly: {unexpectedly_succeeded:?}"
    );
    assert!(!output.exists(), "no layout should be written on failure");
}

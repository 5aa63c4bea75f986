use clap::Parser;
use hicfold::convert::AdjacencyMode;
use hicfold::potential::PotentialKind;
use hicfold::{Config, FoldError};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Parser)]
struct Cli {
    #[command(flatten)]
    config: Config,
}

fn write_json(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn partial_json_falls_back_to_defaults() {
    println!("\n=== TEST: partial JSON config ===");
    let file = write_json(
        r#"{
            "model": { "convert_factor": 1.4, "potential": "quadratic", "chr_lens": [10, 20] },
            "search": { "serial_search": true }
        }"#,
    );
    let cfg = Config::load_from_file(file.path()).unwrap();

    assert_eq!(cfg.model.convert_factor, Some(1.4));
    assert_eq!(cfg.model.potential, PotentialKind::Quadratic);
    assert_eq!(cfg.model.chr_lens, Some(vec![10, 20]));
    assert_eq!(cfg.model.max_iterations, 2000);
    assert_eq!(cfg.model.adjacency, AdjacencyMode::Boost);
    assert!(cfg.search.serial_search);
    assert_eq!(cfg.search.trial_models, 5);
    assert_eq!(cfg.search.search_start, 0.1);
}

#[test]
fn invalid_values_in_file_are_rejected() {
    let file = write_json(r#"{ "model": { "models": 0 } }"#);
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(FoldError::Config(_))
    ));
}

#[test]
fn malformed_json_is_a_json_error() {
    let file = write_json("{ not json");
    assert!(matches!(
        Config::load_from_file(file.path()),
        Err(FoldError::Json(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, FoldError::Io(_)));
}

#[test]
fn command_line_flags_fill_the_config() {
    println!("\n=== TEST: CLI flags ===");
    let cli = Cli::try_parse_from([
        "hicfold",
        "--convert-factor",
        "0.8",
        "--potential",
        "lorentzian-inequality",
        "--inequality-constraints",
        "--chr-lens",
        "3,4",
        "--adjacency",
        "replace",
        "--search-step",
        "0.2",
    ])
    .unwrap();
    let cfg = cli.config;

    assert_eq!(cfg.model.convert_factor, Some(0.8));
    assert_eq!(cfg.model.potential, PotentialKind::LorentzianInequality);
    assert!(cfg.model.inequality_constraints);
    assert_eq!(cfg.model.chr_lens, Some(vec![3, 4]));
    assert_eq!(cfg.model.adjacency, AdjacencyMode::Replace);
    assert_eq!(cfg.search.search_step, 0.2);
    assert_eq!(cfg.model.threads, 0);
    cfg.validate().unwrap();
}

#[test]
fn defaults_round_trip_through_json() {
    let cfg = Config::default();
    let text = serde_json::to_string(&cfg).unwrap();
    let file = write_json(&text);
    let back = Config::load_from_file(file.path()).unwrap();
    assert_eq!(back.model.learning_rate, cfg.model.learning_rate);
    assert_eq!(back.search.search_end, cfg.search.search_end);
}

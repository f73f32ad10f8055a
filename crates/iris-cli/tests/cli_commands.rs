use clap::Parser;
use iris_checkpoint::{BincodeCheckpointer, Checkpointer};
use iris_cli::{ServeCommand, TrainCommand};
use tempfile::tempdir;

#[test]
fn serve_parses_without_arguments() {
    let cmd = ServeCommand::try_parse_from(["iris-serve"]).unwrap();
    let config = cmd.to_config();
    assert!(config.validate().is_ok());
}

#[test]
fn train_command_writes_artifact() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("nested").join("model.bin");
    let cmd = TrainCommand::parse_from([
        "iris-train",
        "--output",
        output.to_str().unwrap(),
        "--n-estimators",
        "25",
    ]);

    let report = cmd.run().unwrap();
    assert_eq!(report.artifact_path, output);
    assert_eq!(report.n_trees, 25);
    assert_eq!(report.train_samples + report.test_samples, 150);

    let artifact = BincodeCheckpointer::new().restore(&output).unwrap();
    assert_eq!(artifact.model.n_trees(), 25);
    assert_eq!(artifact.metadata["split_seed"], "42");
}

#[test]
fn train_command_rejects_bad_test_size() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("model.bin");
    let cmd = TrainCommand::parse_from([
        "iris-train",
        "--output",
        output.to_str().unwrap(),
        "--test-size",
        "1.5",
    ]);

    assert!(cmd.run().is_err());
    assert!(!output.exists());
}

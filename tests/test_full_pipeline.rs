//! Integration test: Full walkthrough (load → split → preprocess → ridge → score)

use kolosal_prep::data::{load_table, missing_counts, to_feature_matrix, validate_key};
use kolosal_prep::preprocessing::PipelineConfig;
use kolosal_prep::walkthrough::Walkthrough;
use kolosal_prep::PrepError;
use polars::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/housing_sample.csv")
}

#[test]
fn test_sample_table_loads() {
    let df = load_table(sample_path()).unwrap();
    assert_eq!(df.height(), 40);
    validate_key(&df, "Id").unwrap();

    let missing = missing_counts(&df);
    let columns: Vec<&str> = missing.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(columns, vec!["LotFrontage", "Alley"]);
}

#[test]
fn test_walkthrough_on_sample() {
    let df = load_table(sample_path()).unwrap();
    let walkthrough = Walkthrough::new(PipelineConfig::housing()).unwrap();
    let output = walkthrough.run(&df).unwrap();

    let report = &output.report;
    assert_eq!(report.train_rows + report.held_out_rows, 40);
    assert_eq!(report.held_out_rows, 8);
    assert!(report.train_r2 > 0.5, "train R² = {}", report.train_r2);
    assert!(report.held_out_r2.is_finite());

    // Held-out features convert cleanly: nothing left absent or textual
    let x = to_feature_matrix(&output.held_out, output.pipeline.feature_names()).unwrap();
    assert_eq!(x.dim(), (8, report.feature_names.len()));
    assert!(x.iter().all(|v| v.is_finite()));

    let predictions = output.model.predict(&x).unwrap();
    assert_eq!(predictions.len(), 8);
}

#[test]
fn test_walkthrough_is_reproducible() {
    let df = load_table(sample_path()).unwrap();
    let walkthrough = Walkthrough::new(PipelineConfig::housing()).unwrap();
    let a = walkthrough.run(&df).unwrap();
    let b = walkthrough.run(&df).unwrap();
    assert_eq!(a.report.feature_names, b.report.feature_names);
    assert_eq!(a.report.held_out_r2, b.report.held_out_r2);
}

#[test]
fn test_raw_table_fails_conversion() {
    let df = load_table(sample_path()).unwrap();
    let columns: Vec<String> = PipelineConfig::housing().feature_columns();
    assert!(matches!(
        to_feature_matrix(&df, &columns),
        Err(PrepError::ValueConversion { .. })
    ));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.json");
    let config = PipelineConfig::housing().with_ridge_alpha(10.0).with_split(0.25, Some(7));
    std::fs::write(&path, config.to_json().unwrap()).unwrap();

    let loaded = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);

    let df = load_table(sample_path()).unwrap();
    let output = Walkthrough::new(loaded).unwrap().run(&df).unwrap();
    assert_eq!(output.report.held_out_rows, 10);
    assert_eq!(output.model.alpha, 10.0);
}

#[test]
fn test_held_out_output_written() {
    let df = load_table(sample_path()).unwrap();
    let output = Walkthrough::new(PipelineConfig::housing()).unwrap().run(&df).unwrap();

    let tmp = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
    let mut features = output.held_out.clone();
    CsvWriter::new(tmp.as_file()).finish(&mut features).unwrap();

    let reloaded = load_table(tmp.path()).unwrap();
    assert_eq!(reloaded.height(), 8);
    assert!(reloaded.column("SalePrice").is_ok());
}

#[test]
fn test_bundled_config_matches_preset() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/housing_config.json");
    assert_eq!(PipelineConfig::from_json_file(path).unwrap(), PipelineConfig::housing());
}

#[test]
fn test_held_out_csv_with_all_absent_frontage() {
    let tmp = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(
        tmp.as_file(),
        "Id,LotFrontage,LotArea,OverallQual,GrLivArea,YearBuilt,CentralAir,Neighborhood,Alley,SalePrice"
    )
    .unwrap();
    writeln!(tmp.as_file(), "101,NA,9600,6,1262,1976,Y,Veenker,NA,181500").unwrap();
    writeln!(tmp.as_file(), "102,NA,7420,5,1077,1939,N,BrkSide,Grvl,118000").unwrap();
    tmp.as_file().flush().unwrap();

    let train = load_table(sample_path()).unwrap();
    let held_out = load_table(tmp.path()).unwrap();

    let walkthrough = Walkthrough::new(PipelineConfig::housing()).unwrap();
    let output = walkthrough.run_split(&train, &held_out).unwrap();
    assert_eq!(output.report.held_out_rows, 2);

    let flags: Vec<bool> = output
        .held_out
        .column("LotFrontage_missing")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(flags, vec![true, true]);
    assert_eq!(output.held_out.column("LotFrontage").unwrap().null_count(), 0);
}

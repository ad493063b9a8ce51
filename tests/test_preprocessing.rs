//! Integration test: preprocessing fitted on training rows, reapplied to held-out rows

use kolosal_prep::preprocessing::{
    BinaryEncoder, MissingValueHandler, OneHotEncoder, PipelineConfig, PreprocessingPipeline,
    Standardizer, TableTransformer,
};
use kolosal_prep::PrepError;
use polars::prelude::*;

fn train_df() -> DataFrame {
    df!(
        "Id" => &[1i64, 2, 3, 4, 5, 6, 7, 8],
        "LotFrontage" => &[Some(65.0), None, Some(68.0), Some(60.0), None, Some(84.0), Some(70.0), Some(50.0)],
        "LotArea" => &[8450.0, 9600.0, 11250.0, 9550.0, 14260.0, 14115.0, 10084.0, 10382.0],
        "OverallQual" => &[7.0, 6.0, 7.0, 7.0, 8.0, 5.0, 8.0, 7.0],
        "GrLivArea" => &[1710.0, 1262.0, 1786.0, 1717.0, 2198.0, 1362.0, 1694.0, 2090.0],
        "YearBuilt" => &[2003.0, 1976.0, 2001.0, 1915.0, 2000.0, 1993.0, 2004.0, 1973.0],
        "CentralAir" => &["Y", "N", "Y", "Y", "N", "Y", "Y", "Y"],
        "Neighborhood" => &["CollgCr", "Veenker", "CollgCr", "Crawfor", "NoRidge", "Crawfor", "Veenker", "CollgCr"],
        "Alley" => &[None, None, Some("Grvl"), None, None, Some("Pave"), None, None],
        "SalePrice" => &[208500.0, 181500.0, 223500.0, 140000.0, 250000.0, 143000.0, 307000.0, 200000.0],
    )
    .unwrap()
}

fn held_out_df() -> DataFrame {
    df!(
        "Id" => &[9i64, 10, 11],
        "LotFrontage" => &[None, Some(72.0), Some(55.0)],
        "LotArea" => &[6120.0, 7420.0, 11924.0],
        "OverallQual" => &[7.0, 5.0, 9.0],
        "GrLivArea" => &[1774.0, 1077.0, 2324.0],
        "YearBuilt" => &[1931.0, 1939.0, 2005.0],
        "CentralAir" => &["Y", "N", "Y"],
        "Neighborhood" => &["OldTown", "CollgCr", "Veenker"],
        "Alley" => &[None, Some("Grvl"), None],
        "SalePrice" => &[129900.0, 118000.0, 345000.0],
    )
    .unwrap()
}

fn f64_values(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

#[test]
fn test_held_out_imputed_with_training_median() {
    let mut handler = MissingValueHandler::median(["LotFrontage"]);
    handler.fit(&train_df()).unwrap();
    assert_eq!(handler.fill_value("LotFrontage"), Some(66.5));

    let out = handler.transform(&held_out_df()).unwrap();
    assert_eq!(f64_values(&out, "LotFrontage"), vec![66.5, 72.0, 55.0]);

    let flags: Vec<bool> = out
        .column("LotFrontage_missing")
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(flags, vec![true, false, false]);
}

#[test]
fn test_held_out_scaled_with_training_statistics() {
    let mut scaler = Standardizer::new(["LotArea"]);
    scaler.fit(&train_df()).unwrap();
    let (mean, scale) = scaler.params("LotArea").unwrap();

    let out = scaler.transform(&held_out_df()).unwrap();
    let expected = (6120.0 - mean) / scale;
    assert!((f64_values(&out, "LotArea")[0] - expected).abs() < 1e-12);
}

#[test]
fn test_encoders_apply_training_categories() {
    let mut binary = BinaryEncoder::new(["CentralAir"]);
    binary.fit(&train_df()).unwrap();
    let out = binary.transform(&held_out_df()).unwrap();
    assert_eq!(f64_values(&out, "CentralAir"), vec![1.0, 0.0, 1.0]);

    let mut one_hot = OneHotEncoder::new(["Neighborhood"]);
    one_hot.fit(&train_df()).unwrap();
    let out = one_hot.transform(&held_out_df()).unwrap();
    assert!(out.column("Neighborhood").is_err());
    assert!(out.column("Neighborhood_OldTown").is_err());
    // Unseen "OldTown" row gets no indicator
    for name in one_hot.output_names() {
        assert_eq!(f64_values(&out, &name)[0], 0.0, "{}", name);
    }
    assert_eq!(f64_values(&out, "Neighborhood_CollgCr")[1], 1.0);
}

#[test]
fn test_pipeline_output_is_fully_numeric() {
    let mut pipeline = PreprocessingPipeline::from_config(&PipelineConfig::housing()).unwrap();
    let train = pipeline.fit_transform(&train_df()).unwrap();
    let held_out = pipeline.transform(&held_out_df()).unwrap();

    let names: Vec<String> = held_out
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, pipeline.feature_names());
    assert_eq!(train.width(), held_out.width());

    for column in held_out.get_columns() {
        assert_eq!(column.null_count(), 0, "{} has absent values", column.name());
        assert!(
            matches!(column.dtype(), DataType::Float64 | DataType::Boolean),
            "{} is {}",
            column.name(),
            column.dtype()
        );
    }

    assert!(names.contains(&"LotFrontage_missing".to_string()));
    assert!(names.contains(&"Alley_None".to_string()));
    assert!(names.contains(&"OverallQual*GrLivArea".to_string()));
    assert!(!names.contains(&"Id".to_string()));
    assert!(!names.contains(&"SalePrice".to_string()));
}

#[test]
fn test_pipeline_standardizes_training_rows() {
    let mut pipeline = PreprocessingPipeline::from_config(&PipelineConfig::housing()).unwrap();
    let train = pipeline.fit_transform(&train_df()).unwrap();

    for column in ["LotArea", "GrLivArea", "OverallQual*LotArea"] {
        let values = f64_values(&train, column);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        assert!(mean.abs() < 1e-9, "{} mean = {}", column, mean);
        assert!((var - 1.0).abs() < 1e-9, "{} var = {}", column, var);
    }
}

#[test]
fn test_pipeline_transform_is_row_independent() {
    let mut pipeline = PreprocessingPipeline::from_config(&PipelineConfig::housing()).unwrap();
    pipeline.fit(&train_df()).unwrap();

    let all = pipeline.transform(&held_out_df()).unwrap();
    let single = pipeline.transform(&held_out_df().slice(1, 1)).unwrap();
    for name in pipeline.feature_names() {
        if matches!(all.column(name).unwrap().dtype(), DataType::Boolean) {
            continue;
        }
        assert_eq!(f64_values(&all, name)[1], f64_values(&single, name)[0], "{}", name);
    }
}

#[test]
fn test_pipeline_fits_once() {
    let mut pipeline = PreprocessingPipeline::from_config(&PipelineConfig::housing()).unwrap();
    assert!(matches!(pipeline.transform(&held_out_df()), Err(PrepError::NotFitted)));

    pipeline.fit(&train_df()).unwrap();
    assert!(pipeline.is_fitted());
    assert!(matches!(pipeline.fit(&held_out_df()), Err(PrepError::AlreadyFitted)));

    let metrics = pipeline.performance_metrics();
    assert_eq!(metrics.get("samples_fitted"), Some(&8.0));
    assert!(metrics.contains_key("fit_time"));
}

#[test]
fn test_binary_encoder_rejects_unseen_value() {
    let mut binary = BinaryEncoder::new(["CentralAir"]);
    binary.fit(&train_df()).unwrap();
    let odd = df!("CentralAir" => &["Y", "P"]).unwrap();
    assert!(matches!(
        binary.transform(&odd),
        Err(PrepError::UnknownCategory { category, .. }) if category == "P"
    ));
}

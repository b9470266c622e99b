use pdf_collate::*;
use tempfile::NamedTempFile;

#[test]
fn test_default_options() {
    let options = MergeOptions::default();
    assert_eq!(options.size_mode, SizeMode::MostCommonExact);
    assert_eq!(options.transform_mode, TransformMode::FitCentered);
    assert_eq!(options.default_size, PageSize::new(595.0, 842.0));
    assert_eq!(options.tolerance_pt, 5.0);
    assert_eq!(options.downscale_weight, 0.01);
    assert!(options.validate().is_ok());
}

#[test]
fn test_validate() {
    let bad_size = MergeOptions {
        default_size: PageSize::new(0.0, 842.0),
        ..Default::default()
    };
    assert!(bad_size.validate().is_err());

    let bad_tolerance = MergeOptions {
        tolerance_pt: f32::NAN,
        ..Default::default()
    };
    assert!(bad_tolerance.validate().is_err());

    let bad_weight = MergeOptions {
        downscale_weight: -0.5,
        ..Default::default()
    };
    assert!(bad_weight.validate().is_err());
}

#[tokio::test]
async fn test_save_and_load() {
    let options = MergeOptions {
        size_mode: SizeMode::BestFitStandard,
        transform_mode: TransformMode::CanvasOnly,
        tolerance_pt: 2.5,
        ..Default::default()
    };
    let temp = NamedTempFile::new().unwrap();

    options.save(temp.path()).await.unwrap();
    let json = std::fs::read_to_string(temp.path()).unwrap();
    assert!(json.contains("\"best-fit-standard\""));
    assert!(json.contains("\"canvas-only\""));

    let loaded = MergeOptions::load(temp.path()).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_load_partial_config() {
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), r#"{ "size_mode": "most-common-standard" }"#).unwrap();

    let loaded = MergeOptions::load(temp.path()).await.unwrap();
    assert_eq!(loaded.size_mode, SizeMode::MostCommonStandard);
    assert_eq!(loaded.tolerance_pt, 5.0);
}

#[tokio::test]
async fn test_load_invalid_config() {
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), r#"{ "tolerance_pt": -3.0 }"#).unwrap();
    assert!(matches!(
        MergeOptions::load(temp.path()).await,
        Err(CollateError::Config(_))
    ));

    std::fs::write(temp.path(), "not json").unwrap();
    assert!(matches!(
        MergeOptions::load(temp.path()).await,
        Err(CollateError::Config(_))
    ));
}

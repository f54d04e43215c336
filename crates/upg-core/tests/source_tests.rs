use tempfile::TempDir;
use upg_core::navigation::qualified_name;
use upg_core::{
    DataSource, DefPath, DefPathKind, FileSource, Function, Navigation, SourceError,
};

fn poc_navigation() -> Navigation {
    use DefPathKind::*;
    Navigation::build(vec![
        vec![DefPath::new(Mod, "poc"), DefPath::new(Fn, "f")],
        vec![
            DefPath::new(Mod, "poc"),
            DefPath::new(Struct, "SecretRegion"),
            DefPath::new(AssocFn, "set_len"),
        ],
    ])
}

fn create_test_source() -> (FileSource, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let source = FileSource::new(temp_dir.path());
    (source, temp_dir)
}

#[tokio::test]
async fn test_save_and_load_navigation() {
    let (source, _temp) = create_test_source();
    let navi = poc_navigation();
    source.save_navigation(&navi).await.unwrap();

    let loaded = source.navigation().await.unwrap();
    assert_eq!(loaded, navi);
    assert!(source.navi_file().ends_with("navi/navi.json"));
}

#[tokio::test]
async fn test_save_and_load_function() {
    let (source, _temp) = create_test_source();
    let navi = poc_navigation();
    let idx = navi.index_of("poc::SecretRegion::set_len").unwrap();
    let name = qualified_name(navi.path(idx).unwrap());

    let mut func = Function::empty();
    func.name = "SecretRegion::set_len".to_string();
    func.safe = false;
    func.src = "pub unsafe fn set_len(&mut self, l: usize) { self.len = l; }".to_string();
    source.save_function(&name, &func).await.unwrap();

    let loaded = source.function(&name).await.unwrap();
    assert_eq!(loaded, func);
}

#[tokio::test]
async fn test_missing_documents() {
    let (source, _temp) = create_test_source();
    assert!(matches!(
        source.navigation().await,
        Err(SourceError::NotFound(_))
    ));
    assert!(matches!(
        source.function("poc::f").await,
        Err(SourceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_malformed_function_is_decode_error() {
    let (source, temp) = create_test_source();
    let dir = temp.path().join("function");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("poc::f.json"), r#"{"name": "f"}"#).unwrap();

    let err = source.function("poc::f").await.unwrap_err();
    assert!(matches!(err, SourceError::Decode { .. }));
}

#[tokio::test]
async fn test_invalid_navigation_is_rejected() {
    let (source, temp) = create_test_source();
    let dir = temp.path().join("navi");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("navi.json"),
        r#"{"data": [], "navi": {}, "name_to_path": {"x": 0}, "path_to_name": {}}"#,
    )
    .unwrap();

    let err = source.navigation().await.unwrap_err();
    assert!(matches!(err, SourceError::Navigation(_)));
}

#[tokio::test]
async fn test_path_traversal_rejected() {
    let (source, _temp) = create_test_source();
    let err = source.function("../../etc/passwd").await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidName(_)));
}

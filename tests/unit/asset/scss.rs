use super::*;
use crate::filter::CallbackFilter;

fn upper() -> Arc<CallbackFilter> {
    Arc::new(CallbackFilter::new("upper", |s| Ok(s.to_uppercase())))
}

#[test]
fn defaults_point_at_current_dir() {
    let asset = ScssAsset::new();
    assert_eq!(asset.content(), None);
    assert_eq!(asset.source_root(), "./");
    assert_eq!(asset.source_path(), "./");
    assert_eq!(asset.source_directory(), "./");
    assert_eq!(asset.target_path(), "./");
    assert!(asset.filters().is_empty());
    assert!(asset.vars().is_empty());
    assert!(asset.values().is_empty());
}

#[test]
fn dump_without_filters_is_identity() {
    let mut asset = ScssAsset::with_content("a { color: red; }");
    assert_eq!(
        asset.dump(None).unwrap().as_deref(),
        Some("a { color: red; }")
    );
    assert_eq!(asset.content(), Some("a { color: red; }"));

    let mut empty = ScssAsset::new();
    assert_eq!(empty.dump(None).unwrap(), None);
}

#[test]
fn dump_with_one_filter_runs_it_once() {
    let filter = upper();
    let mut asset = ScssAsset::with_content("abc");
    asset.load(Some(filter.clone()));

    let out = asset.dump(None).unwrap();
    assert_eq!(out.as_deref(), Some("ABC"));
    assert_eq!(filter.calls(), 1);
    assert_eq!(asset.content(), Some("ABC"));
}

#[test]
fn dump_attaches_additional_filter_once() {
    let filter = upper();
    let mut asset = ScssAsset::with_content("x");
    asset.dump(Some(filter.clone())).unwrap();
    asset.dump(Some(filter.clone())).unwrap();
    assert_eq!(asset.filters().len(), 1);
    assert_eq!(filter.calls(), 2);
}

#[test]
fn later_filters_see_earlier_output() {
    let mut asset = ScssAsset::with_content("a");
    asset.load(Some(Arc::new(CallbackFilter::new("b", |s| Ok(format!("{s}b"))))));
    asset.load(Some(Arc::new(CallbackFilter::new("c", |s| Ok(format!("{s}c"))))));
    assert_eq!(asset.dump(None).unwrap().as_deref(), Some("abc"));
}

#[test]
fn repeated_dump_refilters_mutated_content() {
    let mut asset = ScssAsset::with_content("a");
    asset.load(Some(Arc::new(CallbackFilter::new("x", |s| Ok(format!("{s}!"))))));
    assert_eq!(asset.dump(None).unwrap().as_deref(), Some("a!"));
    assert_eq!(asset.dump(None).unwrap().as_deref(), Some("a!!"));
}

#[test]
fn dump_propagates_filter_errors() {
    let mut asset = ScssAsset::with_content("keep");
    let failing = Arc::new(CallbackFilter::new("fail", |_| {
        Err(crate::ScssError::validation("nope"))
    }));
    let after = upper();
    asset.load(Some(failing));
    asset.load(Some(after.clone()));

    let err = asset.dump(None).unwrap_err();
    assert!(err.to_string().contains("nope"));
    assert_eq!(after.calls(), 0);
    assert_eq!(asset.content(), Some("keep"));
}

#[test]
fn ensure_filter_is_idempotent() {
    let filter: Arc<dyn Filter> = upper();
    let mut asset = ScssAsset::new();
    asset.ensure_filter(filter.clone());
    asset.ensure_filter(filter.clone());
    assert_eq!(asset.filters().len(), 1);
}

#[test]
fn ensure_filter_distinguishes_instances() {
    let mut asset = ScssAsset::new();
    asset.ensure_filter(upper());
    asset.ensure_filter(upper());
    assert_eq!(asset.filters().len(), 2);
}

#[test]
fn load_appends_even_duplicates() {
    let filter: Arc<dyn Filter> = upper();
    let mut asset = ScssAsset::new();
    asset.load(Some(filter.clone()));
    asset.load(Some(filter));
    asset.load(None);
    assert_eq!(asset.filters().len(), 2);
}

#[test]
fn clear_filters_empties_chain() {
    let mut asset = ScssAsset::with_content("x");
    asset.load(Some(upper()));
    asset.clear_filters();
    assert!(asset.filters().is_empty());
    assert_eq!(asset.dump(None).unwrap().as_deref(), Some("x"));
}

#[test]
fn set_values_merges() {
    let mut asset = ScssAsset::new();
    asset.set_values(BTreeMap::from([("a".to_string(), serde_json::json!(1))]));
    asset.set_values(BTreeMap::from([("b".to_string(), serde_json::json!(2))]));
    assert_eq!(
        asset.values(),
        &BTreeMap::from([
            ("a".to_string(), serde_json::json!(1)),
            ("b".to_string(), serde_json::json!(2)),
        ])
    );

    asset.set_values(BTreeMap::from([("a".to_string(), serde_json::json!("x"))]));
    assert_eq!(asset.values()["a"], serde_json::json!("x"));
    assert_eq!(asset.values().len(), 2);

    asset.set_values(BTreeMap::new());
    assert_eq!(asset.values().len(), 2);
}

#[test]
fn vars_and_locations_are_settable() {
    let mut asset = ScssAsset::new().with_vars(["locale", "theme"]);
    asset.set_source_root("/srv/web".to_string());
    asset.set_source_path("css/main.scss".to_string());
    asset.set_source_directory("/srv/web/css".to_string());
    asset.set_target_path("/assets/main.css".to_string());

    assert!(asset.vars().contains("locale"));
    assert_eq!(asset.vars().len(), 2);
    assert_eq!(asset.source_root(), "/srv/web");
    assert_eq!(asset.source_path(), "css/main.scss");
    assert_eq!(asset.source_directory(), "/srv/web/css");
    assert_eq!(asset.target_path(), "/assets/main.css");
}

#[test]
fn last_modified_is_now() {
    let asset = ScssAsset::new();
    let before = SystemTime::now();
    let stamp = asset.last_modified();
    assert!(stamp >= before);
}

#[test]
fn from_path_sets_locations() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.scss");
    std::fs::write(&file, "$c: red;").unwrap();

    let asset = ScssAsset::from_path(&file).unwrap();
    let dir_str = dir.path().to_string_lossy();
    assert_eq!(asset.content(), Some("$c: red;"));
    assert_eq!(asset.source_directory(), dir_str);
    assert_eq!(asset.source_root(), dir_str);
    assert_eq!(asset.source_path(), "main.scss");
}

#[test]
fn from_path_reports_missing_file() {
    let err = ScssAsset::from_path("/no/such/file.scss").unwrap_err();
    assert!(err.to_string().contains("/no/such/file.scss"));
}

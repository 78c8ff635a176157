use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn empty_object_yields_defaults() {
    let cfg = PackConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, PackConfig::default());
    assert_eq!(cfg.padding, 10);
    assert_eq!(cfg.stroke.width, 5.0);
    assert_eq!(cfg.stroke.steps, 8);
    assert_eq!(cfg.stroke.margin, 20);
    assert_eq!(cfg.stroke.color, Rgba8::WHITE);
    assert_eq!(cfg.archive_name, "Sticker_Pack_Premium.zip");
    assert_eq!(cfg.fixed_name_policy, FixedNamePolicy::LastWins);
    assert_eq!(cfg.specs.len(), 3);
}

#[test]
fn partial_overrides_keep_other_defaults() {
    let json = r##"
{
  "stroke": { "width": 6, "color": "#000000" },
  "padding": 12,
  "filter": "lanczos3",
  "fixed_name_policy": "first-wins"
}
"##;
    let cfg = PackConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.stroke.width, 6.0);
    assert_eq!(cfg.stroke.steps, 8);
    assert_eq!(cfg.stroke.color, Rgba8::rgb(0, 0, 0));
    assert_eq!(cfg.padding, 12);
    assert_eq!(cfg.filter, ResampleFilter::Lanczos3);
    assert_eq!(cfg.fixed_name_policy, FixedNamePolicy::FirstWins);

    let opts = cfg.pack_options();
    assert_eq!(opts.padding, 12);
    assert_eq!(opts.specs, default_specs());
}

#[test]
fn custom_spec_list_parses() {
    let json = r#"
{
  "specs": [
    { "name": "icon", "target_width": 128, "target_height": 128,
      "archive_folder": "icon", "fixed_file_name": "icon.png" },
    { "name": "emoji", "target_width": 180, "target_height": 180, "archive_folder": "emoji" }
  ]
}
"#;
    let cfg = PackConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.specs[0].entry_path(4), "icon/icon.png");
    assert_eq!(cfg.specs[1].entry_path(4), "emoji/05.png");
}

#[test]
fn unknown_fields_and_bad_values_are_rejected() {
    assert!(matches!(
        PackConfig::from_reader(r#"{ "paddding": 3 }"#.as_bytes()),
        Err(StickerError::Serde(_))
    ));
    assert!(matches!(
        PackConfig::from_reader(r#"{ "stroke": { "steps": 0 } }"#.as_bytes()),
        Err(StickerError::Validation(_))
    ));
    assert!(matches!(
        PackConfig::from_reader(r#"{ "padding": 200 }"#.as_bytes()),
        Err(StickerError::Validation(_))
    ));
    assert!(matches!(
        PackConfig::from_reader(r#"{ "archive_name": "a/b.zip" }"#.as_bytes()),
        Err(StickerError::Validation(_))
    ));
}

#[test]
fn default_config_round_trips_through_json() {
    let json = serde_json::to_string_pretty(&PackConfig::default()).unwrap();
    let back = PackConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, PackConfig::default());
}

#[test]
fn missing_file_is_reported() {
    let err = PackConfig::from_path("target/does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("open pack config"));
}

#[test]
fn oversized_canvases_are_rejected() {
    assert!(matches!(
        PackConfig::from_reader(r#"{ "stroke": { "margin": 100000 } }"#.as_bytes()),
        Err(StickerError::Validation(_))
    ));

    let json = r#"
{
  "specs": [
    { "name": "huge", "target_width": 100000, "target_height": 240, "archive_folder": "huge" }
  ]
}
"#;
    let err = PackConfig::from_reader(json.as_bytes()).unwrap_err();
    assert!(matches!(err, StickerError::Validation(_)));
    assert!(err.to_string().contains("exceeds maximum dimension"));

    let mut cfg = PackConfig::default();
    cfg.stroke.margin = crate::raster::codec::MAX_DIMENSION;
    cfg.validate().unwrap();
}

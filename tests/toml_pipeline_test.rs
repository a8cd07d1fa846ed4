use anyhow::Result;
use httpmock::prelude::*;
use quakemap::utils::error::{ErrorCategory, ErrorSeverity};
use quakemap::utils::validation::Validate;
use quakemap::{LocalStorage, MapEngine, MapPipeline, TomlConfig};
use std::io::Write;
use tempfile::TempDir;

const PLATES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"LAYER": "plate", "Code": "AF", "PlateName": "Africa"},
      "geometry": {"type": "Polygon", "coordinates": [[[-0.43, -54.85], [-0.18, -54.82], [0.3, -54.8], [-0.43, -54.85]]]}
    }
  ]
}"#;

#[tokio::test]
async fn test_toml_config_with_local_plates_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let plates_path = temp_dir.path().join("PB2002_plates.json");
    std::fs::File::create(&plates_path)?.write_all(PLATES.as_bytes())?;
    let output_dir = temp_dir.path().join("out");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/all_day.geojson")
            .header("x-client", "quakemap-tests");
        then.status(200).json_body(serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "id": "hv1",
                    "properties": {"mag": 3.0, "place": "Volcano, Hawaii"},
                    "geometry": {"type": "Point", "coordinates": [-155.2, 19.4, 15.0]}
                }
            ]
        }));
    });

    let toml_content = format!(
        r#"
[map]
name = "integration"
center = [19.4, -155.2]
zoom = 7

[source]
earthquakes = "{endpoint}"
plates = "{plates}"
timeout_seconds = 5

[source.headers]
x-client = "quakemap-tests"

[load]
output_path = "{output}"
output_formats = ["json"]

[load.compression]
enabled = true
filename = "hawaii.zip"
"#,
        endpoint = server.url("/all_day.geojson"),
        plates = plates_path.display(),
        output = output_dir.display(),
    );

    let config = TomlConfig::from_toml_str(&toml_content)?;
    config.validate()?;

    let storage = LocalStorage::new(output_dir.clone());
    let engine = MapEngine::new(MapPipeline::new(storage, config));
    let result = engine.run().await?;

    api_mock.assert();
    assert!(result.ends_with("hawaii.zip"));

    let zip_data = std::fs::read(output_dir.join("hawaii.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 1);

    let mut map_json = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("map.json")?, &mut map_json)?;
    let map: serde_json::Value = serde_json::from_str(&map_json)?;

    assert_eq!(map["view"]["center"], serde_json::json!([19.4, -155.2]));
    assert_eq!(map["view"]["zoom"], 7);
    assert_eq!(map["variant"], "earthquakes_with_plates");

    let marker = &map["overlays"]["earthquakes"][0];
    assert_eq!(marker["id"], "hv1");
    assert_eq!(marker["style"]["radius"], 12.0);
    assert_eq!(marker["style"]["fillColor"], "#dcf400");
    assert!(marker["occurredAt"].is_null());
    assert_eq!(map["overlays"]["tectonicPlates"][0]["name"], "Africa");

    Ok(())
}

#[tokio::test]
async fn test_toml_missing_plates_file_is_input_error() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/q");
        then.status(200)
            .json_body(serde_json::json!({"type": "FeatureCollection", "features": []}));
    });

    let toml_content = format!(
        r#"
[map]
name = "missing-plates"

[source]
earthquakes = "{}"
plates = "{}"

[load]
output_path = "{}"
output_formats = ["json"]
"#,
        server.url("/q"),
        temp_dir.path().join("nope.json").display(),
        temp_dir.path().display(),
    );

    let config = TomlConfig::from_toml_str(&toml_content)?;
    let engine = MapEngine::new(MapPipeline::new(LocalStorage::new(temp_dir.path()), config));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, quakemap::MapError::FeedRead { .. }));
    assert_eq!(err.category(), ErrorCategory::Input);
    assert_eq!(err.severity(), ErrorSeverity::High);
    assert_eq!(err.severity().exit_code(), 1);

    Ok(())
}

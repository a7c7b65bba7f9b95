//! End-to-end pipeline tests over in-memory datasets.

use cropfreq_analysis::{AnalysisConfig, Analyzer, MemorySource};
use cropfreq_core::{Crs, GeoTransform, Raster};

/// 5x5 unit-cell raster spanning x 0..5, y 0..5 in WGS84.
/// Rows top-down: two rows of 0, then a row each of 3, 7, 9.
fn frequency_raster() -> Raster<i32> {
    let mut raster: Raster<i32> = Raster::new(5, 5);
    raster.set_transform(GeoTransform::new(0.0, 5.0, 1.0, -1.0));
    raster.set_crs(Some(Crs::wgs84()));
    for col in 0..5 {
        raster.set(2, col, 3).unwrap();
        raster.set(3, col, 7).unwrap();
        raster.set(4, col, 9).unwrap();
    }
    raster
}

fn analyzer_with(datasets: &[(&str, Raster<i32>)]) -> Analyzer<MemorySource> {
    let mut source = MemorySource::new();
    for (name, raster) in datasets {
        source.insert(*name, raster.clone());
    }
    Analyzer::new(source, AnalysisConfig::default())
}

/// L-shape covering rows 0-2 fully plus the first two cells of row 3:
/// categories {0: 10, 3: 5, 7: 2}.
const L_SHAPED_AOI: &str = r#"{
    "type": "Polygon",
    "coordinates": [[
        [0.0, 5.0], [5.0, 5.0], [5.0, 2.0], [2.0, 2.0],
        [2.0, 1.0], [0.0, 1.0], [0.0, 5.0]
    ]]
}"#;

const FAR_AWAY_AOI: &str = r#"{
    "type": "Polygon",
    "coordinates": [[
        [100.0, 40.0], [101.0, 40.0], [101.0, 41.0], [100.0, 41.0], [100.0, 40.0]
    ]]
}"#;

#[test]
fn full_pipeline_histogram_and_statistics() {
    let analyzer = analyzer_with(&[("corn", frequency_raster())]);
    let response = analyzer.analyze(L_SHAPED_AOI).unwrap();

    let corn = &response["corn"];
    assert_eq!(corn.categories.get("0"), Some(&10));
    assert_eq!(corn.categories.get("3"), Some(&5));
    assert_eq!(corn.categories.get("7"), Some(&2));
    assert_eq!(corn.sum, 29);
    assert!((corn.mean - 29.0 / 7.0).abs() < 1e-12);
}

#[test]
fn aoi_outside_every_raster_yields_nodata_entries() {
    let analyzer = analyzer_with(&[
        ("corn", frequency_raster()),
        ("soybeans", frequency_raster()),
    ]);
    let response = analyzer.analyze(FAR_AWAY_AOI).unwrap();

    assert_eq!(response.len(), 2);
    for stats in response.values() {
        assert_eq!(stats.categories.get("nodata"), Some(&0));
        assert_eq!(stats.categories.len(), 1);
        assert_eq!(stats.sum, 0);
        assert_eq!(stats.mean, 0.0);
    }
}

#[test]
fn union_of_overlapping_features_covers_at_least_each_part() {
    // Two overlapping squares: [0,3]x[2,5] and [2,5]x[0,3]
    let collection = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 2.0], [3.0, 2.0], [3.0, 5.0], [0.0, 5.0], [0.0, 2.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[2.0, 0.0], [5.0, 0.0], [5.0, 3.0], [2.0, 3.0], [2.0, 0.0]]]
                }
            }
        ]
    }"#;
    let square_a = r#"{
        "type": "Polygon",
        "coordinates": [[[0.0, 2.0], [3.0, 2.0], [3.0, 5.0], [0.0, 5.0], [0.0, 2.0]]]
    }"#;

    let analyzer = analyzer_with(&[("corn", frequency_raster())]);

    let merged = &analyzer.analyze(collection).unwrap()["corn"];
    let single = &analyzer.analyze(square_a).unwrap()["corn"];

    let merged_total: u64 = merged.categories.values().sum();
    let single_total: u64 = single.categories.values().sum();

    // 9 + 9 - 1 shared cell center vs 9
    assert_eq!(merged_total, 17);
    assert_eq!(single_total, 9);
    assert!(merged_total >= single_total);

    for (category, count) in &single.categories {
        assert!(merged.categories.get(category).is_some_and(|c| c >= count));
    }
}

#[test]
fn response_serializes_to_flat_per_dataset_objects() {
    let analyzer = analyzer_with(&[("corn", frequency_raster())]);
    let response = analyzer.analyze(L_SHAPED_AOI).unwrap();

    let value = serde_json::to_value(&response).unwrap();
    let corn = value["corn"].as_object().unwrap();

    assert_eq!(corn["0"], 10);
    assert_eq!(corn["3"], 5);
    assert_eq!(corn["7"], 2);
    assert_eq!(corn["sum"], 29);
    assert!(corn["mean"].as_f64().unwrap() > 4.0);
}

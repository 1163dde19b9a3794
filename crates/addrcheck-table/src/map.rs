use crate::Result;
use addrcheck_core::BatchReport;
use serde_json::{json, Value};
use std::io::Write;

/// GeoJSON `FeatureCollection` with one point per geocoded row. Rows without
/// both coordinates are left off the map.
pub fn map_geojson(report: &BatchReport) -> Value {
    let features: Vec<Value> = report
        .points()
        .map(|(row, point)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [point.longitude, point.latitude],
                },
                "properties": {
                    "row": row.index + 1,
                    "standardized_address": row.verdict.standardized_address,
                    "needs_update": row.verdict.needs_update,
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn write_map<W: Write>(mut writer: W, report: &BatchReport) -> Result<usize> {
    let map = map_geojson(report);
    serde_json::to_writer_pretty(&mut writer, &map)?;
    writeln!(writer)?;
    Ok(report.points().count())
}

#[cfg(test)]
mod tests {
    use super::{map_geojson, write_map};
    use addrcheck_core::{
        AddressRecord, BatchReport, GeoPoint, ReportRow, StandardizedAddress, Tally,
        ValidationVerdict,
    };

    fn row(index: usize, verdict: ValidationVerdict, geo: Option<GeoPoint>) -> ReportRow {
        ReportRow {
            index,
            record: AddressRecord::default(),
            verdict,
            geo,
        }
    }

    #[test]
    fn only_rows_with_coordinates_become_points() {
        let valid = ValidationVerdict::from_standardized(
            &StandardizedAddress {
                secondary_address: None,
                street_address: "123 MAIN ST".to_string(),
                city: "SPRINGFIELD".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
            },
            "123 Main St, Springfield, IL 62701",
        );

        let report = BatchReport {
            rows: vec![
                row(0, valid.clone(), GeoPoint::new(39.8, -89.6)),
                row(1, valid, None),
                row(2, ValidationVerdict::not_found(), None),
            ],
            tally: Tally::default(),
            geocoded: true,
        };

        let map = map_geojson(&report);
        let features = map["features"].as_array().expect("features");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["row"], 1);
        assert_eq!(
            features[0]["properties"]["standardized_address"],
            "123 MAIN ST, SPRINGFIELD, IL 62701"
        );
        assert_eq!(features[0]["properties"]["needs_update"], false);
        assert_eq!(features[0]["geometry"]["coordinates"][0], -89.6);
        assert_eq!(features[0]["geometry"]["coordinates"][1], 39.8);

        let mut out = Vec::new();
        let written = write_map(&mut out, &report).expect("write");
        assert_eq!(written, 1);
        let parsed: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(parsed["type"], "FeatureCollection");
    }
}

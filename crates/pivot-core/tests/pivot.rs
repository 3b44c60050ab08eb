//! Integration tests for the pivot builder and reshape adapters.

use serde_json::{Value, json};

use pivot_core::{
    CategoryFilter, CollectingSink, Diagnostic, NullSink, PivotEngine, PivotRequest, build_pivot,
    canonicalize, to_heatmap_series, to_hierarchy, to_ranked_list,
};
use pivot_model::{EngineConfig, Record, SentinelPolicy, SynonymEntry, records_from_value};

fn records(value: Value) -> Vec<Record> {
    records_from_value(value).expect("test input is an array of objects")
}

#[test]
fn basic_pivot_scenario() {
    let input = records(json!([
        {"segment": "Pain", "date": "1/2/24"},
        {"segment": "Pain", "date": "1/2/24"},
        {"segment": "Fatigue", "date": "1/3/24"},
    ]));
    let table = build_pivot(&input, "segment", "date", None);
    assert_eq!(table.rows, vec!["Fatigue", "Pain"]);
    assert_eq!(table.columns, vec!["1/2/24", "1/3/24"]);
    assert_eq!(table.cell("Pain", "1/2/24").map(|c| c.count), Some(2));
    assert!(table.cell("Pain", "1/3/24").is_none());
    assert!(table.cell("Fatigue", "1/2/24").is_none());
    assert_eq!(table.total(), 3);
}

#[test]
fn record_without_date_contributes_nothing() {
    let input = records(json!([{"segment": "Pain", "date": ""}]));
    let table = build_pivot(&input, "segment", "date", None);
    assert!(table.rows.is_empty());
    assert!(table.columns.is_empty());
    assert!(table.is_empty());
}

#[test]
fn empty_input_is_a_valid_empty_table() {
    let sink = CollectingSink::new();
    let table = PivotEngine::default().build(&[], &PivotRequest::new("segment", "date"), &sink);
    assert!(table.is_empty());
    assert_eq!(table.row_field, "segment");
    assert!(sink.is_empty());
}

#[test]
fn mixed_date_formats_share_columns_and_sort_chronologically() {
    let input = records(json!([
        {"segment": "Pain", "date": "2024-03-04"},
        {"segment": "Pain", "date": "3/4/24"},
        {"segment": "Pain", "date": "3/4/2024"},
        {"segment": "Pain", "date": "2024-03-04T09:00:00Z"},
        {"segment": "Pain", "date": "12/31/2023"},
        {"segment": "Pain", "eventDate": "1/15/24"},
    ]));
    let table = build_pivot(&input, "segment", "date", None);
    assert_eq!(table.columns, vec!["12/31/23", "1/15/24", "3/4/24"]);
    assert_eq!(table.count("Pain", "3/4/24"), 4);
    assert_eq!(canonicalize("3/4/24"), canonicalize("2024-03-04"));
}

#[test]
fn dates_under_any_column_name_are_canonicalized() {
    let input = records(json!([
        {"segment": "Pain", "visit_date": "1/10/24", "eventDate": "1/10/24"},
        {"segment": "Pain", "visit_date": "1/2/24", "eventDate": "1/2/24"},
        {"segment": "Pain", "visit_date": "2024-01-02", "eventDate": "2024-01-02"},
    ]));
    for column_field in ["visit_date", "eventDate"] {
        let sink = CollectingSink::new();
        let table = PivotEngine::default().build(
            &input,
            &PivotRequest::new("segment", column_field),
            &sink,
        );
        assert_eq!(table.columns, vec!["1/2/24", "1/10/24"], "{column_field}");
        assert_eq!(table.count("Pain", "1/2/24"), 2, "{column_field}");
        assert!(sink.is_empty(), "{column_field}");
    }
}

#[test]
fn text_in_undeclared_column_passes_through_without_report() {
    let input = records(json!([
        {"segment": "Pain", "visit_date": "Admission"},
        {"segment": "Pain", "visit_date": "3/1/24"},
    ]));
    let sink = CollectingSink::new();
    let table = PivotEngine::default().build(
        &input,
        &PivotRequest::new("segment", "visit_date"),
        &sink,
    );
    assert_eq!(table.columns, vec!["3/1/24", "Admission"]);
    assert!(sink.is_empty());
}

#[test]
fn unparsed_dates_sort_after_parsed_dates_and_are_reported() {
    let input = records(json!([
        {"segment": "Pain", "date": "Admission"},
        {"segment": "Pain", "date": "2/1/24"},
        {"segment": "Pain", "date": "1/1/24"},
    ]));
    let sink = CollectingSink::new();
    let table = PivotEngine::default().build(&input, &PivotRequest::new("segment", "date"), &sink);
    assert_eq!(table.columns, vec!["1/1/24", "2/1/24", "Admission"]);
    assert_eq!(
        sink.diagnostics(),
        vec![Diagnostic::UnparsedDate {
            field: "date".to_string(),
            value: "Admission".to_string(),
        }]
    );
}

#[test]
fn sentinels_are_distinct_per_row_field() {
    let input = records(json!([{"date": "1/2/24"}]));
    let engine = PivotEngine::default();
    let by_segment = engine.build(&input, &PivotRequest::new("segment", "date"), &NullSink);
    let by_diagnosis = engine.build(&input, &PivotRequest::new("diagnosis", "date"), &NullSink);
    assert_eq!(by_segment.rows, vec!["Unspecified Symptom"]);
    assert_eq!(by_diagnosis.rows, vec!["Unclassified Diagnosis"]);
    assert_ne!(by_segment.rows, by_diagnosis.rows);
}

#[test]
fn configured_sentinel_and_synonym_apply() {
    let config = EngineConfig::default()
        .with_sentinels(SentinelPolicy::default().with_label("site", "No Site"))
        .with_synonym(SynonymEntry::new("site", ["clinic"]));
    let engine = PivotEngine::new(config);
    let input = records(json!([
        {"clinic": "North", "date": "1/2/24"},
        {"clinic": "", "date": "1/2/24"},
        {"clinic": "Annex", "date": "1/2/24"},
    ]));
    let table = engine.build(&input, &PivotRequest::new("site", "date"), &NullSink);
    assert_eq!(table.rows, vec!["Annex", "North", "No Site"]);
}

#[test]
fn filter_splits_symptoms_from_problems() {
    let input = records(json!([
        {"diagnosis": "Problem: Hypertension", "date": "1/2/24", "event_type": "problem"},
        {"diagnosis": "Headache", "date": "1/2/24", "eventType": "symptom"},
        {"diagnosis": "Headache", "date": "1/3/24", "event_type": "symptom"},
    ]));
    let engine = PivotEngine::default();
    let problems = engine.build(
        &input,
        &PivotRequest::new("diagnosis", "date").with_filter(CategoryFilter::event_type("problem")),
        &NullSink,
    );
    let symptoms = engine.build(
        &input,
        &PivotRequest::new("diagnosis", "date")
            .with_filter(CategoryFilter::new("event_type", "SYMPTOM")),
        &NullSink,
    );
    assert_eq!(problems.rows, vec!["Hypertension"]);
    assert_eq!(symptoms.rows, vec!["Headache"]);
    assert_eq!(symptoms.total(), 2);
    assert_eq!(symptoms.stats.filtered_out, 1);
}

#[test]
fn non_scalar_values_are_reported_and_sentineled() {
    let input = records(json!([{"segment": ["Pain"], "date": "1/2/24"}]));
    let sink = CollectingSink::new();
    let table = PivotEngine::default().build(&input, &PivotRequest::new("segment", "date"), &sink);
    assert_eq!(table.rows, vec!["Unspecified Symptom"]);
    assert!(
        sink.diagnostics()
            .contains(&Diagnostic::NonScalarValue { field: "segment".to_string() })
    );
}

#[test]
fn adapters_preserve_table_order() {
    let input = records(json!([
        {"segment": "Pain", "date": "1/3/24"},
        {"segment": "Pain", "date": "1/2/24"},
        {"segment": "Fatigue", "date": "1/3/24"},
        {"segment": "", "date": "1/2/24"},
    ]));
    let table = build_pivot(&input, "segment", "date", None);

    let heatmap = to_heatmap_series(&table);
    let ids: Vec<&str> = heatmap.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Fatigue", "Pain", "Unspecified Symptom"]);
    let xs: Vec<&str> = heatmap[0].data.iter().map(|p| p.x.as_str()).collect();
    assert_eq!(xs, vec!["1/2/24", "1/3/24"]);

    let ranked = to_ranked_list(&table);
    assert_eq!(ranked[0].id, "Pain");
    assert_eq!(ranked[0].value, 2);
    assert_eq!(ranked[1].id, "Fatigue");

    let hierarchy = to_hierarchy(&table);
    assert_eq!(hierarchy.len(), 3);
    assert_eq!(hierarchy[1].children.len(), 2);

    assert_eq!(to_heatmap_series(&table), heatmap);
    assert_eq!(to_ranked_list(&table), ranked);
}

#[test]
fn raw_dump_snapshot() {
    let input = records(json!([
        {"segment": "Pain", "date": "2024-01-02", "mention_id": "n1"},
        {"segment": "Fatigue", "date": "1/3/24"},
    ]));
    let table = build_pivot(&input, "segment", "date", None);
    insta::assert_json_snapshot!(table, @r#"
    {
      "row_field": "segment",
      "column_field": "date",
      "rows": [
        "Fatigue",
        "Pain"
      ],
      "columns": [
        "1/2/24",
        "1/3/24"
      ],
      "cells": {
        "Fatigue": {
          "1/3/24": {
            "count": 1
          }
        },
        "Pain": {
          "1/2/24": {
            "count": 1,
            "mentions": 1
          }
        }
      },
      "stats": {
        "input_records": 2,
        "filtered_out": 0,
        "dropped_missing_column": 0,
        "sentinel_rows": 0,
        "tabulated": 2
      }
    }
    "#);
}

//! Integration tests for the demographic cross-tab.

use chrono::NaiveDate;
use serde_json::{Value, json};

use pivot_core::{CollectingSink, DemographicRequest, Diagnostic, PivotEngine, build_demographic};
use pivot_model::{AgeRange, Indicator, Record, default_age_ranges, records_from_value};

fn patients(value: Value) -> Vec<Record> {
    records_from_value(value).expect("test input is an array of objects")
}

fn cohort_of_ten() -> Vec<Record> {
    let mut items = Vec::new();
    for index in 0..10 {
        let housing = if index < 3 { "Yes" } else { "No" };
        let gender = if index % 2 == 0 { "Female" } else { "" };
        items.push(json!({
            "age_range": "18-25",
            "housing_insecurity": housing,
            "gender": gender,
        }));
    }
    patients(Value::Array(items))
}

#[test]
fn housing_insecurity_percentage_scenario() {
    let table = build_demographic(
        &cohort_of_ten(),
        &[
            Indicator::boolean("housing_insecurity"),
            Indicator::demographic("gender"),
        ],
        &default_age_ranges(),
    );
    assert_eq!(table.percentage("housing_insecurity", "18-25"), 30.0);
    assert_eq!(table.percentage("gender", "18-25"), 50.0);
    assert_eq!(table.bucket_sizes["18-25"], 10);
    assert_eq!(table.total_records, 10);
    assert_eq!(table.max_percentage, 50.0);
    assert_eq!(table.rows, vec!["housing_insecurity", "gender"]);
}

#[test]
fn columns_follow_bucket_order_with_no_data_last() {
    let table = build_demographic(&[], &[Indicator::boolean("food_insecurity")], &default_age_ranges());
    assert_eq!(
        table.columns,
        vec!["0-17", "18-25", "26-35", "36-45", "46-55", "56-64", "65+", "No Data Available"]
    );
    assert_eq!(table.max_percentage, 0.0);
    assert!(table.cells["food_insecurity"].values().all(|v| *v == 0.0));
}

#[test]
fn birth_dates_use_reference_date() {
    let input = patients(json!([
        {"dob": "2000-07-01", "foodInsecurity": true},
        {"dateOfBirth": "7/1/1999", "food_insecurity": "no"},
        {"food_insecurity": "YES"},
    ]));
    let request = DemographicRequest::new(vec![Indicator::boolean("food_insecurity")])
        .with_age_ranges(vec![
            AgeRange::new("under 24", 0, Some(23)),
            AgeRange::new("24+", 24, None),
        ])
        .with_as_of(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    let sink = CollectingSink::new();
    let table = PivotEngine::default().build_demographic(&input, &request, &sink);

    assert_eq!(table.bucket_sizes["under 24"], 1);
    assert_eq!(table.bucket_sizes["24+"], 1);
    assert_eq!(table.bucket_sizes["No Data Available"], 1);
    assert_eq!(table.percentage("food_insecurity", "under 24"), 100.0);
    assert_eq!(table.percentage("food_insecurity", "24+"), 0.0);
    assert_eq!(table.percentage("food_insecurity", "No Data Available"), 100.0);
    assert!(sink.is_empty());
}

#[test]
fn duplicate_indicators_collapse_to_one_row() {
    let input = patients(json!([{"age": 20, "race": "Asian"}]));
    let request = DemographicRequest::new(vec![
        Indicator::demographic("race"),
        Indicator::demographic("race"),
    ]);
    let table = PivotEngine::default().build_demographic(&input, &request, &CollectingSink::new());
    assert_eq!(table.rows, vec!["race"]);
    assert_eq!(table.percentage("race", "18-25"), 100.0);
}

#[test]
fn colliding_age_range_labels_are_dropped_and_reported() {
    let input = patients(json!([
        {"age": 20, "food_insecurity": "yes"},
        {"age": 40, "food_insecurity": "no"},
    ]));
    let request = DemographicRequest::new(vec![Indicator::boolean("food_insecurity")])
        .with_age_ranges(vec![
            AgeRange::new("Adult", 18, Some(30)),
            AgeRange::new("adult", 31, Some(50)),
            AgeRange::new("No Data Available", 51, None),
        ]);
    let sink = CollectingSink::new();
    let table = PivotEngine::default().build_demographic(&input, &request, &sink);

    assert_eq!(table.columns, vec!["Adult", "No Data Available"]);
    assert_eq!(table.bucket_sizes["Adult"], 1);
    assert_eq!(table.bucket_sizes["No Data Available"], 1);
    assert_eq!(table.percentage("food_insecurity", "Adult"), 100.0);
    assert_eq!(table.percentage("food_insecurity", "No Data Available"), 0.0);
    assert_eq!(
        sink.diagnostics(),
        vec![
            Diagnostic::ConflictingAgeRange { label: "adult".to_string() },
            Diagnostic::ConflictingAgeRange { label: "No Data Available".to_string() },
        ]
    );
    assert!(sink.diagnostics().iter().all(Diagnostic::is_misconfiguration));
}

//! Tests for pivot-model types.

use pivot_model::{
    CrossTab, DemographicCrossTab, EngineConfig, HeatmapPoint, HeatmapSeries, HierarchyNode,
};

#[test]
fn heatmap_series_has_documented_shape() {
    let series = HeatmapSeries {
        id: "Pain".to_string(),
        data: vec![HeatmapPoint {
            x: "1/2/24".to_string(),
            y: 2,
        }],
    };
    insta::assert_json_snapshot!(series, @r#"
    {
      "id": "Pain",
      "data": [
        {
          "x": "1/2/24",
          "y": 2
        }
      ]
    }
    "#);
}

#[test]
fn hierarchy_leaves_omit_children() {
    let node = HierarchyNode::group(
        "Pain",
        vec![HierarchyNode::leaf("1/2/24", 2), HierarchyNode::leaf("1/3/24", 1)],
    );
    let json = serde_json::to_value(&node).expect("serialize node");
    assert!(json.get("value").is_none());
    assert_eq!(json["children"][0]["value"], 2);
    assert!(json["children"][0].get("children").is_none());
    assert_eq!(node.total(), 3);
}

#[test]
fn cross_tab_round_trips_through_json() {
    let table = CrossTab::empty("segment", "date");
    let json = serde_json::to_string(&table).expect("serialize table");
    let round: CrossTab = serde_json::from_str(&json).expect("deserialize table");
    assert_eq!(round, table);
    assert!(round.is_empty());
}

#[test]
fn demographic_percentage_defaults_to_zero() {
    let table = DemographicCrossTab::default();
    assert_eq!(table.percentage("housing_insecurity", "18-25"), 0.0);
}

#[test]
fn default_config_is_valid() {
    EngineConfig::default().validate().expect("default config validates");
}

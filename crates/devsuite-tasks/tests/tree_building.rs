//! End-to-end: JSON task rows in, display-ordered outline out.

use devsuite_tasks::{build_task_tree, task_depth, task_index, TaskRecord, TreeAnomaly};

const PROJECT_ROWS: &str = r#"[
    {"id": "t-design", "parentId": null, "sortKey": "a"},
    {"id": "t-build", "parentId": null, "sortKey": "b"},
    {"id": "t-wireframes", "parentId": "t-design", "sortKey": "a"},
    {"id": "t-review", "parentId": "t-design", "sortKey": "b"},
    {"id": "t-backend", "parentId": "t-build", "sortKey": "a"},
    {"id": "t-schema", "parentId": "t-backend", "sortKey": "a"}
]"#;

#[test]
fn json_rows_build_into_display_order() {
    let records: Vec<TaskRecord> = serde_json::from_str(PROJECT_ROWS).unwrap();
    let index_source = records.clone();

    let forest = build_task_tree(records).unwrap();
    assert!(forest.is_clean());

    let display: Vec<&str> = forest.flatten().iter().map(|n| n.id()).collect();
    assert_eq!(
        display,
        [
            "t-design",
            "t-wireframes",
            "t-review",
            "t-build",
            "t-backend",
            "t-schema",
        ]
    );

    // Indentation per row comes from the depth helper.
    let index = task_index(&index_source);
    let indents: Vec<usize> = index_source
        .iter()
        .map(|record| task_depth(record, &index))
        .collect();
    assert_eq!(indents, [0, 0, 1, 1, 1, 2]);
}

#[test]
fn anomalies_survive_serialization_for_diagnostics() {
    let rows = r#"[
        {"id": "kept", "parentId": "deleted-upstream", "sortKey": "a"}
    ]"#;
    let records: Vec<TaskRecord> = serde_json::from_str(rows).unwrap();
    let forest = build_task_tree(records).unwrap();

    assert_eq!(
        forest.anomalies,
        [TreeAnomaly::DanglingParent {
            task_id: "kept".to_string(),
            missing_parent_id: "deleted-upstream".to_string(),
        }]
    );

    // Diagnostics are plain data; the application layer ships them as JSON.
    let report = serde_json::to_value(&forest.anomalies).unwrap();
    assert_eq!(
        report[0]["danglingParent"]["taskId"],
        serde_json::Value::String("kept".to_string())
    );
}

#[test]
fn node_json_matches_the_flat_row_shape_plus_children() {
    let records: Vec<TaskRecord> = serde_json::from_str(PROJECT_ROWS).unwrap();
    let forest = build_task_tree(records).unwrap();

    let json = serde_json::to_value(&forest.roots[0]).unwrap();
    assert_eq!(json["id"], "t-design");
    assert_eq!(json["parentId"], serde_json::Value::Null);
    assert_eq!(json["children"][0]["id"], "t-wireframes");
}

use autodiff_core::{AutodiffError, Graph};
use std::fs;

#[test]
fn test_snapshot_round_trip_through_file() {
    let g = Graph::new();
    let x = g.named_variable("x", Some(2.0));
    let y = g.named_variable("y", None);
    let f = 3.0 * x.pow(2.0) + 2.0 * &y;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    fs::write(&path, g.to_json().unwrap()).unwrap();

    let restored = Graph::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(restored.len(), g.len());

    let rx = restored.find_variable("x").unwrap();
    let ry = restored.find_variable("y").unwrap();
    assert_eq!(rx.get(), Some(2.0));
    assert_eq!(ry.get(), None);

    let rf = restored.node(f.id()).unwrap();
    assert!(rf.value().is_err());
    ry.set_value(1.0);
    assert_eq!(rf.value().unwrap(), 14.0);
    assert_eq!(rf.der(&rx).unwrap(), 12.0);
    assert_eq!(rf.to_string(), f.to_string());

    // The original graph is untouched by edits to the copy.
    assert!(f.value().is_err());
}

#[test]
fn test_restored_graph_keeps_names_unique() {
    let g = Graph::new();
    g.named_variable("rate", Some(1.0));
    let restored = Graph::from_json(&g.to_json().unwrap()).unwrap();
    let again = restored.named_variable("rate", None);
    assert_eq!(again.name().as_deref(), Some("rate_1"));
}

#[test]
fn test_corrupt_snapshot_is_rejected() {
    assert!(Graph::from_json("{\"not\": \"a graph\"}").is_err());
}

#[test]
fn test_overflowing_operand_range_is_rejected() {
    let g = Graph::new();
    let x = g.variable_with(1.0);
    x.exp();
    let mut snapshot: serde_json::Value = serde_json::from_str(&g.to_json().unwrap()).unwrap();
    snapshot["operand_ranges"][1] = serde_json::json!([u32::MAX, 1]);

    let err = Graph::from_json(&snapshot.to_string()).unwrap_err();
    assert!(matches!(err, AutodiffError::InvalidArgument(_)), "{}", err);
}

#[test]
fn test_non_finite_payloads_round_trip() {
    let g = Graph::new();
    let x = g.named_variable("x", Some(f64::NAN));
    let big = g.constant(f64::INFINITY);
    let small = g.constant(f64::NEG_INFINITY);

    let restored = Graph::from_json(&g.to_json().unwrap()).unwrap();
    assert!(restored.find_variable("x").unwrap().get().unwrap().is_nan());
    assert_eq!(restored.node(big.id()).unwrap().value().unwrap(), f64::INFINITY);
    assert_eq!(restored.node(small.id()).unwrap().value().unwrap(), f64::NEG_INFINITY);
    assert!(x.get().unwrap().is_nan());
}

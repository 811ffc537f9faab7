//! End-to-end runs of the tandem binary against a throwaway store

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

fn tandem(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tandem"))
        .arg("--data-dir")
        .arg(home.join("data"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("share"))
        .env_remove("RUST_LOG")
        .output()
        .expect("run tandem")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

fn amount(value: &Value) -> f64 {
    value
        .as_str()
        .expect("amount as string")
        .parse()
        .expect("numeric amount")
}

#[test]
fn test_init_creates_store() {
    let home = TempDir::new().unwrap();
    let output = tandem(home.path(), &["init"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Schema version: 3"));
    assert!(home.path().join("data").join("database.db").exists());
}

#[test]
fn test_fresh_store_lists_sample_order() {
    let home = TempDir::new().unwrap();
    let orders = stdout_json(&tandem(home.path(), &["order", "list", "-f", "json"]));

    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["contract_number"], "20250407");
    assert_eq!(amount(&orders[0]["totals"]["order_total"]), 9700.0);
}

#[test]
fn test_catalog_suggest() {
    let home = TempDir::new().unwrap();
    let names = stdout_json(&tandem(
        home.path(),
        &["catalog", "suggest", "works", "DIAGNOST", "-f", "json"],
    ));

    assert_eq!(names, serde_json::json!(["Diagnostics"]));

    let none = stdout_json(&tandem(
        home.path(),
        &["catalog", "suggest", "works", "xyz", "-f", "json"],
    ));
    assert_eq!(none, serde_json::json!([]));
}

#[test]
fn test_save_draft_and_print() {
    let home = TempDir::new().unwrap();
    let draft = home.path().join("draft.json");
    std::fs::write(
        &draft,
        r#"{
            "contract_number": "A-100",
            "date": "01.04.2025",
            "customer": "North LLC",
            "plate_number": "K777OK",
            "brand": "Volvo",
            "vehicle_type": "Truck",
            "coefficient": "1.5",
            "works": [{"name": "Diagnostics", "unit": "pcs", "quantity": "2", "unit_price": "500"}],
            "materials": [{"name": "Filter", "unit": "pcs", "quantity": "1", "unit_price": "250,50"}]
        }"#,
    )
    .unwrap();

    let output = tandem(home.path(), &["order", "save", draft.to_str().unwrap(), "--print"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Saved order"));
    assert!(stdout.contains("Document:"));

    let orders = stdout_json(&tandem(
        home.path(),
        &["order", "list", "--type", "Truck", "-f", "json"],
    ));
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(amount(&orders[0]["totals"]["work_total_with_coeff"]), 1500.0);
    assert_eq!(amount(&orders[0]["totals"]["order_total"]), 1750.5);

    let types = stdout_json(&tandem(home.path(), &["order", "types", "-f", "json"]));
    assert_eq!(types, serde_json::json!(["Passenger", "Truck"]));

    let history = stdout_json(&tandem(home.path(), &["history", "list", "-f", "json"]));
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    let document = history[0]["document_path"].as_str().unwrap();
    assert!(Path::new(document).exists());
}

#[test]
fn test_duplicate_contract_number_fails() {
    let home = TempDir::new().unwrap();
    let draft = home.path().join("draft.json");
    std::fs::write(
        &draft,
        r#"{"contract_number": "20250407", "date": "02.04.2025", "customer": "Other",
            "plate_number": "B1", "brand": "Kia"}"#,
    )
    .unwrap();

    let output = tandem(home.path(), &["order", "save", draft.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("20250407"));
}

#[test]
fn test_show_missing_order_fails() {
    let home = TempDir::new().unwrap();
    let output = tandem(home.path(), &["order", "show", "424242"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

//! File logging example
//!
//! Loads a base configuration, overrides the destination root and writes a
//! few typed records to the dated per-type files.
//!
//! Run with: cargo run --example file_logging

use serde_json::{json, Map};
use typed_log_system::prelude::*;

const BASE: &str = r#"{
    "level": "info",
    "formatter": "Json",
    "lockEx": true,
    "file": null,
    "root": ".",
    "filters": [{"field": "card.number", "action": "redact"}],
    "types": {
        "common": ["host"],
        "order": ["orderId", "amount"],
        "payment": {"fields": ["orderId", "method"], "extendFields": ["common"]}
    }
}"#;

fn main() -> Result<()> {
    println!("=== Typed Log System - File Logging Example ===\n");

    let root = std::env::temp_dir().join("typed_log_system_demo");
    let mut overrides = Map::new();
    overrides.insert("root".to_string(), json!(root));

    let base = LoggerConfig::base_from_json_str(BASE)?;
    let logger = Logger::new(LoggerConfig::merge(&base, overrides)?.into())?;
    println!("{:?}\n", logger);

    println!("1. Writing valid records:");
    report(logger.info(fields! { "orderId" => "A1", "amount" => 100 }, "order"));
    report(logger.warning(
        fields! {
            "orderId" => "A1",
            "method" => "card",
            "host" => "web-1",
            "card" => fields! { "number" => "4111111111111111", "brand" => "visa" },
        },
        "payment",
    ));

    println!("\n2. Records that are not written:");
    report(logger.debug(fields! { "orderId" => "A2", "amount" => 5 }, "order"));
    report(logger.info(fields! { "orderId" => "A3" }, "order"));
    report(logger.info(fields! { "orderId" => "A4", "method" => "cash" }, "payment"));
    report(logger.info(fields! { "anything" => true }, "bogus"));

    let metrics = logger.metrics();
    println!(
        "\nwritten={} skipped={} rejected={} failed={}",
        metrics.written_count(),
        metrics.skipped_count(),
        metrics.rejected_count(),
        metrics.write_failed_count()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the log files", root.join("log").display());

    Ok(())
}

fn report(outcome: LogOutcome) {
    match outcome.destination() {
        Some(path) if outcome.is_written() => println!("   {} -> {}", outcome, path.display()),
        _ => println!("   {}", outcome),
    }
}

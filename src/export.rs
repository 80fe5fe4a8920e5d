// src/export.rs
use std::path::Path;

use crate::models::{EntityRecord, ProgressSnapshot, Result, RunSummary};

const CSV_HEADER: &str =
    "Name,Address,Phone,Email,Website,Entity Type,Scraped At,Source Type,Source Region";

async fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

pub async fn export_json(records: &[EntityRecord], path: &str, pretty: bool) -> Result<()> {
    ensure_parent_dir(path).await?;
    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    tokio::fs::write(path, json).await?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub async fn export_csv(records: &[EntityRecord], path: &str) -> Result<()> {
    ensure_parent_dir(path).await?;
    let mut out = String::with_capacity(records.len() * 80 + CSV_HEADER.len());
    out.push_str(CSV_HEADER);
    out.push('\n');
    for record in records {
        let row = [
            csv_field(&record.name),
            csv_field(&record.address),
            csv_field(&record.phone),
            csv_field(&record.email),
            csv_field(&record.website),
            record.entity_type.as_str().to_string(),
            record.scraped_at.to_rfc3339(),
            csv_field(&record.source_type),
            csv_field(&record.source_region),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    tokio::fs::write(path, out).await?;
    Ok(())
}

pub async fn save_progress(snapshot: &ProgressSnapshot, temp_data_dir: &str) -> Result<()> {
    tokio::fs::create_dir_all(temp_data_dir).await?;
    let path = Path::new(temp_data_dir).join("progress.json");
    let json = serde_json::to_string_pretty(snapshot)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

pub async fn save_summary(summary: &RunSummary, path: &str, pretty: bool) -> Result<()> {
    ensure_parent_dir(path).await?;
    let json = if pretty {
        serde_json::to_string_pretty(summary)?
    } else {
        serde_json::to_string(summary)?
    };
    tokio::fs::write(path, json).await?;
    Ok(())
}

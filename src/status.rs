// System status display: database location, size and row counts.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;

/// Display system status to the terminal.
pub async fn show(db: &Arc<dyn Database>, config: &Config) -> Result<()> {
    let db_path = config.db_path.as_str();

    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let counts = db.store_counts().await?;
    println!("Profiles: {}", counts.profiles);
    println!("Engagement analyses: {}", counts.analyses);
    println!(
        "Media kits: {} ({} views tracked)",
        counts.media_kits, counts.views
    );
    if counts.analyses == 0 {
        println!("  Run `mediakit analyze <posts.json> --save` to store one");
    }

    println!("Public URL: {}", config.public_url);

    if Path::new(&config.wkhtmltopdf_path).exists() {
        println!("PDF export: {}", config.wkhtmltopdf_path.display());
    } else {
        println!("PDF export: unavailable (wkhtmltopdf not found)");
    }

    Ok(())
}

/// Human-readable file size.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

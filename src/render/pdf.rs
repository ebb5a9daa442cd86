// PDF export by piping the HTML document through wkhtmltopdf.
//
// The converter reads HTML on stdin and writes the PDF to stdout, so
// nothing touches the filesystem. The binary location comes from
// MEDIAKIT_WKHTMLTOPDF_PATH.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

/// Every PDF starts with this magic.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Convert an HTML document to PDF bytes.
pub async fn html_to_pdf(converter: &Path, html: &str) -> Result<Vec<u8>> {
    if !converter.exists() {
        anyhow::bail!(
            "PDF converter not found at {}. Set MEDIAKIT_WKHTMLTOPDF_PATH.",
            converter.display()
        );
    }

    let mut child = Command::new(converter)
        .args(["--quiet", "--page-size", "A4", "--encoding", "utf-8", "-", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start {}", converter.display()))?;

    let mut stdin = child
        .stdin
        .take()
        .context("PDF converter stdin was not captured")?;
    stdin
        .write_all(html.as_bytes())
        .await
        .context("Failed to send HTML to PDF converter")?;
    // Close stdin so the converter sees EOF
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .context("PDF converter did not finish")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "PDF converter exited with {}: {}",
            output.status,
            stderr.trim()
        );
    }

    if !output.stdout.starts_with(PDF_MAGIC) {
        anyhow::bail!("PDF converter produced no PDF output");
    }

    info!(bytes = output.stdout.len(), "Rendered media kit PDF");
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_converter_is_an_error() {
        let err = html_to_pdf(Path::new("/definitely/not/here/wkhtmltopdf"), "<p>x</p>")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}

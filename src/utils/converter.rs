use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::info;

use crate::config::ConverterConfig;

/// Run the PDF-to-text converter in `work_dir` and return the text it wrote.
///
/// The converter is called as `<program> <args..> <pdf_name> <txt_name>`, the
/// calling convention of xpdf/poppler `pdftotext`.
pub async fn convert_pdf_to_text(
    converter: &ConverterConfig,
    work_dir: &Path,
    pdf_name: &str,
    txt_name: &str,
) -> Result<String> {
    info!("Converting {} with {}", pdf_name, converter.program);

    let status = Command::new(&converter.program)
        .args(&converter.args)
        .arg(pdf_name)
        .arg(txt_name)
        .current_dir(work_dir)
        .status()
        .await
        .with_context(|| format!("Failed to start converter '{}'", converter.program))?;

    if !status.success() {
        bail!("Converter '{}' exited with {}", converter.program, status);
    }

    let bytes = tokio::fs::read(work_dir.join(txt_name))
        .await
        .with_context(|| format!("Failed to read converter output {}", txt_name))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> ConverterConfig {
        ConverterConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "converter".to_string()],
        }
    }

    #[tokio::test]
    async fn reads_back_converter_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bistro20.pdf"), "Montag €").unwrap();

        // $1 is the input file, $2 the output file.
        let converter = shell("cp \"$1\" \"$2\"");
        let text = convert_pdf_to_text(&converter, dir.path(), "bistro20.pdf", "bistro20.txt")
            .await
            .unwrap();

        assert_eq!(text, "Montag €");
    }

    #[tokio::test]
    async fn failing_converter_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let converter = shell("exit 3");

        let result = convert_pdf_to_text(&converter, dir.path(), "in.pdf", "out.txt").await;

        assert!(result.is_err());
    }
}

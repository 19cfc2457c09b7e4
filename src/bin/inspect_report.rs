//! Prints a bistro bulletin the way the extractor sees it: one numbered line per
//! non-empty line, with the character columns of every price marker. Handy when
//! the bulletin layout changes and the day span needs re-tuning.
//!
//! Usage: `inspect_report <bulletin.pdf | bulletin.txt>`

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::Path;
use tokio::process::Command;

#[tokio::main]
async fn main() -> Result<()> {
    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: inspect_report <bulletin.pdf | bulletin.txt>");
    };

    let text = if path.to_lowercase().ends_with(".pdf") {
        println!("Converting {} with pdftotext -layout...", path);
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(Path::new(&path))
            .arg("-")
            .output()
            .await
            .context("Failed to run pdftotext")?;
        if !output.status.success() {
            bail!("pdftotext exited with {}", output.status);
        }
        String::from_utf8_lossy(&output.stdout).into_owned()
    } else {
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path))?
    };

    let anchor = Regex::new(r"€.*?/.*?€.*?kJ\s[0-9]+")?;

    let lines = text
        .split(|c| c == '\r' || c == '\n')
        .filter(|line| !line.is_empty());

    for (index, line) in lines.enumerate() {
        let marker = if line.contains('€') { '€' } else { ' ' };
        println!("{:>4} {} |{}", index, marker, line);

        for m in anchor.find_iter(line) {
            let start = line[..m.start()].chars().count();
            let length = m.as_str().chars().count();
            println!("       column start={} length={}", start, length);
        }
    }

    Ok(())
}

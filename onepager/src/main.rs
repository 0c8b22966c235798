use std::path::Path;

use onepager_core::{PageGeometry, PageRenderer, StyleSheet, SummaryContent};

const OUTPUT_PATH: &str = "output/pdf/tova-app-summary-one-page.pdf";

/// Render the summary to `path`. The parent directory must exist.
fn write_summary(path: &Path) -> onepager_core::Result<()> {
    let styles = StyleSheet::summary();
    let content = SummaryContent::tova().build(&styles)?;
    let report = PageRenderer::new(PageGeometry::letter())
        .compress(true)
        .render_to_path(&content, path)?;
    log::debug!(
        "natural height {:.2}pt, drawn {:.2}pt",
        report.natural_height,
        report.drawn_height
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let path = Path::new(OUTPUT_PATH);
    if let Err(e) = write_summary(path) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    println!("{}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_output_directory_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("pdf").join("summary.pdf");
        match write_summary(&path) {
            Err(onepager_core::Error::Io(err)) => {
                assert_eq!(err.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("expected Io error, got {:?}", other),
        }
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn writes_into_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.pdf");
        write_summary(&path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
    }
}

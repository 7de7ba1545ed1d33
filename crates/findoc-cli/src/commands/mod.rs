//! CLI subcommands.

pub mod batch;
pub mod classify;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;

/// Expand an input argument into PDF file paths. A directory is walked
/// recursively; anything else is treated as a glob pattern (or plain
/// file path).
pub fn expand_pdf_inputs(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);

    let files = if path.is_dir() {
        let mut files = Vec::new();
        collect_pdfs(path, &mut files)?;
        // read_dir order is platform-dependent
        files.sort();
        files
    } else {
        glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| is_pdf(p))
            .collect()
    };

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for input: {}", input);
    }
    Ok(files)
}

fn collect_pdfs(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_pdfs(&path, files)?;
        } else if is_pdf(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_input_is_walked_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("invoice.pdf"), b"x").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive").join("old.pdf"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = expand_pdf_inputs(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| is_pdf(p)));
    }

    #[test]
    fn test_glob_input_still_filters_to_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        fs::write(dir.path().join("b.txt"), b"x").unwrap();

        let pattern = dir.path().join("*").display().to_string();
        let files = expand_pdf_inputs(&pattern).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_directory_without_pdfs_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        assert!(expand_pdf_inputs(dir.path().to_str().unwrap()).is_err());
    }
}

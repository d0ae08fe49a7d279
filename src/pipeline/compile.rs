//! Document output: write the `.tex` file and run the typesetter.
//!
//! The compiler runs with its working directory set to the base directory,
//! because the document refers to assets by relative path.
//!
//! ## Exit status vs. artifact
//!
//! In `nonstopmode` xelatex exits non-zero for recoverable errors too,
//! including a missing sticker image, and still writes the PDF. A failing
//! status is therefore fatal only when no fresh artifact appeared; otherwise
//! it is logged and the run succeeds with [`CompileOutcome::clean`] unset.

use super::persist;
use crate::config::CompilerConfig;
use crate::error::StickerError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Instant, SystemTime};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Lines of compiler output kept for error reports.
const LOG_TAIL_LINES: usize = 20;

/// Result of a compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    /// The compiled document, if it was (re)written by this run.
    pub artifact: Option<PathBuf>,
    /// Whether the compiler exited successfully.
    pub clean: bool,
    pub duration_ms: u64,
}

/// Path of the document source for `stem` in `base_dir`.
pub fn document_path(base_dir: &Path, stem: &str) -> PathBuf {
    base_dir.join(format!("{stem}.tex"))
}

/// Path of the compiled artifact for `stem` in `base_dir`.
pub fn artifact_path(base_dir: &Path, stem: &str) -> PathBuf {
    base_dir.join(format!("{stem}.pdf"))
}

/// Write the rendered document to `{stem}.tex` in `base_dir`.
pub fn write_document(base_dir: &Path, stem: &str, text: &str) -> Result<PathBuf, StickerError> {
    let path = document_path(base_dir, stem);
    persist::write_atomic(&path, text.as_bytes()).map_err(|e| StickerError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    })?;
    info!("Wrote {} ({} bytes)", path.display(), text.len());
    Ok(path)
}

/// Run the configured compiler on `document` inside `base_dir`.
pub async fn compile(
    base_dir: &Path,
    document: &Path,
    compiler: &CompilerConfig,
) -> Result<CompileOutcome, StickerError> {
    let start = Instant::now();
    let (Some(file_name), Some(stem)) = (document.file_name(), document.file_stem()) else {
        return Err(StickerError::Internal(format!(
            "document path has no file name: {}",
            document.display()
        )));
    };
    let artifact = artifact_path(base_dir, &stem.to_string_lossy());
    let before = modified(&artifact);

    info!(
        "Running {} {} {}",
        compiler.program,
        compiler.args.join(" "),
        file_name.to_string_lossy()
    );

    let output = Command::new(&compiler.program)
        .args(&compiler.args)
        .arg(file_name)
        .current_dir(base_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| StickerError::CompilerNotFound {
            program: compiler.program.clone(),
            detail: e.to_string(),
        })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let after = modified(&artifact);
    let fresh = after.is_some() && after != before;
    let artifact = fresh.then_some(artifact);

    if output.status.success() {
        debug!("{} finished in {}ms", compiler.program, duration_ms);
        return Ok(CompileOutcome {
            artifact,
            clean: true,
            duration_ms,
        });
    }

    let log_tail = tail(&output.stdout, &output.stderr);
    if artifact.is_some() {
        warn!(
            "{} exited with {} but produced output; check the log for missing assets",
            compiler.program, output.status
        );
        debug!("{}", log_tail);
        return Ok(CompileOutcome {
            artifact,
            clean: false,
            duration_ms,
        });
    }

    Err(StickerError::CompilationFailed {
        program: compiler.program.clone(),
        status: output.status.to_string(),
        log_tail,
    })
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Last lines of the combined compiler output.
fn tail(stdout: &[u8], stderr: &[u8]) -> String {
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(stdout),
        String::from_utf8_lossy(stderr)
    );
    let lines: Vec<&str> = combined.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler(program: &str, args: &[&str]) -> CompilerConfig {
        CompilerConfig {
            enabled: true,
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn writes_document_with_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_document(dir.path(), "GENERATED", "\\documentclass{article}").unwrap();
        assert_eq!(path, dir.path().join("GENERATED.tex"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "\\documentclass{article}"
        );
    }

    #[test]
    fn write_to_missing_dir_fails() {
        let err = write_document(Path::new("/definitely/not/a/dir"), "X", "t").unwrap_err();
        assert!(matches!(err, StickerError::OutputWriteFailed { .. }));
    }

    #[test]
    fn tail_keeps_last_lines() {
        let out: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let t = tail(out.as_bytes(), b"");
        assert_eq!(t.lines().count(), LOG_TAIL_LINES);
        assert!(t.starts_with("line 11"));
        assert!(t.ends_with("line 30"));
    }

    #[tokio::test]
    async fn missing_program_is_compiler_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_document(dir.path(), "GENERATED", "x").unwrap();
        let err = compile(
            dir.path(),
            &doc,
            &compiler("definitely-not-a-typesetter-binary", &[]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StickerError::CompilerNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_base_dir_and_finds_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_document(dir.path(), "GENERATED", "x").unwrap();
        // `sh -c SCRIPT FILE` binds the document name to $0.
        let outcome = compile(
            dir.path(),
            &doc,
            &compiler("sh", &["-c", "touch \"${0%.tex}.pdf\""]),
        )
        .await
        .unwrap();
        assert!(outcome.clean);
        assert_eq!(outcome.artifact, Some(dir.path().join("GENERATED.pdf")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn artifact_is_looked_up_in_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_document(dir.path(), "SHEET", "x").unwrap();
        // A bare file name: the compiler resolves it against `base_dir`.
        let outcome = compile(
            dir.path(),
            Path::new("SHEET.tex"),
            &compiler("sh", &["-c", "touch \"${0%.tex}.pdf\""]),
        )
        .await
        .unwrap();
        assert_eq!(outcome.artifact, Some(artifact_path(dir.path(), "SHEET")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn success_without_artifact_reports_none() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_document(dir.path(), "GENERATED", "x").unwrap();
        let outcome = compile(dir.path(), &doc, &compiler("true", &[])).await.unwrap();
        assert!(outcome.clean);
        assert_eq!(outcome.artifact, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failure_without_artifact_is_compilation_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_document(dir.path(), "GENERATED", "x").unwrap();
        let err = compile(
            dir.path(),
            &doc,
            &compiler("sh", &["-c", "echo '! LaTeX Error: boom'; exit 1"]),
        )
        .await
        .unwrap_err();
        match err {
            StickerError::CompilationFailed { log_tail, .. } => {
                assert!(log_tail.contains("boom"), "got: {log_tail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failure_with_fresh_artifact_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let doc = write_document(dir.path(), "GENERATED", "x").unwrap();
        let outcome = compile(
            dir.path(),
            &doc,
            &compiler("sh", &["-c", "touch \"${0%.tex}.pdf\"; exit 1"]),
        )
        .await
        .unwrap();
        assert!(!outcome.clean);
        assert!(outcome.artifact.is_some());
    }
}

//! Batch export over a list of lid normals.
//!
//! Each item is built and handed to a [`PostProcessor`] in order, one at a
//! time. A failing item is logged and recorded in the [`BatchReport`]; the
//! remaining items still run.

use std::io::{self, ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use log::{error, info};
use serde::{Deserialize, Serialize};
use sheetfold_drafting::FlatRecord;
use sheetfold_math::Vec3;
use thiserror::Error;

use crate::error::GeometryWarning;
use crate::params::BoxParams;
use crate::unfold::{build, FlatPattern};

/// One box of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Engraved on the box and passed to the post-processor.
    pub label: String,
    /// Lid normal, need not be unit length.
    pub normal: [f64; 3],
}

impl BatchItem {
    /// Item for grid cell `(x, y)`, labelled `"xxx yyy"`.
    pub fn from_grid(x: usize, y: usize, normal: Vec3) -> Self {
        Self {
            label: format!("{x:03} {y:03}"),
            normal: [normal.x, normal.y, normal.z],
        }
    }

    /// `base` with this item's label and normal.
    pub fn params(&self, base: &BoxParams) -> BoxParams {
        BoxParams {
            label: Some(self.label.clone()),
            normal: Some(self.normal),
            ..base.clone()
        }
    }
}

/// Errors from handing a pattern to a post-processor.
#[derive(Error, Debug)]
pub enum PostProcessError {
    /// The process could not be started or fed.
    #[error("post-processor i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be encoded.
    #[error("failed to encode flat pattern: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The process ran and reported failure.
    #[error("post-processor exited with {status:?}: {stderr}")]
    Failed {
        /// Exit code, `None` if killed by a signal.
        status: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
}

/// What a post-processor receives for one item.
#[derive(Debug, Serialize)]
pub struct BatchDocument<'a> {
    /// Item label.
    pub label: &'a str,
    /// Normalized lid normal.
    pub normal: [f64; 3],
    /// Visible primitives of the pattern, flattened to XY.
    pub records: Vec<FlatRecord>,
    /// Warnings raised while building.
    pub warnings: &'a [GeometryWarning],
}

impl<'a> BatchDocument<'a> {
    /// Document for `pattern` built from `item`.
    pub fn new(item: &'a BatchItem, pattern: &'a FlatPattern) -> Self {
        let n = pattern.plane_normal;
        Self {
            label: &item.label,
            normal: [n.x, n.y, n.z],
            records: pattern.drawing.records(),
            warnings: &pattern.warnings,
        }
    }
}

/// Consumer of built patterns, called once per successful build.
pub trait PostProcessor {
    /// Hand `pattern` on, blocking until done.
    fn process(&self, item: &BatchItem, pattern: &FlatPattern) -> Result<(), PostProcessError>;
}

/// Runs an external program per item and writes a [`BatchDocument`] as
/// JSON to its standard input.
///
/// `{label}` in an argument is replaced by the item label with spaces
/// turned into underscores, so output paths can be named per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPostProcessor {
    /// Executable to run.
    pub program: String,
    /// Arguments, `{label}` substituted.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandPostProcessor {
    /// A processor running `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn args_for(&self, item: &BatchItem) -> Vec<String> {
        let label = item.label.replace(' ', "_");
        self.args.iter().map(|a| a.replace("{label}", &label)).collect()
    }
}

impl PostProcessor for CommandPostProcessor {
    fn process(&self, item: &BatchItem, pattern: &FlatPattern) -> Result<(), PostProcessError> {
        let document = serde_json::to_vec(&BatchDocument::new(item, pattern))?;
        let mut child = Command::new(&self.program)
            .args(self.args_for(item))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        // stdin is fed while stdout and stderr drain
        let feeder = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || match stdin.write_all(&document) {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });
        let output = child.wait_with_output()?;
        let fed = match feeder.map(|handle| handle.join()) {
            Some(Ok(result)) => result,
            Some(Err(_)) => Err(io::Error::other("stdin writer panicked")),
            None => Ok(()),
        };
        if !output.status.success() {
            return Err(PostProcessError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        fed?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            info!("{}: {}", item.label, stdout.trim());
        }
        Ok(())
    }
}

/// Where a batch item failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStage {
    /// Geometry build.
    Build,
    /// Post-processing.
    PostProcess,
}

/// A failed batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    /// Item label.
    pub label: String,
    /// Stage that failed.
    pub stage: BatchStage,
    /// Error text.
    pub message: String,
}

/// Outcome of [`run_batch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Labels of the items that went through.
    pub completed: Vec<String>,
    /// Items that did not.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// `true` if no item failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Build every item on top of `base` and post-process it, in order.
pub fn run_batch(base: &BoxParams, items: &[BatchItem], post: &dyn PostProcessor) -> BatchReport {
    let mut report = BatchReport::default();
    for item in items {
        let pattern = match build(&item.params(base)) {
            Ok(pattern) => pattern,
            Err(e) => {
                error!("{}: build failed: {e}", item.label);
                report.failures.push(BatchFailure {
                    label: item.label.clone(),
                    stage: BatchStage::Build,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if let Err(e) = post.process(item, &pattern) {
            error!("{}: post-processing failed: {e}", item.label);
            report.failures.push(BatchFailure {
                label: item.label.clone(),
                stage: BatchStage::PostProcess,
                message: e.to_string(),
            });
            continue;
        }
        info!("done {}", item.label);
        report.completed.push(item.label.clone());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(String, usize)>>,
        reject: Option<&'static str>,
    }

    impl PostProcessor for Recorder {
        fn process(&self, item: &BatchItem, pattern: &FlatPattern) -> Result<(), PostProcessError> {
            if self.reject == Some(item.label.as_str()) {
                return Err(PostProcessError::Failed {
                    status: Some(1),
                    stderr: "rejected".into(),
                });
            }
            let count = BatchDocument::new(item, pattern).records.len();
            self.seen.borrow_mut().push((item.label.clone(), count));
            Ok(())
        }
    }

    fn items() -> Vec<BatchItem> {
        vec![
            BatchItem::from_grid(0, 0, Vec3::new(0.2673, 0.1397, 0.9534)),
            BatchItem::from_grid(0, 1, Vec3::new(0.0, 0.0, -1.0)),
            BatchItem::from_grid(2, 4, Vec3::new(-0.1721, 0.2606, 0.9500)),
        ]
    }

    #[test]
    fn test_grid_labels() {
        assert_eq!(BatchItem::from_grid(3, 12, Vec3::z()).label, "003 012");
    }

    #[test]
    fn test_build_failure_does_not_stop_batch() {
        let recorder = Recorder::default();
        let report = run_batch(&BoxParams::default(), &items(), &recorder);
        assert_eq!(report.completed, vec!["000 000", "002 004"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].label, "000 001");
        assert_eq!(report.failures[0].stage, BatchStage::Build);

        let seen = recorder.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|(_, count)| *count > 0));
    }

    #[test]
    fn test_post_process_failure_is_reported() {
        let recorder = Recorder {
            reject: Some("000 000"),
            ..Recorder::default()
        };
        let report = run_batch(&BoxParams::default(), &items(), &recorder);
        assert!(!report.is_success());
        assert_eq!(report.completed, vec!["002 004"]);
        assert_eq!(report.failures[0].stage, BatchStage::PostProcess);
        assert_eq!(report.failures[1].stage, BatchStage::Build);
    }

    #[test]
    fn test_label_in_arguments() {
        let post = CommandPostProcessor::new("convert", vec!["out/box_{label}.dxf".into()]);
        let item = BatchItem::from_grid(1, 2, Vec3::z());
        assert_eq!(post.args_for(&item), vec!["out/box_001_002.dxf"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_receives_document() {
        let item = BatchItem::from_grid(0, 0, Vec3::z());
        let pattern = build(&item.params(&BoxParams::default())).unwrap();

        let ok = CommandPostProcessor::new(
            "sh",
            vec![
                "-c".into(),
                concat!(
                    r#"input=$(cat); "#,
                    r#"case "$input" in *'"label":"000 000"'*) ;; *) exit 1 ;; esac"#,
                )
                .into(),
            ],
        );
        ok.process(&item, &pattern).unwrap();

        // exits at once without reading the document
        let ignores_stdin = CommandPostProcessor::new("true", vec![]);
        for _ in 0..20 {
            ignores_stdin.process(&item, &pattern).unwrap();
        }

        let failing = CommandPostProcessor::new(
            "sh",
            vec!["-c".into(), "cat > /dev/null; echo broken >&2; exit 3".into()],
        );
        match failing.process(&item, &pattern) {
            Err(PostProcessError::Failed { status, stderr }) => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

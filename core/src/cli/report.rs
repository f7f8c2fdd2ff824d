use crate::harvest::RunSummary;
use std::fmt;
use std::path::Path;

/// Text report formatter for a harvesting run
pub struct TextReport<'a> {
    summary: &'a RunSummary,
    out_file: &'a Path,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a RunSummary, out_file: &'a Path) -> Self {
        Self { summary, out_file }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        let failed = summary.failed_subjects.len();

        writeln!(f, "Harvest Summary")?;
        writeln!(f, "===============")?;
        writeln!(f)?;
        writeln!(f, "Output:         {}", self.out_file.display())?;
        writeln!(f, "Subjects:       {}", summary.subjects - failed)?;
        writeln!(f, "Failed:         {}", failed)?;
        writeln!(f, "Sessions:       {}", summary.sessions)?;
        writeln!(f, "Files:          {}", summary.files)?;
        writeln!(f, "Frames:         {}", summary.frames)?;
        writeln!(f, "Records:        {}", summary.records)?;

        if failed > 0 {
            writeln!(f)?;
            writeln!(f, "Failed Subjects")?;
            writeln!(f, "---------------")?;
            for subject in &summary.failed_subjects {
                writeln!(f, "{}: {}", subject.path.display(), subject.error)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::FailedSubject;
    use std::path::PathBuf;

    #[test]
    fn test_text_report_format() {
        let summary = RunSummary {
            subjects: 3,
            failed_subjects: vec![FailedSubject {
                path: PathBuf::from("sub-03"),
                error: "Tag not found: SeriesInstanceUID".to_string(),
            }],
            sessions: 4,
            files: 12,
            frames: 340,
            records: 1020,
        };

        let output = TextReport::new(&summary, Path::new("out.csv")).to_string();

        assert!(output.contains("Harvest Summary"));
        assert!(output.contains("Output:         out.csv"));
        assert!(output.contains("Subjects:       2"));
        assert!(output.contains("Failed:         1"));
        assert!(output.contains("Frames:         340"));
        assert!(output.contains("sub-03: Tag not found: SeriesInstanceUID"));
    }

    #[test]
    fn test_clean_run_has_no_failure_section() {
        let summary = RunSummary {
            subjects: 1,
            ..Default::default()
        };
        let output = TextReport::new(&summary, Path::new("out.csv")).to_string();
        assert!(output.contains("Subjects:       1"));
        assert!(!output.contains("Failed Subjects"));
    }
}

use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

/// Reconciliation check result status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Identifiers line up
    Ok,
    /// Identifiers disagree but the run continues
    Warning(String),
    /// Identifiers disagree and the run is rejected
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }
}

/// Individual reconciliation check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationCheck {
    /// What was compared
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ReconciliationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Cross-block identifier report for one export
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    /// Individual check results
    pub checks: Vec<ReconciliationCheck>,
    /// Export the report describes
    pub source: String,
}

impl ReconciliationReport {
    /// Create an empty report for `source`
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            source: source.into(),
        }
    }

    /// Add a check result
    pub fn add_check(&mut self, check: ReconciliationCheck) {
        self.checks.push(check);
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Whether any check produced a warning
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Number of clean checks
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_warning()).count()
    }

    /// Number of failures
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Reconciliation FAILED"
        } else if self.has_warnings() {
            "Reconciliation PASSED with warnings"
        } else {
            "Reconciliation PASSED"
        }
    }

    fn tally(&self) -> String {
        format!(
            "{} consistent, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = format!(
                "{}\n{}\n\n",
                style("Reconciliation Report").bold().cyan(),
                style(format!("Export: {}", self.source)).dim()
            );

            for check in &self.checks {
                let line = match &check.status {
                    CheckStatus::Ok => format!("  {} {}", style("ok  ").green(), check.name),
                    CheckStatus::Warning(msg) => format!(
                        "  {} {}\n       {}",
                        style("warn").yellow().bold(),
                        check.name,
                        style(msg).yellow()
                    ),
                    CheckStatus::Failed(msg) => format!(
                        "  {} {}\n       {}",
                        style("FAIL").red().bold(),
                        style(&check.name).red(),
                        style(msg).red()
                    ),
                };
                output.push_str(&line);
                output.push('\n');
            }

            let verdict = if self.has_failures() {
                style(self.verdict()).red().bold()
            } else if self.has_warnings() {
                style(self.verdict()).yellow().bold()
            } else {
                style(self.verdict()).green().bold()
            };
            output.push_str(&format!("\n{}\n{}\n", self.tally(), verdict));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reconciliation Report")?;
        writeln!(f, "Export: {}", self.source)?;
        writeln!(f)?;

        for check in &self.checks {
            match &check.status {
                CheckStatus::Ok => writeln!(f, "  ok   {}", check.name)?,
                CheckStatus::Warning(msg) => writeln!(f, "  warn {}\n       {}", check.name, msg)?,
                CheckStatus::Failed(msg) => writeln!(f, "  FAIL {}\n       {}", check.name, msg)?,
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", self.tally())?;
        writeln!(f, "{}", self.verdict())
    }
}

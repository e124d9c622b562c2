use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::BlockKind;
use crate::error::{PipelineError, Result};

/// Separator between the researcher, sample and work-order tokens of a run name
pub const TOKEN_DELIMITER: char = '_';

/// Per-run naming parameters embedded in every sample column name.
///
/// Sample columns are named `<researcher>_<sample>_<work_order>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunNaming {
    /// Researcher identifier (leading token)
    pub researcher: String,
    /// Work-order identifier (trailing token, may itself contain underscores)
    pub work_order: String,
}

impl RunNaming {
    /// Create run naming parameters
    pub fn new(researcher: impl Into<String>, work_order: impl Into<String>) -> Self {
        Self {
            researcher: researcher.into(),
            work_order: work_order.into(),
        }
    }

    /// Reject empty parameters, which would turn every column into a sample column
    pub fn validate(&self) -> Result<()> {
        if self.researcher.trim().is_empty() {
            return Err(PipelineError::MalformedInput(
                "researcher name must not be empty".to_string(),
            ));
        }
        if self.work_order.trim().is_empty() {
            return Err(PipelineError::MalformedInput(
                "work order must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Leading `<researcher>_` token
    pub fn researcher_token(&self) -> String {
        format!("{}{}", self.researcher, TOKEN_DELIMITER)
    }

    /// Trailing `_<work_order>` token
    pub fn work_order_token(&self) -> String {
        format!("{}{}", TOKEN_DELIMITER, self.work_order)
    }

    /// Build a fully qualified column name for `sample`
    pub fn qualify(&self, sample: &str) -> String {
        format!("{}{}{}", self.researcher_token(), sample, self.work_order_token())
    }
}

/// Whether the run tokens must be present on every column of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierPolicy {
    /// Missing run tokens make the export malformed
    Required,
    /// Run tokens are stripped only where they occur
    IfPresent,
}

/// Strip run qualifiers from every column name of one measurement block.
///
/// Removes, in order, `extra_prefix` (always required when given), the
/// leading `<researcher>_` token and the trailing `_<work_order>` token,
/// leaving the bare sample or comparison identifier. Whether the run tokens
/// are mandatory follows [`BlockKind::qualifier_policy`].
///
/// # Errors
///
/// [`PipelineError::MalformedInput`] when an expected qualifier is absent or
/// nothing is left after stripping, [`PipelineError::AmbiguousKey`] when two
/// columns collapse to the same identifier.
///
/// # Example
///
/// ```
/// use perseus_report::export::{strip_run_qualifiers, BlockKind, RunNaming};
///
/// let naming = RunNaming::new("jdoe", "23_001");
/// let keys = strip_run_qualifiers(
///     BlockKind::PeptideCount,
///     &["number_peptides_jdoe_s1_23_001"],
///     &naming,
///     Some("number_peptides_"),
/// )?;
/// assert_eq!(keys, vec!["s1".to_string()]);
/// # Ok::<(), perseus_report::PipelineError>(())
/// ```
pub fn strip_run_qualifiers<S: AsRef<str>>(
    block: BlockKind,
    column_names: &[S],
    naming: &RunNaming,
    extra_prefix: Option<&str>,
) -> Result<Vec<String>> {
    let policy = block.qualifier_policy();
    let researcher = naming.researcher_token();
    let work_order = naming.work_order_token();

    let mut keys = Vec::with_capacity(column_names.len());
    for name in column_names {
        let name = name.as_ref();
        let mut rest = name;

        if let Some(prefix) = extra_prefix {
            rest = rest.strip_prefix(prefix).ok_or_else(|| {
                PipelineError::MalformedInput(format!(
                    "{block} column '{name}' does not start with '{prefix}'"
                ))
            })?;
        }

        rest = match (rest.strip_prefix(researcher.as_str()), policy) {
            (Some(stripped), _) => stripped,
            (None, QualifierPolicy::IfPresent) => rest,
            (None, QualifierPolicy::Required) => {
                return Err(PipelineError::MalformedInput(format!(
                    "{block} column '{name}' is missing the researcher prefix '{researcher}'"
                )))
            }
        };

        rest = match (rest.strip_suffix(work_order.as_str()), policy) {
            (Some(stripped), _) => stripped,
            (None, QualifierPolicy::IfPresent) => rest,
            (None, QualifierPolicy::Required) => {
                return Err(PipelineError::MalformedInput(format!(
                    "{block} column '{name}' is missing the work order suffix '{work_order}'"
                )))
            }
        };

        if rest.is_empty() {
            return Err(PipelineError::MalformedInput(format!(
                "{block} column '{name}' has no identifier left after stripping run qualifiers"
            )));
        }
        keys.push(rest.to_string());
    }

    ensure_unique(
        block,
        keys.iter()
            .map(String::as_str)
            .zip(column_names.iter().map(|name| name.as_ref())),
    )?;
    Ok(keys)
}

/// Fail on the first identifier claimed by two source columns
pub(crate) fn ensure_unique<'a, I>(block: BlockKind, keyed_columns: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (key, column) in keyed_columns {
        if let Some(first) = seen.insert(key, column) {
            return Err(PipelineError::AmbiguousKey {
                block,
                key: key.to_string(),
                first: first.to_string(),
                second: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Make a group label safe to use as a column name (`-` becomes `_`)
pub fn normalize_group(label: &str) -> String {
    label.trim().replace('-', "_")
}

/// Ordered pair of groups tested against each other.
///
/// Rendered canonically as `numerator/denominator` regardless of the delimiter
/// used in the export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Comparison {
    /// First group of the pair
    pub numerator: String,
    /// Second group of the pair
    pub denominator: String,
}

impl Comparison {
    /// Canonical separator used when rendering a comparison
    pub const CANONICAL_DELIMITER: &'static str = "/";

    /// Create a comparison, normalizing both group labels
    pub fn new(numerator: &str, denominator: &str) -> Self {
        Self {
            numerator: normalize_group(numerator),
            denominator: normalize_group(denominator),
        }
    }

    /// Split a comparison identifier into its two groups
    pub fn parse(identifier: &str, delimiter: &str) -> Result<Self> {
        let parts: Vec<&str> = identifier.split(delimiter).collect();
        match parts.as_slice() {
            [numerator, denominator]
                if !numerator.trim().is_empty() && !denominator.trim().is_empty() =>
            {
                Ok(Self::new(numerator, denominator))
            }
            _ => Err(PipelineError::MalformedInput(format!(
                "comparison '{identifier}' does not split into two groups on '{delimiter}'"
            ))),
        }
    }

    /// Whether both sides of the comparison satisfy `known`
    pub fn groups_known<F: Fn(&str) -> bool>(&self, known: F) -> bool {
        known(&self.numerator) && known(&self.denominator)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.numerator,
            Self::CANONICAL_DELIMITER,
            self.denominator
        )
    }
}

impl Serialize for Comparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

use crate::ValidationError;
use std::{borrow::Cow, fmt::Write};
use thiserror::Error;

/// The diagnostics produced by one validation call.
///
/// Diagnostics are only ever appended. A report with no errors means the operation should be
/// attempted; whether any particular error is fatal is up to the caller.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    errors: Vec<Box<ValidationError>>,
}

impl ValidationReport {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether no errors were reported.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the reported errors, in the order they were found.
    #[inline]
    pub fn errors(&self) -> &[Box<ValidationError>] {
        &self.errors
    }

    /// Returns whether any reported error has `vuid`.
    pub fn contains_vuid(&self, vuid: &str) -> bool {
        self.errors.iter().any(|error| error.has_vuid(vuid))
    }

    /// Returns the number of reported errors that have `vuid`.
    pub fn count_vuid(&self, vuid: &str) -> usize {
        self.errors.iter().filter(|error| error.has_vuid(vuid)).count()
    }

    /// Returns the first VUID of every error, in order. Errors without VUIDs are skipped.
    pub fn vuids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().filter_map(|error| error.vuids.first().copied())
    }

    /// Converts the report into a `Result`, failing if any error was reported.
    pub fn into_result(self) -> Result<(), ValidationFailed> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationFailed { report: self })
        }
    }

    pub(crate) fn push(&mut self, error: Box<ValidationError>) {
        log::debug!(
            "{} [{}]",
            error.vuids.first().copied().unwrap_or("no VUID"),
            error.context,
        );

        self.errors.push(error);
    }

    pub(crate) fn check(&mut self, result: Result<(), Box<ValidationError>>) {
        if let Err(error) = result {
            self.push(error);
        }
    }

    /// Runs `f`, prepending `context` to every error that it pushes.
    pub(crate) fn scoped(
        &mut self,
        context: impl Into<Cow<'static, str>>,
        f: impl FnOnce(&mut Self),
    ) {
        let start = self.errors.len();
        f(self);

        let context = context.into();

        for error in &mut self.errors[start..] {
            error.prepend_context(&context);
        }
    }

    pub(crate) fn append(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    /// Runs `f` on an empty report and returns it.
    #[cfg(test)]
    pub(crate) fn collect(f: impl FnOnce(&mut Self)) -> Self {
        let mut report = Self::new();
        f(&mut report);
        report
    }
}

/// Returned when a validation call reported at least one error.
#[derive(Clone, Debug, Error)]
#[error("{}", summarize(.report))]
pub struct ValidationFailed {
    pub report: ValidationReport,
}

fn summarize(report: &ValidationReport) -> String {
    let mut out = format!("{} validation error(s)", report.errors.len());

    for error in &report.errors {
        let _ = write!(out, "\n- {}", error);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::ValidationReport;
    use crate::ValidationError;

    #[test]
    fn scoped_prepends_context() {
        let mut report = ValidationReport::new();

        report.push(Box::new(ValidationError {
            context: "outside".into(),
            ..Default::default()
        }));

        report.scoped("create_infos[0]", |report| {
            report.scoped("rasterization_state", |report| {
                report.push(Box::new(ValidationError {
                    context: "line_width".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00749"],
                    ..Default::default()
                }));
            });
        });

        assert_eq!(report.errors()[0].context, "outside");
        assert_eq!(
            report.errors()[1].context,
            "create_infos[0].rasterization_state.line_width",
        );
        assert_eq!(
            report.count_vuid("VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00749"),
            1,
        );
    }

    #[test]
    fn into_result() {
        assert!(ValidationReport::new().into_result().is_ok());

        let mut report = ValidationReport::new();
        report.push(Box::new(ValidationError {
            problem: "is bad".into(),
            ..Default::default()
        }));
        let err = report.into_result().unwrap_err();
        assert!(err.to_string().starts_with("1 validation error(s)"));
    }
}

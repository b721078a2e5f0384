use anyhow::Result;

use crate::application::ListValidationCoordinator;
use crate::domain::ValidationReport;

use super::super::Container;

pub struct ValidateController<'a> {
    container: &'a Container,
}

impl<'a> ValidateController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn validate(
        &self,
        locations: Vec<String>,
        date: Option<String>,
        unit: String,
        json: bool,
    ) -> Result<String> {
        let mut form = self.container.form_from_args(&locations, date, unit);
        form.settle().await;

        let report = form.report();
        if json {
            return Ok(serde_json::to_string_pretty(&report)?);
        }
        Ok(format_report(&form, &report))
    }
}

pub(crate) fn format_report(form: &ListValidationCoordinator, report: &ValidationReport) -> String {
    let mut output = String::from("Locations:\n");

    if form.is_empty() {
        output.push_str("  (none)\n");
    }
    for (i, entry) in form.state().locations.iter().enumerate() {
        let status = report
            .statuses()
            .get(i)
            .map(ToString::to_string)
            .unwrap_or_default();
        output.push_str(&format!("  [{}] {} - {}\n", i, entry, status));
    }

    output.push_str(&format!(
        "Date: {}  Unit: {}\n",
        form.state().date,
        form.state().temperature_unit
    ));

    if report.errors().is_empty() {
        output.push_str("No errors.\n");
    } else {
        output.push_str(&format!("{} errors:\n", report.errors().len()));
        for error in report.errors() {
            output.push_str(&format!("  {}\n", error));
        }
    }

    output.push_str(if report.is_valid() {
        "Form is valid."
    } else if report.has_pending() {
        "Form is not valid yet: checks still pending."
    } else {
        "Form is invalid."
    });
    output
}

//! Contact form validation and the simulated submission.
//!
//! Nothing is delivered anywhere: a valid form waits the configured delay,
//! is logged, and reports success.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const PROJECT_TYPES: &[(&str, &str)] = &[
    ("ai-automation", "AI Agent & Automation"),
    ("hardware-deployment", "Hardware Deployment & Migration"),
    ("software-development", "Software Development"),
    ("pos-services", "POS Field Services"),
    ("technical-consulting", "Technical Consulting"),
    ("other", "Other"),
];

pub const BUDGETS: &[(&str, &str)] = &[
    ("under-5k", "Under $5,000"),
    ("5k-15k", "$5,000 - $15,000"),
    ("15k-50k", "$15,000 - $50,000"),
    ("50k-plus", "$50,000+"),
    ("discuss", "Let's discuss"),
];

pub const TIMELINES: &[(&str, &str)] = &[
    ("asap", "ASAP"),
    ("1-month", "Within 1 month"),
    ("3-months", "Within 3 months"),
    ("6-months", "Within 6 months"),
    ("flexible", "Flexible"),
];

fn is_option(options: &[(&str, &str)], value: &str) -> bool {
    options.iter().any(|(v, _)| *v == value)
}

/// Display label for an option value, if it is one.
pub fn option_label(options: &[(&'static str, &'static str)], value: &str) -> Option<&'static str> {
    options.iter().find(|(v, _)| *v == value).map(|(_, label)| *label)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    pub project_type: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub timeline: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// `local@domain.tld`, loosely: one `@`, non-empty local part, a dot inside the domain.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

impl ContactForm {
    /// Every problem with the form, in field order. Empty means valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !looks_like_email(email) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }

        if self.project_type.is_empty() {
            errors.push(FieldError::new("projectType", "Select a project type"));
        } else if !is_option(PROJECT_TYPES, &self.project_type) {
            errors.push(FieldError::new(
                "projectType",
                format!("Unknown project type: {}", self.project_type),
            ));
        }

        if !self.budget.is_empty() && !is_option(BUDGETS, &self.budget) {
            errors.push(FieldError::new("budget", format!("Unknown budget: {}", self.budget)));
        }
        if !self.timeline.is_empty() && !is_option(TIMELINES, &self.timeline) {
            errors.push(FieldError::new(
                "timeline",
                format!("Unknown timeline: {}", self.timeline),
            ));
        }

        if self.message.trim().is_empty() {
            errors.push(FieldError::new("message", "Message is required"));
        }

        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "errors")]
pub enum SubmitStatus {
    Success,
    Error(Vec<FieldError>),
}

/// Validate, then simulate delivery. Invalid forms return immediately.
pub async fn submit(form: &ContactForm, delay: Duration) -> SubmitStatus {
    let errors = form.validate();
    if !errors.is_empty() {
        log::warn!("Contact form rejected: {} field error(s)", errors.len());
        return SubmitStatus::Error(errors);
    }

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    log::info!(
        "Contact form submitted: {} <{}>, project type {}",
        form.name.trim(),
        form.email.trim(),
        option_label(PROJECT_TYPES, &form.project_type).unwrap_or(&form.project_type)
    );
    SubmitStatus::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactForm {
        ContactForm {
            name: "Jordan Lee".to_string(),
            email: "jordan@example.com".to_string(),
            project_type: "pos-services".to_string(),
            message: "Need 40 terminals swapped before Q3.".to_string(),
            ..ContactForm::default()
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(valid().validate().is_empty());

        let mut full = valid();
        full.phone = "615-555-0100".to_string();
        full.company = "Acme".to_string();
        full.budget = "15k-50k".to_string();
        full.timeline = "asap".to_string();
        assert!(full.validate().is_empty());
    }

    #[test]
    fn test_required_fields() {
        let errors = ContactForm::default().validate();
        assert_eq!(fields(&errors), vec!["name", "email", "projectType", "message"]);

        let mut blank = valid();
        blank.name = "   ".to_string();
        assert_eq!(fields(&blank.validate()), vec!["name"]);
    }

    #[test]
    fn test_email_shape() {
        for bad in ["jordan", "@example.com", "jordan@example", "jordan@.com", "a@b@c.com", "jo rdan@example.com"] {
            let mut form = valid();
            form.email = bad.to_string();
            assert_eq!(fields(&form.validate()), vec!["email"], "{bad}");
        }
    }

    #[test]
    fn test_option_values_are_checked() {
        let mut form = valid();
        form.project_type = "gardening".to_string();
        form.budget = "a lot".to_string();
        form.timeline = "yesterday".to_string();
        assert_eq!(fields(&form.validate()), vec!["projectType", "budget", "timeline"]);
        assert_eq!(option_label(BUDGETS, "50k-plus"), Some("$50,000+"));
        assert_eq!(option_label(BUDGETS, ""), None);
    }

    #[tokio::test]
    async fn test_submit() {
        assert_eq!(submit(&valid(), Duration::ZERO).await, SubmitStatus::Success);

        let status = submit(&ContactForm::default(), Duration::from_secs(60)).await;
        match status {
            SubmitStatus::Error(errors) => assert_eq!(errors.len(), 4),
            SubmitStatus::Success => panic!("empty form accepted"),
        }
    }
}

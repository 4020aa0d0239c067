use std::str::FromStr;

use formrelay_models::contact::{FormType, Language};
use tracing::debug;

use crate::{
    submit::{SubmissionContext, SubmitService},
    validate::{generic_error_message, validate_business_email},
};

/// Value bag of one form instance, mutated field-by-field as the user types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub job_title: String,
    pub message: String,
    pub subject: String,
    pub form_type: FormType,
    pub language: Language,
    pub request_type: String,
    pub urgency: String,
    pub segment: String,
    pub employee_count: String,
    pub honeypot: String,
    pub source: String,
    pub timestamp: String,
}

/// Submission lifecycle of one form instance.
///
/// `is_submitting` and `is_submitted` are never both true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub is_submitting: bool,
    pub is_submitted: bool,
    pub email_error: Option<String>,
    pub form_error: Option<String>,
}

/// Form fields addressable by change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    Name,
    Email,
    Phone,
    Company,
    JobTitle,
    Message,
    Subject,
    RequestType,
    Urgency,
    Segment,
    EmployeeCount,
    Honeypot,
    Source,
    Timestamp,
}

impl FromStr for FormField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "firstName" => Self::FirstName,
            "lastName" => Self::LastName,
            "name" => Self::Name,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "company" => Self::Company,
            "jobTitle" => Self::JobTitle,
            "message" => Self::Message,
            "subject" => Self::Subject,
            "requestType" => Self::RequestType,
            "urgency" => Self::Urgency,
            "segment" => Self::Segment,
            "employeeCount" => Self::EmployeeCount,
            "honeypot" => Self::Honeypot,
            "source" => Self::Source,
            "timestamp" => Self::Timestamp,
            _ => return Err(()),
        })
    }
}

impl FormData {
    fn set(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Company => &mut self.company,
            FormField::JobTitle => &mut self.job_title,
            FormField::Message => &mut self.message,
            FormField::Subject => &mut self.subject,
            FormField::RequestType => &mut self.request_type,
            FormField::Urgency => &mut self.urgency,
            FormField::Segment => &mut self.segment,
            FormField::EmployeeCount => &mut self.employee_count,
            FormField::Honeypot => &mut self.honeypot,
            FormField::Source => &mut self.source,
            FormField::Timestamp => &mut self.timestamp,
        };
        value.clone_into(slot);
    }
}

/// State machine of one form instance: `idle -> submitting -> {submitted |
/// idle-with-error}`.
///
/// `submitted` is terminal; the embedding UI swaps to a thank-you view and a
/// fresh controller is required to submit again.
#[derive(Debug)]
pub struct FormController<Submit> {
    submit: Submit,
    data: FormData,
    state: FormState,
}

impl<Submit> FormController<Submit>
where
    Submit: SubmitService,
{
    pub fn new(submit: Submit, form_type: FormType, language: Language) -> Self {
        Self {
            submit,
            data: FormData {
                form_type,
                language,
                ..Default::default()
            },
            state: FormState::default(),
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Merges a field change into the form data.
    ///
    /// Change events come straight from the embedding UI and are untrusted
    /// (browser extensions are known to inject malformed events); anything
    /// that does not name a known field is dropped. Editing the email field
    /// clears its inline error, any edit dismisses the last submission error.
    pub fn on_field_change(&mut self, name: &str, value: &str) {
        let Ok(field) = name.parse::<FormField>() else {
            debug!(?name, "ignoring change event for unknown field");
            return;
        };

        self.data.set(field, value);

        if field == FormField::Email {
            self.state.email_error = None;
        }
        self.state.form_error = None;
    }

    /// Validates the email field, storing the resulting message as the inline
    /// field error. Empty values are not validated.
    pub fn on_email_blur(&mut self) {
        if self.data.email.is_empty() {
            return;
        }

        let validation = validate_business_email(&self.data.email, self.data.language);
        self.state.email_error = validation.message.map(Into::into);
    }

    /// Submits the current form data, merged with `context`.
    ///
    /// On success the form becomes reusable for a follow-up: the personal
    /// fields (email, message, first/last name, phone) are cleared while
    /// everything else is kept. While a submission is in flight the embedding
    /// UI is expected to disable its submit control via
    /// [`FormState::is_submitting`]; in-flight requests are never aborted.
    pub async fn on_submit(&mut self, context: Option<&SubmissionContext>) {
        self.state.is_submitting = true;
        self.state.form_error = None;

        let outcome = self.submit.submit(&self.data, context).await;

        self.state.is_submitting = false;

        if outcome.success {
            self.state.is_submitted = true;
            for field in [
                FormField::Email,
                FormField::Message,
                FormField::FirstName,
                FormField::LastName,
                FormField::Phone,
            ] {
                self.data.set(field, "");
            }
        } else {
            self.state.form_error = Some(
                outcome
                    .error
                    .unwrap_or_else(|| generic_error_message(self.data.language).into()),
            );
            if let Some(email_error) = outcome.validation_errors.get("email") {
                self.state.email_error = Some(email_error.clone());
            }
        }
    }
}

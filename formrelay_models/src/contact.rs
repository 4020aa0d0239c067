use email_address::EmailAddress;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw contact form payload as it arrives on the wire.
///
/// Every field except `email` and `message` is optional; the public form
/// clients only send the fields the respective form variant collects. Field
/// names follow the public JSON contract (camelCase).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub message: String,
    pub subject: Option<String>,
    pub form_type: Option<FormType>,
    pub language: Option<Language>,
    pub request_type: Option<String>,
    pub urgency: Option<String>,
    pub segment: Option<String>,
    pub employee_count: Option<String>,
    pub honeypot: Option<String>,
    pub source: Option<String>,
    pub timestamp: Option<String>,
    pub turnstile_token: Option<String>,
}

impl ContactRequest {
    /// Validates the payload and converts it into a [`ContactSubmission`].
    ///
    /// Only the submitter name, email address and message can fail
    /// validation. Auxiliary fields that do not fit their constraints are
    /// dropped instead of rejecting the whole submission.
    pub fn validate(&self) -> Result<ContactSubmission, ContactValidationError> {
        let name =
            SubmitterName::try_from(self.full_name()).map_err(|_| ContactValidationError::Name)?;

        let email = self
            .email
            .trim()
            .parse::<EmailAddress>()
            .map_err(|_| ContactValidationError::Email)?;

        let message = MessageBody::try_from(self.message.clone())
            .map_err(|_| ContactValidationError::Message)?;

        Ok(ContactSubmission {
            name,
            email,
            phone: self
                .phone
                .clone()
                .and_then(|x| PhoneNumber::try_from(x).ok()),
            company: self
                .company
                .clone()
                .and_then(|x| CompanyName::try_from(x).ok()),
            job_title: self
                .job_title
                .clone()
                .and_then(|x| JobTitle::try_from(x).ok()),
            subject: self
                .subject
                .clone()
                .and_then(|x| MessageSubject::try_from(x).ok())
                .filter(|x| !x.is_empty()),
            message,
            form_type: self.form_type.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
        })
    }

    /// The submitter name, either taken directly from `name` or composed from
    /// `firstName` and `lastName`.
    pub fn full_name(&self) -> String {
        if let Some(name) = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|x| !x.is_empty())
        {
            return name.into();
        }

        let first = self.first_name.as_deref().unwrap_or_default().trim();
        let last = self.last_name.as_deref().unwrap_or_default().trim();
        format!("{first} {last}").trim().into()
    }
}

/// A contact form submission that has passed payload validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: SubmitterName,
    pub email: EmailAddress,
    pub phone: Option<PhoneNumber>,
    pub company: Option<CompanyName>,
    pub job_title: Option<JobTitle>,
    pub subject: Option<MessageSubject>,
    pub message: MessageBody,
    pub form_type: FormType,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("Name must be at least 2 characters long.")]
    Name,
    #[error("A valid email address is required.")]
    Email,
    #[error("Message must be at least 10 characters long.")]
    Message,
}

#[nutype(
    sanitize(trim),
    validate(len_char_min = 2, len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmitterName(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 10, len_char_max = 4096),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct MessageBody(String);

#[nutype(
    sanitize(trim),
    validate(len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct MessageSubject(String);

#[nutype(
    sanitize(trim),
    validate(len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct CompanyName(String);

#[nutype(
    sanitize(trim),
    validate(len_char_max = 64),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct PhoneNumber(String);

#[nutype(
    sanitize(trim),
    validate(len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct JobTitle(String);

/// The public form variant a submission originated from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    #[default]
    Contact,
    Speaking,
    Support,
    Newsletter,
    TrialHelp,
    #[serde(other)]
    Other,
}

/// Languages the public site is available in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    No,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: Some("Kari Nordmann".into()),
            email: "kari@acme.no".into(),
            message: "We would like a demo of the product.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn validate_ok() {
        let submission = request().validate().unwrap();

        assert_eq!(&*submission.name, "Kari Nordmann");
        assert_eq!(submission.email.as_str(), "kari@acme.no");
        assert_eq!(submission.form_type, FormType::Contact);
        assert_eq!(submission.language, Language::En);
    }

    #[test]
    fn validate_name_composed_from_parts() {
        let request = ContactRequest {
            name: None,
            first_name: Some("  Kari ".into()),
            last_name: Some("Nordmann".into()),
            ..request()
        };

        let submission = request.validate().unwrap();

        assert_eq!(&*submission.name, "Kari Nordmann");
    }

    #[test]
    fn validate_name_too_short() {
        let request = ContactRequest {
            name: Some("A".into()),
            ..request()
        };

        assert_eq!(request.validate(), Err(ContactValidationError::Name));
    }

    #[test]
    fn validate_name_missing() {
        let request = ContactRequest {
            name: None,
            ..request()
        };

        assert_eq!(request.validate(), Err(ContactValidationError::Name));
    }

    #[test]
    fn validate_email_invalid() {
        for email in ["", "no-at-sign", "a@b@c", "spaces in@mail.com"] {
            let request = ContactRequest {
                email: email.into(),
                ..request()
            };

            assert_eq!(request.validate(), Err(ContactValidationError::Email));
        }
    }

    #[test]
    fn validate_message_too_short() {
        let request = ContactRequest {
            message: "short".into(),
            ..request()
        };

        assert_eq!(request.validate(), Err(ContactValidationError::Message));
    }

    #[test]
    fn validate_message_whitespace_is_trimmed() {
        let request = ContactRequest {
            message: "   1234 \t\n   ".into(),
            ..request()
        };

        assert_eq!(request.validate(), Err(ContactValidationError::Message));
    }

    #[test]
    fn validate_oversized_auxiliary_fields_are_dropped() {
        let request = ContactRequest {
            company: Some("x".repeat(1000)),
            phone: Some("9".repeat(100)),
            ..request()
        };

        let submission = request.validate().unwrap();

        assert_eq!(submission.company, None);
        assert_eq!(submission.phone, None);
    }

    #[test]
    fn deserialize_wire_format() {
        let submission: ContactRequest = serde_json::from_str(
            r#"{
                "firstName": "Jo",
                "lastName": "Doe",
                "email": "jo@example.com",
                "message": "1234567890",
                "formType": "trial-help",
                "language": "no",
                "turnstileToken": "tok"
            }"#,
        )
        .unwrap();

        assert_eq!(submission.full_name(), "Jo Doe");
        assert_eq!(submission.form_type, Some(FormType::TrialHelp));
        assert_eq!(submission.language, Some(Language::No));
        assert_eq!(submission.turnstile_token.as_deref(), Some("tok"));
    }

    #[test]
    fn deserialize_unknown_form_type() {
        let submission: ContactRequest =
            serde_json::from_str(r#"{"email":"a@b.co","message":"x","formType":"webinar"}"#)
                .unwrap();

        assert_eq!(submission.form_type, Some(FormType::Other));
    }
}

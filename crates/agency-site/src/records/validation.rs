use super::domain::{
    ContactSubmission, NewContact, NewSubscriber, SubscriberChanges, SubscriberSubmission,
    SubscriberUpdate, DEFAULT_PREFERRED_LANGUAGE,
};

/// Reasons a submission is rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordViolation {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("update contains no fields")]
    EmptyUpdate,
}

/// Trims and lower-cases an address, rejecting anything without a plausible mailbox shape.
pub fn normalize_email(raw: &str) -> Result<String, RecordViolation> {
    let email = raw.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(RecordViolation::MissingField("email"));
    }

    let invalid = || RecordViolation::InvalidEmail(raw.trim().to_string());
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(email)
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn required_text(value: String, field: &'static str) -> Result<String, RecordViolation> {
    optional_text(Some(value)).ok_or(RecordViolation::MissingField(field))
}

fn language_or_default(value: Option<String>) -> String {
    optional_text(value).unwrap_or_else(|| DEFAULT_PREFERRED_LANGUAGE.to_string())
}

pub fn validate_subscriber(submission: SubscriberSubmission) -> Result<NewSubscriber, RecordViolation> {
    Ok(NewSubscriber {
        email: normalize_email(&submission.email)?,
        name: optional_text(submission.name),
        interests: optional_text(submission.interests),
        preferred_language: language_or_default(submission.preferred_language),
    })
}

pub fn validate_update(update: SubscriberUpdate) -> Result<SubscriberChanges, RecordViolation> {
    if update == SubscriberUpdate::default() {
        return Err(RecordViolation::EmptyUpdate);
    }

    let email = update
        .email
        .map(|raw| normalize_email(&raw))
        .transpose()?;

    Ok(SubscriberChanges {
        email,
        name: update.name.map(|raw| optional_text(Some(raw))),
        interests: update.interests.map(|raw| optional_text(Some(raw))),
        preferred_language: update.preferred_language.map(|raw| language_or_default(Some(raw))),
    })
}

pub fn validate_contact(submission: ContactSubmission) -> Result<NewContact, RecordViolation> {
    let name = required_text(submission.name, "name")?;
    let email = normalize_email(&submission.email)?;
    let message = required_text(submission.message, "message")?;

    Ok(NewContact {
        name,
        email,
        message,
        company: optional_text(submission.company),
        phone: optional_text(submission.phone),
    })
}

//! Subscriber, contact, and user records behind the site's REST endpoints.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Contact, ContactId, ContactSubmission, NewContact, NewSubscriber, Subscriber,
    SubscriberChanges, SubscriberId, SubscriberSubmission, SubscriberUpdate, User, UserId,
    UserView, DEFAULT_PREFERRED_LANGUAGE,
};
pub use repository::{ContactRepository, RepositoryError, SubscriberRepository, UserRepository};
pub use router::records_router;
pub use service::{RecordsServiceError, SiteRecordsService};
pub use validation::{normalize_email, RecordViolation};

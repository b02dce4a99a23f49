use std::sync::Arc;

use tracing::info;

use super::domain::{
    Contact, ContactSubmission, Subscriber, SubscriberId, SubscriberSubmission, SubscriberUpdate,
    UserView,
};
use super::repository::{
    ContactRepository, RepositoryError, SubscriberRepository, UserRepository,
};
use super::validation::{validate_contact, validate_subscriber, validate_update, RecordViolation};

/// Service composing validation with the subscriber, contact, and user stores.
pub struct SiteRecordsService<S, C, U> {
    subscribers: Arc<S>,
    contacts: Arc<C>,
    users: Arc<U>,
}

impl<S, C, U> SiteRecordsService<S, C, U>
where
    S: SubscriberRepository + 'static,
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(subscribers: Arc<S>, contacts: Arc<C>, users: Arc<U>) -> Self {
        Self {
            subscribers,
            contacts,
            users,
        }
    }

    /// Newest subscribers first.
    pub fn subscribers(&self) -> Result<Vec<Subscriber>, RecordsServiceError> {
        let mut subscribers = self.subscribers.list()?;
        subscribers.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(subscribers)
    }

    pub fn subscribe(
        &self,
        submission: SubscriberSubmission,
    ) -> Result<Subscriber, RecordsServiceError> {
        let subscriber = validate_subscriber(submission)?;
        let stored = self.subscribers.insert(subscriber)?;
        info!(subscriber_id = stored.id.0, "subscriber created");
        Ok(stored)
    }

    pub fn update_subscriber(
        &self,
        id: SubscriberId,
        update: SubscriberUpdate,
    ) -> Result<Subscriber, RecordsServiceError> {
        let changes = validate_update(update)?;
        let mut subscriber = self
            .subscribers
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        changes.apply(&mut subscriber);
        let stored = self.subscribers.update(subscriber)?;
        info!(subscriber_id = id.0, "subscriber updated");
        Ok(stored)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> Result<(), RecordsServiceError> {
        self.subscribers.delete(id)?;
        info!(subscriber_id = id.0, "subscriber deleted");
        Ok(())
    }

    pub fn submit_contact(
        &self,
        submission: ContactSubmission,
    ) -> Result<Contact, RecordsServiceError> {
        let contact = validate_contact(submission)?;
        let stored = self.contacts.insert(contact)?;
        info!(contact_id = stored.id.0, "contact message received");
        Ok(stored)
    }

    /// Users without their password hashes.
    pub fn users(&self) -> Result<Vec<UserView>, RecordsServiceError> {
        Ok(self.users.list()?.iter().map(|user| user.view()).collect())
    }
}

/// Error raised by the records service.
#[derive(Debug, thiserror::Error)]
pub enum RecordsServiceError {
    #[error(transparent)]
    Validation(#[from] RecordViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

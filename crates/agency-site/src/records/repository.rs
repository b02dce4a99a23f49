use super::domain::{
    Contact, NewContact, NewSubscriber, Subscriber, SubscriberId, User,
};

/// Subscriber storage. Emails are unique across all records.
pub trait SubscriberRepository: Send + Sync {
    fn insert(&self, subscriber: NewSubscriber) -> Result<Subscriber, RepositoryError>;
    fn list(&self) -> Result<Vec<Subscriber>, RepositoryError>;
    fn fetch(&self, id: SubscriberId) -> Result<Option<Subscriber>, RepositoryError>;
    fn update(&self, subscriber: Subscriber) -> Result<Subscriber, RepositoryError>;
    fn delete(&self, id: SubscriberId) -> Result<(), RepositoryError>;
}

/// Contact-form storage; records are write-once from the API's point of view.
pub trait ContactRepository: Send + Sync {
    fn insert(&self, contact: NewContact) -> Result<Contact, RepositoryError>;
}

/// Read-only access to back-office users.
pub trait UserRepository: Send + Sync {
    fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

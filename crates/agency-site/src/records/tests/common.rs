use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::records::domain::{
    Contact, ContactId, ContactSubmission, NewContact, NewSubscriber, Subscriber, SubscriberId,
    SubscriberSubmission, User, UserId,
};
use crate::records::repository::{
    ContactRepository, RepositoryError, SubscriberRepository, UserRepository,
};
use crate::records::{records_router, SiteRecordsService};

#[derive(Default)]
pub(super) struct MemoryStore {
    subscribers: Mutex<BTreeMap<SubscriberId, Subscriber>>,
    contacts: Mutex<Vec<Contact>>,
    users: Vec<User>,
}

impl MemoryStore {
    pub(super) fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub(super) fn contacts(&self) -> Vec<Contact> {
        self.contacts.lock().expect("contact mutex").clone()
    }

    fn created_at(sequence: u64) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(sequence as i64)
    }
}

impl SubscriberRepository for MemoryStore {
    fn insert(&self, subscriber: NewSubscriber) -> Result<Subscriber, RepositoryError> {
        let mut guard = self.subscribers.lock().expect("subscriber mutex");
        if guard.values().any(|existing| existing.email == subscriber.email) {
            return Err(RepositoryError::Conflict);
        }
        let next = guard.keys().last().map(|id| id.0 + 1).unwrap_or(1);
        let record = Subscriber {
            id: SubscriberId(next),
            email: subscriber.email,
            name: subscriber.name,
            interests: subscriber.interests,
            preferred_language: subscriber.preferred_language,
            created_at: Self::created_at(next),
        };
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        Ok(self
            .subscribers
            .lock()
            .expect("subscriber mutex")
            .values()
            .cloned()
            .collect())
    }

    fn fetch(&self, id: SubscriberId) -> Result<Option<Subscriber>, RepositoryError> {
        Ok(self.subscribers.lock().expect("subscriber mutex").get(&id).cloned())
    }

    fn update(&self, subscriber: Subscriber) -> Result<Subscriber, RepositoryError> {
        let mut guard = self.subscribers.lock().expect("subscriber mutex");
        if guard
            .values()
            .any(|existing| existing.id != subscriber.id && existing.email == subscriber.email)
        {
            return Err(RepositoryError::Conflict);
        }
        match guard.get_mut(&subscriber.id) {
            Some(slot) => {
                *slot = subscriber.clone();
                Ok(subscriber)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: SubscriberId) -> Result<(), RepositoryError> {
        self.subscribers
            .lock()
            .expect("subscriber mutex")
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl ContactRepository for MemoryStore {
    fn insert(&self, contact: NewContact) -> Result<Contact, RepositoryError> {
        let mut guard = self.contacts.lock().expect("contact mutex");
        let id = guard.len() as u64 + 1;
        let record = Contact {
            id: ContactId(id),
            name: contact.name,
            email: contact.email,
            message: contact.message,
            company: contact.company,
            phone: contact.phone,
            created_at: Self::created_at(id),
            responded: false,
        };
        guard.push(record.clone());
        Ok(record)
    }
}

impl UserRepository for MemoryStore {
    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.clone())
    }
}

pub(super) struct OfflineStore;

impl SubscriberRepository for OfflineStore {
    fn insert(&self, _subscriber: NewSubscriber) -> Result<Subscriber, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: SubscriberId) -> Result<Option<Subscriber>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _subscriber: Subscriber) -> Result<Subscriber, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: SubscriberId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl ContactRepository for OfflineStore {
    fn insert(&self, _contact: NewContact) -> Result<Contact, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl UserRepository for OfflineStore {
    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService = SiteRecordsService<MemoryStore, MemoryStore, MemoryStore>;

pub(super) fn build_service(store: MemoryStore) -> (Arc<MemoryService>, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let service = Arc::new(SiteRecordsService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    (service, store)
}

pub(super) fn router_with_store(store: MemoryStore) -> axum::Router {
    let (service, _) = build_service(store);
    records_router(service)
}

pub(super) fn submission(email: &str) -> SubscriberSubmission {
    SubscriberSubmission {
        email: email.to_string(),
        name: Some("Jane Doe".to_string()),
        interests: Some("automation".to_string()),
        preferred_language: None,
    }
}

pub(super) fn contact_submission() -> ContactSubmission {
    ContactSubmission {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        message: "We'd like a quote for a chatbot.".to_string(),
        company: Some("Acme".to_string()),
        phone: None,
    }
}

pub(super) fn sample_user() -> User {
    User {
        id: UserId(1),
        username: "admin".to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        email: "admin@example.com".to_string(),
        full_name: Some("Site Admin".to_string()),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).single().expect("valid"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

use agency_site::records::{
    Contact, ContactId, ContactRepository, NewContact, NewSubscriber, RepositoryError, Subscriber,
    SubscriberId, SubscriberRepository, User, UserRepository,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubscriberRepository {
    records: Arc<Mutex<HashMap<SubscriberId, Subscriber>>>,
    sequence: Arc<AtomicU64>,
}

impl SubscriberRepository for InMemorySubscriberRepository {
    fn insert(&self, subscriber: NewSubscriber) -> Result<Subscriber, RepositoryError> {
        let mut guard = self.records.lock().expect("subscriber mutex poisoned");
        if guard.values().any(|existing| existing.email == subscriber.email) {
            return Err(RepositoryError::Conflict);
        }

        let id = SubscriberId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let record = Subscriber {
            id,
            email: subscriber.email,
            name: subscriber.name,
            interests: subscriber.interests,
            preferred_language: subscriber.preferred_language,
            created_at: Utc::now(),
        };
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        let guard = self.records.lock().expect("subscriber mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn fetch(&self, id: SubscriberId) -> Result<Option<Subscriber>, RepositoryError> {
        let guard = self.records.lock().expect("subscriber mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn update(&self, subscriber: Subscriber) -> Result<Subscriber, RepositoryError> {
        let mut guard = self.records.lock().expect("subscriber mutex poisoned");
        if !guard.contains_key(&subscriber.id) {
            return Err(RepositoryError::NotFound);
        }
        if guard
            .values()
            .any(|existing| existing.id != subscriber.id && existing.email == subscriber.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(subscriber.id, subscriber.clone());
        Ok(subscriber)
    }

    fn delete(&self, id: SubscriberId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("subscriber mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryContactRepository {
    records: Arc<Mutex<Vec<Contact>>>,
}

impl ContactRepository for InMemoryContactRepository {
    fn insert(&self, contact: NewContact) -> Result<Contact, RepositoryError> {
        let mut guard = self.records.lock().expect("contact mutex poisoned");
        let record = Contact {
            id: ContactId(guard.len() as u64 + 1),
            name: contact.name,
            email: contact.email,
            message: contact.message,
            company: contact.company,
            phone: contact.phone,
            created_at: Utc::now(),
            responded: false,
        };
        guard.push(record.clone());
        Ok(record)
    }
}

/// Back-office accounts are provisioned out of band; the in-memory store starts empty.
#[derive(Default, Clone)]
pub(crate) struct InMemoryUserRepository {
    users: Arc<Vec<User>>,
}

impl UserRepository for InMemoryUserRepository {
    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.as_ref().clone())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFERRED_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Newsletter subscriber captured from the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: String,
    pub name: Option<String>,
    pub interests: Option<String>,
    pub preferred_language: String,
    pub created_at: DateTime<Utc>,
}

/// Raw subscription payload as posted by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberSubmission {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
}

/// Validated subscriber ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: String,
    pub name: Option<String>,
    pub interests: Option<String>,
    pub preferred_language: String,
}

/// Administrative partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
}

/// Validated form of [`SubscriberUpdate`]. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberChanges {
    pub email: Option<String>,
    pub name: Option<Option<String>>,
    pub interests: Option<Option<String>>,
    pub preferred_language: Option<String>,
}

impl SubscriberChanges {
    pub fn apply(self, subscriber: &mut Subscriber) {
        if let Some(email) = self.email {
            subscriber.email = email;
        }
        if let Some(name) = self.name {
            subscriber.name = name;
        }
        if let Some(interests) = self.interests {
            subscriber.interests = interests;
        }
        if let Some(language) = self.preferred_language {
            subscriber.preferred_language = language;
        }
    }
}

/// Contact-form message. `responded` is flipped by back-office tooling, never by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// Back-office account. Never serialized directly; see [`UserView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public listing shape of a user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

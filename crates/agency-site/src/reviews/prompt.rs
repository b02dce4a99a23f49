use super::profile::BusinessProfile;
use super::synthesizer::{pick, RandomSource};

/// Instruction text sent to the completion API, plus the location it was written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPrompt {
    text: String,
    location: Option<String>,
}

impl ReviewPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    /// Samples one service, highlight, location, and tone from the profile.
    pub fn compose(profile: &BusinessProfile, random: &dyn RandomSource) -> Self {
        let service = pick(profile.services(), random);
        let highlight = pick(profile.highlights(), random);
        let location = pick(profile.locations(), random).cloned();
        let tone = pick(profile.tones(), random);

        let mut text = format!(
            "Write a short Google review from a satisfied customer of {}, a {}",
            profile.name(),
            profile.business_type()
        );
        if let Some(location) = &location {
            text.push_str(&format!(" in {location}"));
        }
        text.push('.');
        if let Some(service) = service {
            text.push_str(&format!(" Mention their {service}"));
            match highlight {
                Some(highlight) => text.push_str(&format!(" and their {highlight}.")),
                None => text.push('.'),
            }
        }
        if let Some(tone) = tone {
            text.push_str(&format!(" Keep the tone {tone}."));
        }
        text.push_str(
            " Keep it between 40 and 80 words, write in the first person, and do not use hashtags, emojis, or quotation marks.",
        );

        Self { text, location }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Location the prompt was composed for, if the profile listed any.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

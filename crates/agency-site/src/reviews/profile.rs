use std::fmt;

use url::form_urlencoded;

pub const DEFAULT_BUSINESS_NAME: &str = "Velocity Digital";
pub const DEFAULT_BUSINESS_TYPE: &str = "Digital Marketing Agency";

const DEFAULT_SERVICES: [&str; 4] = [
    "website design",
    "marketing automation",
    "local SEO",
    "AI chat assistants",
];
const DEFAULT_HIGHLIGHTS: [&str; 3] = [
    "fast turnaround",
    "clear communication",
    "measurable results",
];
const DEFAULT_TONES: [&str; 4] = ["enthusiastic", "professional", "friendly", "grateful"];

/// Raw, optional inputs a profile is assembled from (query string or CLI flags).
///
/// List fields hold comma-separated values exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileParams {
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub services: Option<String>,
    pub highlights: Option<String>,
    pub locations: Option<String>,
    pub tones: Option<String>,
    pub google_maps_url: Option<String>,
    pub api_key: Option<String>,
}

impl ProfileParams {
    /// Parses a page query string such as `?businessName=Acme&services=SEO,Ads`.
    ///
    /// Unknown keys are ignored; when a key repeats, the last value wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = Some(value.into_owned());
            match key.as_ref() {
                "businessName" => params.business_name = value,
                "businessType" => params.business_type = value,
                "services" => params.services = value,
                "highlights" => params.highlights = value,
                "locations" | "location" => params.locations = value,
                "tones" => params.tones = value,
                "googleMapsUrl" => params.google_maps_url = value,
                "apiKey" => params.api_key = value,
                _ => {}
            }
        }

        params
    }

    /// Fills every field still missing here from `fallback`.
    pub fn or(self, fallback: ProfileParams) -> Self {
        Self {
            business_name: self.business_name.or(fallback.business_name),
            business_type: self.business_type.or(fallback.business_type),
            services: self.services.or(fallback.services),
            highlights: self.highlights.or(fallback.highlights),
            locations: self.locations.or(fallback.locations),
            tones: self.tones.or(fallback.tones),
            google_maps_url: self.google_maps_url.or(fallback.google_maps_url),
            api_key: self.api_key.or(fallback.api_key),
        }
    }
}

/// Immutable description of the business a review is written for.
#[derive(Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    name: String,
    business_type: String,
    services: Vec<String>,
    highlights: Vec<String>,
    locations: Vec<String>,
    tones: Vec<String>,
    google_maps_url: Option<String>,
    api_key: Option<String>,
}

impl BusinessProfile {
    pub fn from_params(params: ProfileParams) -> Self {
        Self {
            name: text_or(params.business_name, DEFAULT_BUSINESS_NAME),
            business_type: text_or(params.business_type, DEFAULT_BUSINESS_TYPE),
            services: list_or(params.services, &DEFAULT_SERVICES),
            highlights: list_or(params.highlights, &DEFAULT_HIGHLIGHTS),
            locations: list_or(params.locations, &[]),
            tones: list_or(params.tones, &DEFAULT_TONES),
            google_maps_url: non_blank(params.google_maps_url),
            api_key: non_blank(params.api_key),
        }
    }

    pub fn from_query(query: &str) -> Self {
        Self::from_params(ProfileParams::from_query(query))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn business_type(&self) -> &str {
        &self.business_type
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn highlights(&self) -> &[String] {
        &self.highlights
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn tones(&self) -> &[String] {
        &self.tones
    }

    pub fn google_maps_url(&self) -> Option<&str> {
        self.google_maps_url.as_deref()
    }

    /// Client-supplied credential for the direct completion call.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The business maps page when one was supplied, otherwise `default_url`.
    pub fn maps_destination<'a>(&'a self, default_url: &'a str) -> &'a str {
        self.google_maps_url().unwrap_or(default_url)
    }
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self::from_params(ProfileParams::default())
    }
}

impl fmt::Debug for BusinessProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessProfile")
            .field("name", &self.name)
            .field("business_type", &self.business_type)
            .field("services", &self.services)
            .field("highlights", &self.highlights)
            .field("locations", &self.locations)
            .field("tones", &self.tones)
            .field("google_maps_url", &self.google_maps_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn text_or(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

fn list_or(value: Option<String>, default: &[&str]) -> Vec<String> {
    let parsed: Vec<String> = value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if parsed.is_empty() {
        default.iter().map(|item| item.to_string()).collect()
    } else {
        parsed
    }
}

use std::sync::{Arc, Mutex};

/// Stands in for the location when none is known.
pub const FALLBACK_LOCATION: &str = "the area";

const TEMPLATES: [&str; 5] = [
    "I can't say enough good things about {name}! As a {type} in {location}, they completely transformed how we run our business. Highly recommend!",
    "Working with {name} was a fantastic experience. Their team knows exactly what a {type} should deliver, and our results in {location} speak for themselves.",
    "{name} exceeded every expectation. If you're looking for a reliable {type} in {location}, look no further. Professional, responsive, and effective.",
    "We hired {name} after comparing several options in {location}, and it was the best decision we made this year. A truly top-notch {type}.",
    "Five stars for {name}! This {type} made the whole process easy, kept us informed at every step, and delivered real results for our business in {location}.",
];

/// Source of uniform values in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed sequence of values, repeating the last one once exhausted.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Mutex<Vec<f64>>,
    last: Mutex<f64>,
}

impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let mut values: Vec<f64> = values.into_iter().collect();
        values.reverse();
        Self {
            values: Mutex::new(values),
            last: Mutex::new(0.0),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&self) -> f64 {
        let mut last = self.last.lock().expect("random mutex poisoned");
        if let Some(value) = self.values.lock().expect("random mutex poisoned").pop() {
            *last = value;
        }
        *last
    }
}

/// `floor(unit * len)`, clamped into `0..len`. Returns 0 for empty pools.
pub(crate) fn pick_index(len: usize, random: &dyn RandomSource) -> usize {
    if len == 0 {
        return 0;
    }

    let unit = random.next_unit();
    let unit = if unit.is_finite() {
        unit.clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((unit * len as f64).floor() as usize).min(len - 1)
}

pub(crate) fn pick<'a, T>(items: &'a [T], random: &dyn RandomSource) -> Option<&'a T> {
    items.get(pick_index(items.len(), random))
}

/// Last-resort review writer: samples one canned template and interpolates the business.
#[derive(Clone)]
pub struct FallbackReviewSynthesizer {
    random: Arc<dyn RandomSource>,
}

impl FallbackReviewSynthesizer {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    pub const fn template_count() -> usize {
        TEMPLATES.len()
    }

    /// Renders template `index`; `None` when the index is outside the pool.
    pub fn render(
        index: usize,
        business_name: &str,
        business_type: &str,
        location: Option<&str>,
    ) -> Option<String> {
        TEMPLATES
            .get(index)
            .map(|template| interpolate(template, business_name, business_type, location))
    }

    /// Always returns a non-empty review.
    pub fn synthesize(
        &self,
        business_name: &str,
        business_type: &str,
        location: Option<&str>,
    ) -> String {
        let template = TEMPLATES[pick_index(TEMPLATES.len(), self.random.as_ref())];
        interpolate(template, business_name, business_type, location)
    }
}

/// Substitutes placeholders in one pass; values are copied verbatim and never re-scanned.
fn interpolate(
    template: &str,
    business_name: &str,
    business_type: &str,
    location: Option<&str>,
) -> String {
    let location = location
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(FALLBACK_LOCATION);

    let mut out = String::with_capacity(template.len() + business_name.len() + location.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (value, consumed) = if tail.starts_with("{name}") {
            (business_name.trim(), "{name}".len())
        } else if tail.starts_with("{type}") {
            (business_type.trim(), "{type}".len())
        } else if tail.starts_with("{location}") {
            (location, "{location}".len())
        } else {
            ("{", 1)
        };
        out.push_str(value);
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    out
}

impl Default for FallbackReviewSynthesizer {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

impl std::fmt::Debug for FallbackReviewSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackReviewSynthesizer")
            .field("templates", &TEMPLATES.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer(value: f64) -> FallbackReviewSynthesizer {
        FallbackReviewSynthesizer::new(Arc::new(SequenceRandom::constant(value)))
    }

    #[test]
    fn selects_template_by_floor_of_scaled_unit() {
        let cases = [(0.0, 0), (0.19, 0), (0.2, 1), (0.59, 2), (0.61, 3), (0.999, 4)];
        for (unit, index) in cases {
            let expected = FallbackReviewSynthesizer::render(
                index,
                "Acme",
                "Digital Marketing Agency",
                Some("Denver"),
            )
            .expect("template exists");
            let review = synthesizer(unit).synthesize("Acme", "Digital Marketing Agency", Some("Denver"));
            assert_eq!(review, expected, "unit {unit} should map to template {index}");
        }
    }

    #[test]
    fn interpolates_every_placeholder() {
        for index in 0..FallbackReviewSynthesizer::template_count() {
            let review =
                FallbackReviewSynthesizer::render(index, "Acme", "Bakery", Some("Boise")).expect("template");
            assert!(review.contains("Acme"));
            assert!(review.contains("Bakery"));
            assert!(review.contains("Boise"));
            assert!(!review.contains('{'));
        }
    }

    #[test]
    fn placeholder_text_in_values_is_kept_verbatim() {
        let review = FallbackReviewSynthesizer::render(0, "Studio {location}", "Bakery", Some("Denver"))
            .expect("template");
        assert!(review.contains("Studio {location}"));
        assert!(review.contains("Denver"));

        let review = synthesizer(0.5).synthesize("Acme", "{name} & {type} Co", Some("{type}ville"));
        assert!(review.contains("{name} & {type} Co"));
        assert!(review.contains("{type}ville"));
    }

    #[test]
    fn stray_braces_in_templates_survive() {
        assert_eq!(
            interpolate("{name} {x} {", "Acme", "Bakery", None),
            "Acme {x} {"
        );
    }

    #[test]
    fn missing_location_uses_placeholder() {
        let review = synthesizer(0.0).synthesize("Acme", "Bakery", None);
        assert!(review.contains(FALLBACK_LOCATION));

        let blank = synthesizer(0.0).synthesize("Acme", "Bakery", Some("  "));
        assert_eq!(review, blank);
    }

    #[test]
    fn out_of_range_units_stay_inside_the_pool() {
        for unit in [-3.0, 1.0, 7.5, f64::NAN, f64::INFINITY] {
            let review = synthesizer(unit).synthesize("Acme", "Bakery", None);
            assert!(!review.is_empty());
        }
        assert_eq!(pick_index(5, &SequenceRandom::constant(1.0)), 4);
        assert_eq!(pick_index(5, &SequenceRandom::constant(f64::NAN)), 0);
        assert_eq!(pick_index(0, &SequenceRandom::constant(0.5)), 0);
    }

    #[test]
    fn sequence_random_repeats_last_value() {
        let random = SequenceRandom::new([0.1, 0.7]);
        assert_eq!(random.next_unit(), 0.1);
        assert_eq!(random.next_unit(), 0.7);
        assert_eq!(random.next_unit(), 0.7);
    }

    #[test]
    fn thread_random_stays_in_unit_interval() {
        let random = ThreadRandom;
        for _ in 0..256 {
            let unit = random.next_unit();
            assert!((0.0..1.0).contains(&unit));
        }
    }
}

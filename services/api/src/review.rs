use std::sync::Arc;

use agency_site::config::AppConfig;
use agency_site::error::AppError;
use agency_site::reviews::{
    AcquiredReview, BusinessProfile, ChatCompletionClient, EffectStatus,
    FallbackReviewSynthesizer, ProfileParams, ReviewOrchestrator, ReviewPrompt, SideEffectExecutor,
    SideEffectReport, ThreadRandom,
};
use agency_site::telemetry;
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct ReviewGenerateArgs {
    /// Page query string, e.g. "businessName=Acme&locations=Denver"; flags take precedence
    #[arg(long)]
    pub(crate) query: Option<String>,
    #[arg(long)]
    pub(crate) business_name: Option<String>,
    #[arg(long)]
    pub(crate) business_type: Option<String>,
    /// Comma-separated list of services
    #[arg(long)]
    pub(crate) services: Option<String>,
    /// Comma-separated list of highlights
    #[arg(long)]
    pub(crate) highlights: Option<String>,
    /// Comma-separated list of locations
    #[arg(long)]
    pub(crate) locations: Option<String>,
    /// Comma-separated list of tones
    #[arg(long)]
    pub(crate) tones: Option<String>,
    #[arg(long)]
    pub(crate) google_maps_url: Option<String>,
    /// Client-side completion API key; enables the direct strategy
    #[arg(long)]
    pub(crate) api_key: Option<String>,
    /// Do not copy the review to the clipboard
    #[arg(long)]
    pub(crate) no_clipboard: bool,
    /// Do not open the maps page
    #[arg(long)]
    pub(crate) no_browser: bool,
}

impl ReviewGenerateArgs {
    fn profile(&self) -> BusinessProfile {
        let flags = ProfileParams {
            business_name: self.business_name.clone(),
            business_type: self.business_type.clone(),
            services: self.services.clone(),
            highlights: self.highlights.clone(),
            locations: self.locations.clone(),
            tones: self.tones.clone(),
            google_maps_url: self.google_maps_url.clone(),
            api_key: self.api_key.clone(),
        };
        let query = self
            .query
            .as_deref()
            .map(ProfileParams::from_query)
            .unwrap_or_default();

        BusinessProfile::from_params(flags.or(query))
    }

    fn executor(&self) -> SideEffectExecutor {
        let mut executor = SideEffectExecutor::system();
        if self.no_clipboard {
            executor = executor.without_clipboard();
        }
        if self.no_browser {
            executor = executor.without_navigation();
        }
        executor
    }
}

pub(crate) async fn run_review_generate(args: ReviewGenerateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let profile = args.profile();
    let http = reqwest::Client::builder().build()?;
    let completion = Arc::new(ChatCompletionClient::new(http.clone(), &config.completion)?);
    let orchestrator = ReviewOrchestrator::for_profile(
        &profile,
        completion,
        http,
        &config.review,
        FallbackReviewSynthesizer::default(),
    )?;

    let prompt = ReviewPrompt::compose(&profile, &ThreadRandom);
    let review = orchestrator.acquire(&profile, &prompt).await;

    let destination = profile.maps_destination(&config.review.default_maps_url);
    let report = args.executor().execute(&review.text, destination);

    print!("{}", render_summary(&profile, &review, &report));
    Ok(())
}

fn render_summary(
    profile: &BusinessProfile,
    review: &AcquiredReview,
    report: &SideEffectReport,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Review for {}\n", profile.name()));
    out.push_str(&format!("Source: {}\n", review.source.label()));
    for attempt in &review.attempts {
        out.push_str(&format!(
            "  skipped {}: {}\n",
            attempt.source.label(),
            attempt.failure
        ));
    }
    out.push('\n');
    out.push_str(&review.text);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Clipboard: {}\n",
        effect_line(&report.clipboard, "copied")
    ));
    out.push_str(&format!(
        "Browser: {} ({})\n",
        effect_line(&report.navigation, "opened"),
        report.destination
    ));
    out
}

fn effect_line(status: &EffectStatus, done: &str) -> String {
    match status {
        EffectStatus::Completed => done.to_string(),
        EffectStatus::Failed(reason) => format!("failed: {reason}"),
        EffectStatus::Skipped => "skipped".to_string(),
    }
}

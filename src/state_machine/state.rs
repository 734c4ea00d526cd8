//! Intake session state types

use std::fmt;

// ============================================================================
// Step
// ============================================================================

/// Stage of the intake questionnaire.
///
/// `None` is both the initial and the terminal step: a session sits in `None`
/// until `analyze` is triggered, and returns to it once keywords have been
/// generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    None,
    Industry,
    Objective,
    Website,
    WebsiteUrl,
    SocialMedia,
    SocialMediaUrl,
    PpcCampaigns,
    PpcPermission,
    TargetAudience,
    Location,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::None => "none",
            Step::Industry => "industry",
            Step::Objective => "objective",
            Step::Website => "website",
            Step::WebsiteUrl => "website_url",
            Step::SocialMedia => "social_media",
            Step::SocialMediaUrl => "social_media_url",
            Step::PpcCampaigns => "ppc_campaigns",
            Step::PpcPermission => "ppc_permission",
            Step::TargetAudience => "target_audience",
            Step::Location => "location",
        }
    }

    /// Whether the session is in the middle of the questionnaire
    pub fn is_active(self) -> bool {
        self != Step::None
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Answers
// ============================================================================

/// Answers collected so far. Fields are written once, in flow order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    pub industry: Option<String>,
    pub objective: Option<String>,
    pub website: Option<bool>,
    pub website_url: Option<String>,
    pub social_media: Option<bool>,
    pub social_media_url: Option<String>,
    pub ppc_campaigns: Option<bool>,
    pub ppc_permission: Option<String>,
    pub target_audience: Option<String>,
    pub location: Option<String>,
}

// ============================================================================
// Session
// ============================================================================

/// Per-user intake state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub step: Step,
    pub answers: Answers,
}

impl Session {
    /// A session positioned at `step` with no answers
    pub fn at(step: Step) -> Self {
        Self {
            step,
            answers: Answers::default(),
        }
    }

    /// Check that every field the current step depends on has been written.
    ///
    /// The step fixes which prefix of the flow is complete; the yes/no
    /// branches additionally fix the value of the branching answer.
    pub fn has_required_answers(&self) -> bool {
        let a = &self.answers;
        let through_objective = a.industry.is_some() && a.objective.is_some();
        let through_website = through_objective && a.website.is_some();
        let through_social = through_website && a.social_media.is_some();
        let through_ppc = through_social && a.ppc_campaigns.is_some();

        match self.step {
            Step::None | Step::Industry => true,
            Step::Objective => a.industry.is_some(),
            Step::Website => through_objective,
            Step::WebsiteUrl => through_objective && a.website == Some(true),
            Step::SocialMedia => through_website,
            Step::SocialMediaUrl => through_website && a.social_media == Some(true),
            Step::PpcCampaigns => through_social,
            Step::PpcPermission => through_social && a.ppc_campaigns == Some(true),
            Step::TargetAudience => through_ppc,
            Step::Location => through_ppc && a.target_audience.is_some(),
        }
    }
}

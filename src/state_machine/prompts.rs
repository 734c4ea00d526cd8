//! Fixed prompt texts and button sets

use super::effect::{ChoiceButton, Prompt};
use super::state::Step;

pub const WELCOME: &str = "Welcome! Use the buttons below to start or ask a question:";
pub const MENU: &str = "Please choose one of the following options:";
pub const NOT_UNDERSTOOD: &str = "I didn't understand that. Type /analyze to start again.";
pub const FOLLOW_STEPS: &str = "Please follow the steps to generate your keywords.";
pub const ASK_HINT: &str = "Send /help followed by your question, for example: /help How do I lower my cost per click?";
pub const EMPTY_QUESTION: &str = "Please ask a valid question.";
pub const GENERATING: &str = "Generating keywords...";

const INDUSTRY: &str = "What industry is your business in?";
const OBJECTIVE: &str = "What is your business objective?";
const WEBSITE: &str = "Do you have a website? Please select:";
const WEBSITE_URL: &str = "Please provide the website URL.";
const SOCIAL_MEDIA: &str = "Do you have any social media platforms? Please select:";
const SOCIAL_MEDIA_URL: &str = "Please provide the social media URL(s).";
const PPC_CAMPAIGNS: &str = "Do you use PPC campaigns? Please select:";
const PPC_PERMISSION: &str =
    "Please provide permission to analyze your PPC campaign data. Reply with 'Yes' or 'No'.";
const TARGET_AUDIENCE: &str = "Who are you trying to reach? Please select:";
const LOCATION: &str = "Select the location(s) you'd like to target:";

pub const WELCOME_BUTTONS: &[ChoiceButton] = &[
    ChoiceButton::new("Start Analysis", "analyze"),
    ChoiceButton::new("Get PPC Trends", "trends"),
];

pub const MENU_BUTTONS: &[ChoiceButton] = &[
    ChoiceButton::new("Start", "start"),
    ChoiceButton::new("Help", "help"),
    ChoiceButton::new("PPC Trends", "trends"),
    ChoiceButton::new("Generate Keywords", "generate_keywords"),
];

const WEBSITE_BUTTONS: &[ChoiceButton] = &[
    ChoiceButton::new("Yes", "website_yes"),
    ChoiceButton::new("No", "website_no"),
];

const SOCIAL_MEDIA_BUTTONS: &[ChoiceButton] = &[
    ChoiceButton::new("Yes", "social_media_yes"),
    ChoiceButton::new("No", "social_media_no"),
];

const PPC_BUTTONS: &[ChoiceButton] = &[
    ChoiceButton::new("Yes", "ppc_yes"),
    ChoiceButton::new("No", "ppc_no"),
];

const AUDIENCE_BUTTONS: &[ChoiceButton] = &[
    ChoiceButton::new("Young Adults", "audience_young_adults"),
    ChoiceButton::new("Professionals", "audience_professionals"),
    ChoiceButton::new("Parents", "audience_parents"),
];

const LOCATION_BUTTONS: &[ChoiceButton] = &[
    ChoiceButton::new("USA", "location_usa"),
    ChoiceButton::new("India", "location_india"),
    ChoiceButton::new("UK", "location_uk"),
    ChoiceButton::new("Australia", "location_australia"),
];

/// The question asked while the session waits at `step`.
/// `Step::None` asks nothing.
pub fn prompt_for(step: Step) -> Option<Prompt> {
    let prompt = match step {
        Step::None => return None,
        Step::Industry => Prompt::text(INDUSTRY),
        Step::Objective => Prompt::text(OBJECTIVE),
        Step::Website => Prompt::with_choices(WEBSITE, WEBSITE_BUTTONS),
        Step::WebsiteUrl => Prompt::text(WEBSITE_URL),
        Step::SocialMedia => Prompt::with_choices(SOCIAL_MEDIA, SOCIAL_MEDIA_BUTTONS),
        Step::SocialMediaUrl => Prompt::text(SOCIAL_MEDIA_URL),
        Step::PpcCampaigns => Prompt::with_choices(PPC_CAMPAIGNS, PPC_BUTTONS),
        Step::PpcPermission => Prompt::text(PPC_PERMISSION),
        Step::TargetAudience => Prompt::with_choices(TARGET_AUDIENCE, AUDIENCE_BUTTONS),
        Step::Location => Prompt::with_choices(LOCATION, LOCATION_BUTTONS),
    };
    Some(prompt)
}

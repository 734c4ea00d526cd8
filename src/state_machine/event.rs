//! Inbound events and their decoding from raw chat input

/// Events that drive the intake state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A slash command or a menu button
    Command(Command),
    /// Free text typed by the user
    Text(String),
    /// A decoded questionnaire button
    Choice(Choice),
    /// A command or button token nothing recognizes
    Unrecognized(String),
}

/// Commands and menu actions that are not tied to a questionnaire step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or the Start button
    Start,
    /// `/menu`
    Menu,
    /// `/analyze` or the Start Analysis button
    Analyze,
    /// Generate Keywords button
    GenerateKeywords,
    /// `/trends` or a PPC Trends button
    Trends,
    /// `/help <question>`; the question may be empty
    Ask { question: String },
    /// Help button
    Help,
}

/// A questionnaire button, decoded from its `<category>_<option>` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Website(bool),
    SocialMedia(bool),
    PpcCampaigns(bool),
    Audience(String),
    Location(String),
}

impl Choice {
    /// Decode a button token such as `website_yes` or `location_usa`.
    ///
    /// Prefixes are matched longest-first so `social_media_yes` is not read
    /// as category `social`. The option of an audience or location token is
    /// everything after the prefix (`audience_young_adults` → `young_adults`).
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(option) = token.strip_prefix("social_media_") {
            return parse_yes_no(option).map(Choice::SocialMedia);
        }
        if let Some(option) = token.strip_prefix("website_") {
            return parse_yes_no(option).map(Choice::Website);
        }
        if let Some(option) = token.strip_prefix("ppc_") {
            return parse_yes_no(option).map(Choice::PpcCampaigns);
        }
        if let Some(option) = token.strip_prefix("audience_") {
            return non_empty(option).map(Choice::Audience);
        }
        if let Some(option) = token.strip_prefix("location_") {
            return non_empty(option).map(Choice::Location);
        }
        None
    }

    /// The token this choice was decoded from
    pub fn token(&self) -> String {
        match self {
            Choice::Website(yes) => format!("website_{}", yes_no(*yes)),
            Choice::SocialMedia(yes) => format!("social_media_{}", yes_no(*yes)),
            Choice::PpcCampaigns(yes) => format!("ppc_{}", yes_no(*yes)),
            Choice::Audience(option) => format!("audience_{option}"),
            Choice::Location(option) => format!("location_{option}"),
        }
    }
}

fn parse_yes_no(option: &str) -> Option<bool> {
    match option {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn non_empty(option: &str) -> Option<String> {
    (!option.is_empty()).then(|| option.to_string())
}

impl Event {
    /// Decode a button press payload
    pub fn from_callback(data: &str) -> Self {
        match data {
            "start" => Event::Command(Command::Start),
            "help" => Event::Command(Command::Help),
            "trends" => Event::Command(Command::Trends),
            "generate_keywords" => Event::Command(Command::GenerateKeywords),
            "analyze" => Event::Command(Command::Analyze),
            other => Choice::parse(other)
                .map_or_else(|| Event::Unrecognized(other.to_string()), Event::Choice),
        }
    }

    /// Decode a typed message. Messages starting with `/` are commands;
    /// a `@botname` suffix on the command is ignored.
    pub fn from_message(text: &str) -> Self {
        let trimmed = text.trim();
        let Some(command_line) = trimmed.strip_prefix('/') else {
            return Event::Text(text.to_string());
        };

        let (head, rest) = command_line
            .split_once(char::is_whitespace)
            .unwrap_or((command_line, ""));
        let name = head.split('@').next().unwrap_or_default();

        match name {
            "start" => Event::Command(Command::Start),
            "menu" => Event::Command(Command::Menu),
            "analyze" => Event::Command(Command::Analyze),
            "trends" => Event::Command(Command::Trends),
            "help" => Event::Command(Command::Ask {
                question: rest.trim().to_string(),
            }),
            _ => Event::Unrecognized(trimmed.to_string()),
        }
    }
}

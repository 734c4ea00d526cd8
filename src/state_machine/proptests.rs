//! Property-based tests for the intake state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::event::{Choice, Command, Event};
use super::prompts::prompt_for;
use super::state::{Session, Step};
use super::transition::transition;
use super::Effect;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::None),
        Just(Step::Industry),
        Just(Step::Objective),
        Just(Step::Website),
        Just(Step::WebsiteUrl),
        Just(Step::SocialMedia),
        Just(Step::SocialMediaUrl),
        Just(Step::PpcCampaigns),
        Just(Step::PpcPermission),
        Just(Step::TargetAudience),
        Just(Step::Location),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        Just("yes".to_string()),
        Just("No".to_string()),
        Just("maybe".to_string()),
        "https?://[a-z]{3,10}\\.com".prop_map(String::from),
        "[A-Za-z ]{1,20}".prop_map(String::from),
    ]
}

fn arb_choice() -> impl Strategy<Value = Choice> {
    prop_oneof![
        any::<bool>().prop_map(Choice::Website),
        any::<bool>().prop_map(Choice::SocialMedia),
        any::<bool>().prop_map(Choice::PpcCampaigns),
        prop_oneof![Just("young_adults"), Just("professionals"), Just("parents")]
            .prop_map(|o| Choice::Audience(o.to_string())),
        prop_oneof![Just("usa"), Just("india"), Just("uk"), Just("australia")]
            .prop_map(|o| Choice::Location(o.to_string())),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Menu),
        Just(Command::Analyze),
        Just(Command::GenerateKeywords),
        Just(Command::Trends),
        Just(Command::Help),
        "[a-z ]{0,20}".prop_map(|question| Command::Ask { question }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => arb_text().prop_map(Event::Text),
        3 => arb_choice().prop_map(Event::Choice),
        1 => arb_command().prop_map(Event::Command),
        1 => "/[a-z]{1,8}".prop_map(Event::Unrecognized),
    ]
}

/// Events that advance an idle session to `Step::Location` and then finish
fn arb_completed_flow() -> impl Strategy<Value = Vec<Event>> {
    (
        "[A-Za-z]{1,12}",
        "[A-Za-z]{1,12}",
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        "[A-Za-z]{1,12}",
    )
        .prop_map(
            |(industry, objective, website, social, ppc, location)| {
                let mut events = vec![
                    Event::Command(Command::Analyze),
                    Event::Text(industry),
                    Event::Text(objective),
                    Event::Choice(Choice::Website(website)),
                ];
                if website {
                    events.push(Event::Text("https://example.com".to_string()));
                }
                events.push(Event::Choice(Choice::SocialMedia(social)));
                if social {
                    events.push(Event::Text("http://social.example".to_string()));
                }
                events.push(Event::Choice(Choice::PpcCampaigns(ppc)));
                if ppc {
                    events.push(Event::Text("No".to_string()));
                }
                events.push(Event::Choice(Choice::Audience("parents".to_string())));
                events.push(Event::Text(location));
                events
            },
        )
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: the step always matches the answers collected so far
    #[test]
    fn prop_step_matches_answers(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut session = Session::default();
        for event in events {
            session = transition(&session, event).session;
            prop_assert!(session.has_required_answers(), "Inconsistent session: {:?}", session);
        }
    }

    // Invariant 2: whitespace-only text never advances an active step
    #[test]
    fn prop_blank_text_never_advances(step in arb_step(), blank in "[ \t]{0,5}") {
        let session = Session::at(step);
        let result = transition(&session, Event::Text(blank));
        prop_assert_eq!(result.session, session);
    }

    // Invariant 3: every rejected or unrecognized input at an active step
    // re-emits that step's question
    #[test]
    fn prop_unchanged_active_step_reprompts(step in arb_step(), event in arb_event()) {
        prop_assume!(step.is_active());
        prop_assume!(!matches!(event, Event::Command(_)));

        let session = Session::at(step);
        let result = transition(&session, event);
        if result.session == session {
            let prompt = prompt_for(step).unwrap();
            prop_assert_eq!(result.effects.last(), Some(&Effect::Reply(prompt)));
        }
    }

    // Invariant 4: keyword generation is requested only on the way back to
    // idle, and a completed flow always requests it with non-empty fields
    #[test]
    fn prop_completed_flow_generates_keywords(events in arb_completed_flow()) {
        let mut session = Session::default();
        let mut generated = None;
        for event in events {
            let result = transition(&session, event);
            for effect in &result.effects {
                if let Effect::GenerateKeywords { industry, objective, location } = effect {
                    prop_assert_eq!(result.session.step, Step::None);
                    generated = Some((industry.clone(), objective.clone(), location.clone()));
                }
            }
            session = result.session;
        }

        prop_assert_eq!(session.step, Step::None);
        let (industry, objective, location) = generated.expect("flow should generate keywords");
        prop_assert_eq!(Some(industry), session.answers.industry);
        prop_assert_eq!(Some(objective), session.answers.objective);
        prop_assert_eq!(Some(location), session.answers.location);
    }

    // Invariant 5: analyze always restarts from a clean slate
    #[test]
    fn prop_analyze_resets(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut session = Session::default();
        for event in events {
            session = transition(&session, event).session;
        }
        let result = transition(&session, Event::Command(Command::Analyze));
        prop_assert_eq!(result.session, Session::at(Step::Industry));
    }
}

use proptest::prelude::*;
use sitepilot::domain::models::{Lead, LeadStatus};
use sitepilot::services::agents::MAX_LEAD_SCORE;
use sitepilot::services::score_lead;

fn status_strategy() -> impl Strategy<Value = LeadStatus> {
    prop_oneof![
        Just(LeadStatus::New),
        Just(LeadStatus::Contacted),
        Just(LeadStatus::Qualified),
        Just(LeadStatus::Converted),
        Just(LeadStatus::Lost),
    ]
}

prop_compose! {
    fn lead_strategy()(
        name in "[A-Za-z ]{0,20}",
        email in proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
        phone in proptest::option::of("\\+?[0-9 ]{0,14}"),
        company in proptest::option::of("[A-Za-z ]{0,16}"),
        status in status_strategy(),
        notes in proptest::option::of(".{0,60}"),
    ) -> Lead {
        Lead { name, email, phone, company, status, notes }
    }
}

proptest! {
    /// Property: every lead scores within 0..=100
    #[test]
    fn prop_score_in_range(lead in lead_strategy()) {
        prop_assert!(score_lead(&lead) <= MAX_LEAD_SCORE);
    }

    /// Property: scoring is deterministic
    #[test]
    fn prop_score_deterministic(lead in lead_strategy()) {
        prop_assert_eq!(score_lead(&lead), score_lead(&lead.clone()));
    }

    /// Property: adding a phone number never lowers the score
    #[test]
    fn prop_adding_phone_is_monotonic(lead in lead_strategy(), phone in "[0-9]{6,12}") {
        let before = score_lead(&lead);
        let with_phone = Lead { phone: Some(phone), ..lead };
        prop_assert!(score_lead(&with_phone) >= before);
    }

    /// Property: adding any contact field never lowers the score
    #[test]
    fn prop_adding_fields_is_monotonic(lead in lead_strategy()) {
        let before = score_lead(&lead);
        let richer = Lead {
            email: Some("owner@example.com".to_string()),
            company: Some("Example Ltd".to_string()),
            notes: Some("Asked for a quote on a full site redesign".to_string()),
            status: LeadStatus::Qualified,
            ..lead
        };
        prop_assert!(score_lead(&richer) >= before);
    }
}

#[test]
fn test_email_only_lead_scores_twenty() {
    let lead = Lead {
        name: "Ada".to_string(),
        email: Some("ada@example.com".to_string()),
        ..Lead::default()
    };
    assert_eq!(score_lead(&lead), 20);

    let with_phone = Lead {
        phone: Some("+33 6 12 34 56 78".to_string()),
        ..lead
    };
    assert_eq!(score_lead(&with_phone), 50);
}

#[test]
fn test_complete_lead_is_capped() {
    let lead = Lead {
        name: "Ada".to_string(),
        email: Some("ada@example.com".to_string()),
        phone: Some("0612345678".to_string()),
        company: Some("Analytical Engines".to_string()),
        status: LeadStatus::Converted,
        notes: Some("Needs a new marketing site before the spring launch".to_string()),
    };
    assert_eq!(score_lead(&lead), 100);
}

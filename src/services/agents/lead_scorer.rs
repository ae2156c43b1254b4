//! Deterministic lead scoring.

use crate::domain::models::{Lead, LeadStatus};

const EMAIL_POINTS: u8 = 20;
const PHONE_POINTS: u8 = 30;
const COMPANY_POINTS: u8 = 25;
const ENGAGED_NOTES_POINTS: u8 = 15;
const PROGRESSED_STATUS_POINTS: u8 = 10;

/// Notes longer than this count as engagement.
const ENGAGED_NOTES_MIN_CHARS: usize = 20;

pub const MAX_LEAD_SCORE: u8 = 100;

/// Score a lead in `0..=100`.
///
/// Pure and total. Adding a previously absent field never lowers the score.
pub fn score_lead(lead: &Lead) -> u8 {
    let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());

    let mut score: u32 = 0;
    if present(&lead.email) {
        score += u32::from(EMAIL_POINTS);
    }
    if present(&lead.phone) {
        score += u32::from(PHONE_POINTS);
    }
    if present(&lead.company) {
        score += u32::from(COMPANY_POINTS);
    }
    if lead
        .notes
        .as_deref()
        .is_some_and(|notes| notes.trim().chars().count() > ENGAGED_NOTES_MIN_CHARS)
    {
        score += u32::from(ENGAGED_NOTES_POINTS);
    }
    if lead.status != LeadStatus::New {
        score += u32::from(PROGRESSED_STATUS_POINTS);
    }

    u8::try_from(score.min(u32::from(MAX_LEAD_SCORE))).unwrap_or(MAX_LEAD_SCORE)
}

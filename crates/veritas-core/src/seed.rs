//! Built-in analysis records.
//!
//! The known set is produced by an explicit call rather than a static so
//! callers (and tests) can substitute their own records.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::AnalysisRecord;

/// The three built-in records, in matching order.
pub fn seed_records() -> Vec<AnalysisRecord> {
    vec![
        known(
            "1",
            "Breaking: Government secretly planning to ban all social media platforms!",
            23,
            &[
                "Uses sensationalized language (\"Breaking\", \"secretly\")",
                "Makes extreme claims without credible sources",
                "Emotional manipulation through fear tactics",
                "No verifiable government statement found",
            ],
            "https://factcheck.example.com/social-media-ban-false",
            at(2025, 1, 10, 10, 30),
        ),
        known(
            "2",
            "Scientists at MIT develop new battery technology that charges phones in 10 seconds",
            78,
            &[
                "Source from reputable institution (MIT)",
                "Claim is technically plausible but needs verification",
                "No peer-reviewed publication cited",
                "Timeline seems optimistic for commercial availability",
            ],
            "https://factcheck.example.com/battery-tech-claim",
            at(2025, 1, 9, 14, 15),
        ),
        known(
            "3",
            "Local weather forecast predicts rain tomorrow with 70% chance of precipitation",
            92,
            &[
                "Information from official meteorological sources",
                "Reasonable probability statement",
                "Standard weather reporting format",
                "Easily verifiable through multiple sources",
            ],
            "https://weather.example.com/forecast-accuracy",
            at(2025, 1, 8, 16, 45),
        ),
    ]
}

fn known(
    id: &str,
    text: &str,
    score: u8,
    explanations: &[&str],
    url: &str,
    created_at: DateTime<Utc>,
) -> AnalysisRecord {
    AnalysisRecord::from_trusted_parts(
        id.to_string(),
        text.to_string(),
        score,
        explanations.iter().map(|e| e.to_string()).collect(),
        url.to_string(),
        created_at,
    )
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

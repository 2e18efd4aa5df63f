use crate::{Result, SharedError};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Where a contest sits in time relative to a given instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContestPhase {
    /// now < start
    Upcoming,
    /// start <= now <= end
    Active,
    /// now > end
    Ended,
}

impl std::fmt::Display for ContestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContestPhase::Upcoming => write!(f, "upcoming"),
            ContestPhase::Active => write!(f, "active"),
            ContestPhase::Ended => write!(f, "ended"),
        }
    }
}

/// Represents a contest as stored in the document store
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_contest_window"))]
pub struct Contest {
    /// Document ID
    pub id: String,

    /// Display title of the contest
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    /// When the contest opens for joining
    pub start_time: DateTime<FixedOffset>,

    /// When the contest closes (inclusive)
    pub end_time: DateTime<FixedOffset>,

    /// Capacity, if the contest has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,

    /// User ids in join order
    #[serde(default)]
    pub participants: Vec<String>,
}

fn validate_contest_window(contest: &Contest) -> std::result::Result<(), ValidationError> {
    if contest.end_time < contest.start_time {
        return Err(ValidationError::new("end_before_start"));
    }
    if let Some(max) = contest.max_participants {
        if contest.participants.len() > max as usize {
            return Err(ValidationError::new("participants_exceed_maximum"));
        }
    }
    Ok(())
}

impl Contest {
    /// Creates a new contest with no participants, with validation
    pub fn new(
        id: String,
        title: String,
        start_time: DateTime<FixedOffset>,
        end_time: DateTime<FixedOffset>,
        max_participants: Option<u32>,
    ) -> Result<Self> {
        let contest = Self {
            id,
            title,
            start_time,
            end_time,
            max_participants,
            participants: Vec::new(),
        };
        contest.validate_fields()?;
        Ok(contest)
    }

    /// Validates the contest data
    pub fn validate_fields(&self) -> Result<()> {
        self.validate().map_err(|e| {
            log::debug!("Contest {} failed validation: {}", self.id, e);
            SharedError::Validation(e.to_string())
        })
    }

    pub fn phase_at(&self, now: DateTime<Utc>) -> ContestPhase {
        if now < self.start_time.with_timezone(&Utc) {
            ContestPhase::Upcoming
        } else if now > self.end_time.with_timezone(&Utc) {
            ContestPhase::Ended
        } else {
            ContestPhase::Active
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.phase_at(now) == ContestPhase::Active
    }

    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.phase_at(now) == ContestPhase::Upcoming
    }

    pub fn is_ended_at(&self, now: DateTime<Utc>) -> bool {
        self.phase_at(now) == ContestPhase::Ended
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// True when a maximum is set and has been reached.
    pub fn is_full(&self) -> bool {
        self.max_participants
            .map_or(false, |max| self.participants.len() >= max as usize)
    }

    /// Free places left, or `None` for an uncapped contest.
    pub fn remaining_slots(&self) -> Option<u32> {
        self.max_participants.map(|max| {
            let taken = u32::try_from(self.participants.len()).unwrap_or(u32::MAX);
            max.saturating_sub(taken)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn create_test_contest() -> Contest {
        Contest {
            id: "weekly-algebra".to_string(),
            title: "Weekly Algebra Sprint".to_string(),
            start_time: DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z").unwrap(),
            end_time: DateTime::parse_from_rfc3339("2024-03-01T17:00:00Z").unwrap(),
            max_participants: Some(3),
            participants: vec!["alice".to_string(), "bob".to_string()],
        }
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[rstest]
    #[case("2024-03-01T08:59:59Z", ContestPhase::Upcoming)]
    #[case("2024-03-01T09:00:00Z", ContestPhase::Active)]
    #[case("2024-03-01T12:00:00Z", ContestPhase::Active)]
    #[case("2024-03-01T17:00:00Z", ContestPhase::Active)]
    #[case("2024-03-01T17:00:01Z", ContestPhase::Ended)]
    fn test_phase_boundaries(#[case] now: &str, #[case] expected: ContestPhase) {
        let contest = create_test_contest();
        assert_eq!(contest.phase_at(at(now)), expected);
    }

    #[test]
    fn test_phase_respects_offsets() {
        let mut contest = create_test_contest();
        contest.start_time = DateTime::parse_from_rfc3339("2024-03-01T04:00:00-05:00").unwrap();
        assert!(contest.is_active_at(at("2024-03-01T09:00:00Z")));
        assert!(contest.is_upcoming_at(at("2024-03-01T08:59:00Z")));
    }

    #[test]
    fn test_membership_and_capacity() {
        let mut contest = create_test_contest();
        assert!(contest.has_participant("alice"));
        assert!(!contest.has_participant("carol"));
        assert!(!contest.is_full());
        assert_eq!(contest.remaining_slots(), Some(1));

        contest.participants.push("carol".to_string());
        assert!(contest.is_full());
        assert_eq!(contest.remaining_slots(), Some(0));

        contest.max_participants = None;
        assert!(!contest.is_full());
        assert_eq!(contest.remaining_slots(), None);
    }

    #[test]
    fn test_contest_validation_success() {
        assert!(create_test_contest().validate_fields().is_ok());
    }

    #[test]
    fn test_contest_validation_empty_title() {
        let mut contest = create_test_contest();
        contest.title = "".to_string();
        let errors = contest.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test_log::test]
    fn test_contest_validation_end_before_start() {
        let mut contest = create_test_contest();
        contest.end_time = contest.start_time - Duration::hours(1);
        assert!(matches!(
            contest.validate_fields(),
            Err(SharedError::Validation(_))
        ));
    }

    #[test_log::test]
    fn test_contest_validation_over_capacity() {
        let mut contest = create_test_contest();
        contest.max_participants = Some(1);
        assert!(contest.validate_fields().is_err());
    }

    #[test]
    fn test_contest_new_starts_empty() {
        let contest = Contest::new(
            "c1".to_string(),
            "Geometry Cup".to_string(),
            DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z").unwrap(),
            DateTime::parse_from_rfc3339("2024-03-02T09:00:00Z").unwrap(),
            None,
        )
        .unwrap();
        assert!(contest.participants.is_empty());
    }

    #[test]
    fn test_contest_document_shape() {
        let contest = create_test_contest();
        let json = serde_json::to_value(&contest).unwrap();
        assert_eq!(json["maxParticipants"], 3);
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_some());

        let deserialized: Contest = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, contest);
    }

    #[test]
    fn test_contest_document_without_optional_fields() {
        let json = r#"{
            "id": "c2",
            "title": "Open Quiz",
            "startTime": "2024-03-01T09:00:00Z",
            "endTime": "2024-03-01T10:00:00Z"
        }"#;
        let contest: Contest = serde_json::from_str(json).unwrap();
        assert_eq!(contest.max_participants, None);
        assert!(contest.participants.is_empty());
    }

    proptest! {
        #[test]
        fn prop_phase_is_monotonic(offset_a in -10_000i64..10_000, offset_b in -10_000i64..10_000) {
            let contest = create_test_contest();
            let base = contest.start_time.with_timezone(&Utc);
            let (early, late) = if offset_a <= offset_b { (offset_a, offset_b) } else { (offset_b, offset_a) };
            let rank = |p: ContestPhase| match p {
                ContestPhase::Upcoming => 0,
                ContestPhase::Active => 1,
                ContestPhase::Ended => 2,
            };
            let first = contest.phase_at(base + Duration::minutes(early));
            let second = contest.phase_at(base + Duration::minutes(late));
            prop_assert!(rank(first) <= rank(second));
        }

        #[test]
        fn prop_exactly_one_predicate_holds(offset in -10_000i64..10_000) {
            let contest = create_test_contest();
            let now = contest.start_time.with_timezone(&Utc) + Duration::minutes(offset);
            let hits = [
                contest.is_upcoming_at(now),
                contest.is_active_at(now),
                contest.is_ended_at(now),
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            prop_assert_eq!(hits, 1);
        }
    }
}

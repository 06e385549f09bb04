// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete identity resolution across the roster and activity sources.
//!
//! The two sources are maintained independently and spell names
//! differently, so matching is a best-effort string heuristic. A member
//! that cannot be matched silently gets zero activity; nothing here errors.

use crate::models::activity::MISSING_NAME_PART;
use crate::models::{AthleteRef, RosterMember};

/// Display name for a member with no usable name fields.
pub const UNKNOWN_MEMBER: &str = "Unknown Member";

/// Canonical display name of a roster member.
///
/// Explicit display name if non-empty, else `"<first> <last>"` trimmed,
/// else [`UNKNOWN_MEMBER`].
pub fn resolve_member_name(member: &RosterMember) -> String {
    if let Some(name) = member.preferred_name() {
        return name.to_string();
    }
    let combined = join_trimmed(member.firstname.as_deref(), member.lastname.as_deref());
    if combined.is_empty() {
        UNKNOWN_MEMBER.to_string()
    } else {
        combined
    }
}

/// Aggregation key for the athlete of an activity record.
///
/// A non-empty display name wins. Otherwise the raw first and last names
/// are joined with a space, with `"undefined"` standing in for a missing
/// part, so a record without an athlete becomes `"undefined undefined"`.
/// Downstream consumers key on that placeholder.
pub fn athlete_identity(athlete: Option<&AthleteRef>) -> String {
    if let Some(name) = athlete.and_then(AthleteRef::preferred_name) {
        return name.to_string();
    }
    literal_full_name(athlete)
}

/// Find which recorded identity a roster member corresponds to.
///
/// Candidates, first hit wins: the activity's `"first last"`, the
/// activity's display name, the member's `"first last"`, and the member's
/// `"last first"`. `is_known` reports whether an aggregate exists for a name.
pub fn match_activity_to_member<F>(
    activity: Option<&AthleteRef>,
    member: &RosterMember,
    is_known: F,
) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let mut candidates: Vec<String> = Vec::with_capacity(4);
    if let Some(athlete) = activity {
        candidates.push(literal_full_name(Some(athlete)));
        if let Some(display) = athlete.preferred_name() {
            candidates.push(display.to_string());
        }
    }
    candidates.push(join_trimmed(
        member.firstname.as_deref(),
        member.lastname.as_deref(),
    ));
    candidates.push(join_trimmed(
        member.lastname.as_deref(),
        member.firstname.as_deref(),
    ));

    candidates
        .into_iter()
        .filter(|c| !c.is_empty())
        .find(|c| is_known(c))
}

fn literal_full_name(athlete: Option<&AthleteRef>) -> String {
    let first = athlete
        .and_then(|a| a.firstname.as_deref())
        .unwrap_or(MISSING_NAME_PART);
    let last = athlete
        .and_then(|a| a.lastname.as_deref())
        .unwrap_or(MISSING_NAME_PART);
    format!("{} {}", first, last)
}

fn join_trimmed(a: Option<&str>, b: Option<&str>) -> String {
    format!("{} {}", a.unwrap_or(""), b.unwrap_or(""))
        .trim()
        .to_string()
}

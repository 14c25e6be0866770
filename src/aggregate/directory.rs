//! People directory: fold meeting participants into one record per name.
//!
//! Identity is the lowercased, trimmed display name. Two different people who
//! share a name collapse into one record; there is nothing else in a meeting's
//! participant list to tell them apart.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::dates::parse_local_datetime;
use crate::types::{KnownContact, Meeting};

/// One person as seen across meetings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    /// Lowercased, trimmed name.
    pub key: String,
    /// Casing from the first meeting the name appeared in.
    pub name: String,
    pub organizations: BTreeSet<String>,
    pub emails: BTreeSet<String>,
    pub meeting_count: usize,
    /// Raw date string of the latest meeting.
    pub last_meeting: String,
    pub meeting_ids: Vec<String>,
}

/// Normalize a display name into a directory key.
pub fn person_key(name: &str) -> String {
    name.trim().to_lowercase()
}

struct Accumulator<'a> {
    summary: PersonSummary,
    last_seen: Option<NaiveDateTime>,
    /// Meeting ids already counted, mirrors `summary.meeting_ids`.
    seen: HashSet<&'a str>,
}

/// Build the directory from meetings, then enrich it from known contacts.
///
/// Sorted by meeting count (descending), then name. A meeting is counted at
/// most once per person no matter how many times it, or the name within it,
/// is repeated.
pub fn build_directory(meetings: &[Meeting], contacts: &[KnownContact], tz: &Tz) -> Vec<PersonSummary> {
    let mut people: HashMap<String, Accumulator<'_>> = HashMap::new();

    for meeting in meetings {
        let organizations = clean_values(meeting.organizations());
        let seen_at = parse_local_datetime(&meeting.meeting_date, tz);

        for raw_name in meeting.participants() {
            let name = raw_name.trim();
            if name.is_empty() {
                continue;
            }
            let key = person_key(name);

            match people.get_mut(&key) {
                Some(acc) => merge_meeting(acc, meeting, &organizations, seen_at),
                None => {
                    people.insert(
                        key.clone(),
                        Accumulator {
                            summary: PersonSummary {
                                key,
                                name: name.to_string(),
                                organizations: organizations.iter().cloned().collect(),
                                emails: BTreeSet::new(),
                                meeting_count: 1,
                                last_meeting: meeting.meeting_date.clone(),
                                meeting_ids: vec![meeting.id.clone()],
                            },
                            last_seen: seen_at,
                            seen: HashSet::from([meeting.id.as_str()]),
                        },
                    );
                }
            }
        }
    }

    enrich_from_contacts(&mut people, contacts);

    let mut directory: Vec<PersonSummary> = people.into_values().map(|acc| acc.summary).collect();
    directory.sort_by(|a, b| {
        b.meeting_count
            .cmp(&a.meeting_count)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.key.cmp(&b.key))
    });
    directory
}

fn merge_meeting<'a>(
    acc: &mut Accumulator<'a>,
    meeting: &'a Meeting,
    organizations: &[String],
    seen_at: Option<NaiveDateTime>,
) {
    if !acc.seen.insert(meeting.id.as_str()) {
        return;
    }

    acc.summary.meeting_count += 1;
    acc.summary.meeting_ids.push(meeting.id.clone());
    acc.summary
        .organizations
        .extend(organizations.iter().cloned());

    // `None` orders before any date, so an unreadable date never wins.
    if seen_at > acc.last_seen {
        acc.last_seen = seen_at;
        acc.summary.last_meeting = meeting.meeting_date.clone();
    }
}

fn enrich_from_contacts(people: &mut HashMap<String, Accumulator<'_>>, contacts: &[KnownContact]) {
    for contact in contacts {
        let Some(acc) = people.get_mut(&person_key(&contact.name)) else {
            continue;
        };
        if let Some(email) = non_empty(contact.email.as_deref()) {
            acc.summary.emails.insert(email.to_string());
        }
        if let Some(org) = non_empty(contact.organization.as_deref()) {
            acc.summary.organizations.insert(org.to_string());
        }
    }
}

fn clean_values(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(id: &str, date: &str, participants: &[&str], orgs: &[&str]) -> Meeting {
        Meeting {
            id: id.to_string(),
            meeting_date: date.to_string(),
            participants: Some(serde_json::to_string(participants).unwrap()),
            organizations: Some(serde_json::to_string(orgs).unwrap()),
            ..Default::default()
        }
    }

    fn find<'a>(dir: &'a [PersonSummary], key: &str) -> &'a PersonSummary {
        dir.iter().find(|p| p.key == key).expect("person present")
    }

    #[test]
    fn test_case_insensitive_merge() {
        let meetings = vec![
            meeting("m1", "2024-01-01", &["Alice"], &["Acme"]),
            meeting("m2", "2024-01-10", &["alice"], &["Globex"]),
        ];
        let dir = build_directory(&meetings, &[], &Tz::UTC);

        assert_eq!(dir.len(), 1);
        let alice = &dir[0];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.key, "alice");
        assert_eq!(alice.meeting_count, 2);
        assert_eq!(
            alice.organizations,
            BTreeSet::from(["Acme".to_string(), "Globex".to_string()])
        );
        assert_eq!(alice.last_meeting, "2024-01-10");
        assert_eq!(alice.meeting_ids, vec!["m1", "m2"]);
    }

    #[test]
    fn test_last_meeting_only_moves_forward() {
        let meetings = vec![
            meeting("m1", "2024-02-01", &["Bob"], &[]),
            meeting("m2", "2024-01-15", &["Bob"], &[]),
            meeting("m3", "not a date", &["Bob"], &[]),
            meeting("m4", "2024-02-01", &["Bob"], &[]),
        ];
        let dir = build_directory(&meetings, &[], &Tz::UTC);
        let bob = find(&dir, "bob");
        assert_eq!(bob.meeting_count, 4);
        assert_eq!(bob.last_meeting, "2024-02-01");
    }

    #[test]
    fn test_readable_date_replaces_unreadable_first_sighting() {
        let meetings = vec![
            meeting("m1", "unknown", &["Carol"], &[]),
            meeting("m2", "2024-01-05", &["Carol"], &[]),
        ];
        let dir = build_directory(&meetings, &[], &Tz::UTC);
        assert_eq!(find(&dir, "carol").last_meeting, "2024-01-05");
    }

    #[test]
    fn test_repeated_meeting_counts_once() {
        let m1 = meeting("m1", "2024-01-01", &["Alice", "ALICE ", " alice"], &["Acme"]);
        let meetings = vec![m1.clone(), m1.clone(), m1];
        let dir = build_directory(&meetings, &[], &Tz::UTC);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir[0].meeting_count, 1);
        assert_eq!(dir[0].meeting_ids, vec!["m1"]);
    }

    #[test]
    fn test_contact_enrichment_attaches_email() {
        let meetings = vec![meeting("m1", "2024-01-01", &["Alice"], &["Acme"])];
        let contacts = vec![
            KnownContact {
                name: "Alice".to_string(),
                email: Some("a@x.com".to_string()),
                organization: Some("Acme".to_string()),
            },
            KnownContact {
                name: " alice ".to_string(),
                email: Some("a@x.com".to_string()),
                organization: Some("Initech".to_string()),
            },
            KnownContact {
                name: "Zed".to_string(),
                email: Some("z@x.com".to_string()),
                organization: None,
            },
        ];
        let dir = build_directory(&meetings, &contacts, &Tz::UTC);

        assert_eq!(dir.len(), 1, "contacts never create people");
        let alice = &dir[0];
        assert_eq!(alice.emails, BTreeSet::from(["a@x.com".to_string()]));
        assert_eq!(
            alice.organizations,
            BTreeSet::from(["Acme".to_string(), "Initech".to_string()])
        );
        assert_eq!(alice.meeting_count, 1);
    }

    #[test]
    fn test_malformed_participants_are_skipped() {
        let mut broken = meeting("m1", "2024-01-01", &[], &[]);
        broken.participants = Some("Alice, Bob".to_string());
        let mut absent = meeting("m2", "2024-01-02", &[], &[]);
        absent.participants = None;
        let ok = meeting("m3", "2024-01-03", &["", "  ", "Dana"], &["  "]);

        let dir = build_directory(&[broken, absent, ok], &[], &Tz::UTC);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir[0].name, "Dana");
        assert!(dir[0].organizations.is_empty());
    }

    #[test]
    fn test_sorted_by_meeting_count_then_name() {
        let meetings = vec![
            meeting("m1", "2024-01-01", &["Zoe", "Bea", "Al"], &[]),
            meeting("m2", "2024-01-02", &["Zoe", "Bea"], &[]),
            meeting("m3", "2024-01-03", &["Zoe"], &[]),
        ];
        let dir = build_directory(&meetings, &[], &Tz::UTC);
        let order: Vec<(&str, usize)> = dir
            .iter()
            .map(|p| (p.name.as_str(), p.meeting_count))
            .collect();
        assert_eq!(order, vec![("Zoe", 3), ("Bea", 2), ("Al", 1)]);
    }

    #[test]
    fn test_count_matches_distinct_meetings_across_casings() {
        let meetings = vec![
            meeting("m1", "2024-01-01", &["Eve"], &[]),
            meeting("m2", "2024-01-02", &["EVE"], &[]),
            meeting("m3", "2024-01-03", &["Frank"], &[]),
            meeting("m4", "2024-01-04", &["eVe", "Eve"], &[]),
        ];
        let dir = build_directory(&meetings, &[], &Tz::UTC);
        assert_eq!(find(&dir, "eve").meeting_count, 3);
        assert_eq!(find(&dir, "frank").meeting_count, 1);
        assert_eq!(dir.iter().filter(|p| p.key == "eve").count(), 1);
    }

    #[test]
    fn test_interleaved_repeats_over_many_meetings() {
        let ids: Vec<String> = (0..500).map(|i| format!("m{}", i)).collect();
        let mut meetings: Vec<Meeting> = ids
            .iter()
            .map(|id| meeting(id, "2024-03-01", &["Grace"], &[]))
            .collect();
        // Every tenth meeting shows up again later in the list.
        let repeats: Vec<Meeting> = meetings.iter().step_by(10).cloned().collect();
        meetings.extend(repeats);

        let dir = build_directory(&meetings, &[], &Tz::UTC);
        let grace = find(&dir, "grace");
        assert_eq!(grace.meeting_count, 500);
        assert_eq!(grace.meeting_ids, ids);
    }
}

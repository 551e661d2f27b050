//! Collaboration detection from the rolling event feed.
//!
//! When one agent's event mentions another agent by identifier, the two are
//! considered to be working together and a short-lived [`CollaborationPair`]
//! is created. The renderer walks one of them over to the other's desk.
//!
//! # Detection Pipeline
//!
//! 1. **Expire**: drop active pairs whose `expires_at` has passed.
//! 2. **Window**: keep events whose age lies in `[0, detection_window)`.
//!    Future-dated and unparseable events are skipped.
//! 3. **Mentions**: case-insensitive substring search for every known
//!    identifier (other than the author) in the message.
//! 4. **Roles**: the higher tier stays (`agent_a`); on a tie the author
//!    stays.
//! 5. **Type**: ordered keyword rules (delegation, data exchange, review),
//!    falling back to generic.
//! 6. **Cap**: retained pairs first, then new ones, truncated to the
//!    configured maximum.
//!
//! Substring matching is literal: an identifier contained in another
//! identifier or in an unrelated word still counts as a mention.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use workfloor_types::{AgentId, CollaborationPair, CollaborationType, FeedEvent};
use workfloor_world::OrgChart;

use crate::config::DetectorConfig;

// ---------------------------------------------------------------------------
// Keyword rules
// ---------------------------------------------------------------------------

/// Keywords that mark work being handed over.
const DELEGATION_KEYWORDS: &[&str] = &["delegat", "assign", "hand off", "handoff", "hand-off"];

/// Keywords that mark data moving between agents.
const DATA_EXCHANGE_KEYWORDS: &[&str] = &[
    "data", "transfer", "sync", "export", "import", "payload", "dataset",
];

/// Keywords that mark review or verification work.
const REVIEW_KEYWORDS: &[&str] = &["review", "verif", "audit", "approv", "inspect", "check"];

/// Type rules in priority order. The first rule with a matching keyword wins.
const TYPE_RULES: &[(&[&str], CollaborationType)] = &[
    (DELEGATION_KEYWORDS, CollaborationType::Delegation),
    (DATA_EXCHANGE_KEYWORDS, CollaborationType::DataExchange),
    (REVIEW_KEYWORDS, CollaborationType::Review),
];

/// Infer the interaction type from a message.
pub fn infer_collaboration_type(message: &str) -> CollaborationType {
    let lower = message.to_lowercase();
    TYPE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(CollaborationType::Generic, |(_, kind)| *kind)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 feed timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Whether an event stamped `at` is inside the detection window at `now`.
pub fn is_recent(at: DateTime<Utc>, now: DateTime<Utc>, config: &DetectorConfig) -> bool {
    let age = now.signed_duration_since(at);
    age >= chrono::TimeDelta::zero() && age < config.detection_window()
}

/// Agents mentioned in the event's message, in identifier order.
///
/// The author never mentions itself.
pub fn mentioned_agents<'a>(event: &FeedEvent, org: &'a OrgChart) -> Vec<&'a AgentId> {
    let lower = event.message.to_lowercase();
    org.agents()
        .filter(|agent| **agent != event.agent_id)
        .filter(|agent| lower.contains(&agent.as_str().to_lowercase()))
        .collect()
}

/// Decide who stays and who walks.
///
/// Returns `(stayer, walker)`. The agent with the higher tier priority
/// stays; on a tie the author stays.
pub fn assign_roles(author: &AgentId, mentioned: &AgentId, org: &OrgChart) -> (AgentId, AgentId) {
    let author_priority = org.tier_of(author.as_str()).priority();
    let mentioned_priority = org.tier_of(mentioned.as_str()).priority();
    if mentioned_priority > author_priority {
        (mentioned.clone(), author.clone())
    } else {
        (author.clone(), mentioned.clone())
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Update the active collaboration set from the event feed.
///
/// Pure and deterministic: identical inputs give identical output. Event
/// order matters, since a mention is ignored once a pair for the same two
/// agents exists (in either order). Existing pairs are never evicted to
/// make room for new ones; only surplus new pairs are dropped.
pub fn detect(
    events: &[FeedEvent],
    active: &[CollaborationPair],
    org: &OrgChart,
    now: DateTime<Utc>,
    config: &DetectorConfig,
) -> Vec<CollaborationPair> {
    let mut result: Vec<CollaborationPair> =
        active.iter().filter(|p| !p.is_expired(now)).cloned().collect();

    let expired = active.len().saturating_sub(result.len());
    if expired > 0 {
        debug!(expired, "Collaborations expired");
    }

    let retained = result.len();

    for event in events {
        let Some(at) = parse_timestamp(&event.timestamp) else {
            debug!(
                agent = %event.agent_id,
                timestamp = %event.timestamp,
                "Skipping event with unreadable timestamp"
            );
            continue;
        };
        if !is_recent(at, now, config) {
            continue;
        }

        for mentioned in mentioned_agents(event, org) {
            if result
                .iter()
                .any(|p| p.involves_both(&event.agent_id, mentioned))
            {
                continue;
            }

            let (agent_a, agent_b) = assign_roles(&event.agent_id, mentioned, org);
            let collaboration_type = infer_collaboration_type(&event.message);
            debug!(
                stayer = %agent_a,
                walker = %agent_b,
                kind = %collaboration_type,
                "Mention detected"
            );
            result.push(CollaborationPair {
                agent_a,
                agent_b,
                message: event.message.clone(),
                started_at: now,
                expires_at: now
                    .checked_add_signed(config.collaboration_duration())
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
                collaboration_type,
            });
        }
    }

    // Retained pairs survive even if the cap was lowered below their count.
    result.truncate(config.max_concurrent.max(retained));

    for pair in result.iter().skip(retained) {
        info!(
            stayer = %pair.agent_a,
            walker = %pair.agent_b,
            kind = %pair.collaboration_type,
            "Collaboration started"
        );
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use workfloor_types::{FeedEventType, Tier};

    use super::*;

    fn org() -> OrgChart {
        [
            ("commander", Tier::Commander),
            ("trade-master", Tier::Director),
            ("data-engineer", Tier::Director),
            ("full-stack", Tier::Worker),
            ("analyst", Tier::Worker),
            ("designer", Tier::Worker),
            ("reviewer", Tier::Worker),
        ]
        .into_iter()
        .map(|(slug, tier)| (AgentId::from(slug), tier))
        .collect()
    }

    fn now() -> DateTime<Utc> {
        parse_timestamp("2026-03-02T09:30:00Z").unwrap()
    }

    fn event(seconds_ago: i64, author: &str, message: &str) -> FeedEvent {
        FeedEvent::at(
            now() - TimeDelta::seconds(seconds_ago),
            author,
            message,
            FeedEventType::Message,
        )
    }

    #[test]
    fn delegation_mention_creates_one_pair() {
        let events = vec![event(1, "trade-master", "full-stack agent delegated")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());

        assert_eq!(pairs.len(), 1);
        let pair = pairs.first().unwrap();
        assert_eq!(pair.agent_a.as_str(), "trade-master");
        assert_eq!(pair.agent_b.as_str(), "full-stack");
        assert_eq!(pair.collaboration_type, CollaborationType::Delegation);
        assert_eq!(pair.started_at, now());
        assert_eq!(pair.expires_at, now() + TimeDelta::seconds(8));
        assert_eq!(pair.message, "full-stack agent delegated");
    }

    #[test]
    fn higher_tier_mentioned_agent_stays() {
        let events = vec![event(1, "analyst", "asking commander for a decision")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        let pair = pairs.first().unwrap();
        assert_eq!(pair.agent_a.as_str(), "commander");
        assert_eq!(pair.agent_b.as_str(), "analyst");
    }

    #[test]
    fn equal_tier_author_stays() {
        let events = vec![event(1, "designer", "pairing with analyst")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        let pair = pairs.first().unwrap();
        assert_eq!(pair.agent_a.as_str(), "designer");
        assert_eq!(pair.agent_b.as_str(), "analyst");
    }

    #[test]
    fn unknown_author_ranks_lowest() {
        let events = vec![event(1, "intern", "shadowing trade-master today")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        let pair = pairs.first().unwrap();
        assert_eq!(pair.agent_a.as_str(), "trade-master");
        assert_eq!(pair.agent_b.as_str(), "intern");
    }

    #[test]
    fn stale_event_is_ignored() {
        let events = vec![event(6, "trade-master", "full-stack agent delegated")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        assert!(pairs.is_empty());
    }

    #[test]
    fn window_upper_bound_is_exclusive() {
        let events = vec![event(5, "trade-master", "full-stack agent delegated")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        assert!(pairs.is_empty());
    }

    #[test]
    fn future_event_is_ignored() {
        let events = vec![event(-2, "trade-master", "full-stack agent delegated")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        assert!(pairs.is_empty());
    }

    #[test]
    fn malformed_timestamp_does_not_abort_batch() {
        let mut bad = event(1, "designer", "ping analyst");
        bad.timestamp = String::from("yesterday-ish");
        let events = vec![bad, event(1, "trade-master", "full-stack agent delegated")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.first().unwrap().agent_b.as_str(), "full-stack");
    }

    #[test]
    fn mention_is_case_insensitive_and_ignores_self() {
        let events = vec![event(1, "designer", "Designer waiting on FULL-STACK")];
        let pairs = detect(&events, &[], &org(), now(), &DetectorConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.first().unwrap().agent_b.as_str(), "full-stack");
    }

    #[test]
    fn expired_pair_is_dropped_without_new_events() {
        let cfg = DetectorConfig::default();
        let first = detect(
            &[event(1, "trade-master", "full-stack agent delegated")],
            &[],
            &org(),
            now(),
            &cfg,
        );
        let later = now() + TimeDelta::seconds(9);
        let pairs = detect(&[], &first, &org(), later, &cfg);
        assert!(pairs.is_empty());
    }

    #[test]
    fn pair_expires_exactly_at_deadline() {
        let cfg = DetectorConfig::default();
        let first = detect(
            &[event(1, "trade-master", "full-stack agent delegated")],
            &[],
            &org(),
            now(),
            &cfg,
        );
        let at_deadline = now() + TimeDelta::seconds(8);
        assert!(detect(&[], &first, &org(), at_deadline, &cfg).is_empty());
        let just_before = at_deadline - TimeDelta::milliseconds(1);
        assert_eq!(detect(&[], &first, &org(), just_before, &cfg).len(), 1);
    }

    #[test]
    fn resubmitted_event_does_not_duplicate() {
        let cfg = DetectorConfig::default();
        let events = vec![event(1, "trade-master", "full-stack agent delegated")];
        let first = detect(&events, &[], &org(), now(), &cfg);
        let again = detect(&events, &first, &org(), now(), &cfg);
        assert_eq!(again, first);
    }

    #[test]
    fn reverse_mention_is_same_pair() {
        let cfg = DetectorConfig::default();
        let events = vec![
            event(2, "trade-master", "full-stack agent delegated"),
            event(1, "full-stack", "done, trade-master"),
        ];
        let pairs = detect(&events, &[], &org(), now(), &cfg);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn result_is_capped_and_keeps_existing_first() {
        let cfg = DetectorConfig::default();
        let existing = detect(
            &[event(1, "designer", "pairing with reviewer")],
            &[],
            &org(),
            now(),
            &cfg,
        );
        let events = vec![
            event(1, "commander", "analyst, trade-master, data-engineer, full-stack: standup"),
            event(1, "data-engineer", "handing the dataset to analyst"),
        ];
        let pairs = detect(&events, &existing, &org(), now(), &cfg);
        assert_eq!(pairs.len(), cfg.max_concurrent);
        assert_eq!(pairs.first(), existing.first());
    }

    #[test]
    fn cap_never_evicts_existing_pairs() {
        let cfg = DetectorConfig {
            max_concurrent: 1,
            ..DetectorConfig::default()
        };
        let existing = detect(
            &[event(1, "designer", "pairing with reviewer")],
            &[],
            &org(),
            now(),
            &cfg,
        );
        let pairs = detect(
            &[event(1, "trade-master", "full-stack agent delegated")],
            &existing,
            &org(),
            now(),
            &cfg,
        );
        assert_eq!(pairs, existing);
    }

    #[test]
    fn substring_identifiers_match_literally() {
        let mut org = org();
        org.insert(AgentId::from("stack"), Tier::Worker);
        let events = vec![event(1, "designer", "blocked on full-stack")];
        let pairs = detect(&events, &[], &org, now(), &DetectorConfig::default());
        let walkers: Vec<&str> = pairs.iter().map(|p| p.agent_b.as_str()).collect();
        assert_eq!(walkers, vec!["full-stack", "stack"]);
    }

    #[test]
    fn type_rules_follow_priority() {
        assert_eq!(
            infer_collaboration_type("Delegated the data export"),
            CollaborationType::Delegation
        );
        assert_eq!(
            infer_collaboration_type("transfer then review"),
            CollaborationType::DataExchange
        );
        assert_eq!(
            infer_collaboration_type("please verify the build"),
            CollaborationType::Review
        );
        assert_eq!(infer_collaboration_type("lunch?"), CollaborationType::Generic);
    }
}

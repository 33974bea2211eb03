// Property-based testing for tier coverage, payout monotonicity and
// contact status monotonicity

use adlab_hub::commission::{CommissionResolver, Tier, TierRule, TierTable};
use adlab_hub::contacts::{next_status, ContactEvent, ContactStatus};
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum EventKind {
    AppointmentConfirmed,
    QuoteCreated,
    QuoteAccepted,
    MarkLost,
}

impl EventKind {
    fn for_contact(self, contact_id: Uuid) -> ContactEvent {
        match self {
            EventKind::AppointmentConfirmed => ContactEvent::AppointmentConfirmed { contact_id },
            EventKind::QuoteCreated => ContactEvent::QuoteCreated { contact_id },
            EventKind::QuoteAccepted => ContactEvent::QuoteAccepted { contact_id },
            EventKind::MarkLost => ContactEvent::MarkLost { contact_id },
        }
    }
}

// Contiguous rule sets: a start, then per-tier widths and non-decreasing unit amounts
fn rule_set_strategy() -> impl Strategy<Value = Vec<TierRule>> {
    (0u32..5, prop::collection::vec((1u32..40, 1u64..500), 1..=5)).prop_map(|(start, tiers)| {
        let count = tiers.len();
        let mut min = start;
        let mut unit = 0u64;
        tiers
            .into_iter()
            .enumerate()
            .map(|(i, (width, step))| {
                unit += step;
                let max = (i + 1 < count).then(|| min + width - 1);
                let rule = TierRule::new(Tier::ALL[i], min, max, unit);
                min += width;
                rule
            })
            .collect()
    })
}

fn apply_all(start: ContactStatus, events: &[ContactEvent], id: Uuid) -> ContactStatus {
    events.iter().fold(start, |status, event| {
        next_status(id, status, event).map_or(status, |t| t.to)
    })
}

fn status_strategy() -> impl Strategy<Value = ContactStatus> {
    prop_oneof![
        Just(ContactStatus::Lead),
        Just(ContactStatus::Prospect),
        Just(ContactStatus::Negotiation),
        Just(ContactStatus::Signed),
        Just(ContactStatus::Lost),
    ]
}

proptest! {
    #[test]
    fn prop_every_covered_count_matches_exactly_one_tier(rules in rule_set_strategy(), extra in 0u32..300) {
        let table = TierTable::new(rules.clone()).expect("generated rules are contiguous");
        let resolver = CommissionResolver::from_table(table);
        let start = rules[0].min_contracts;

        for contracts in 0..(start + extra) {
            let matching: Vec<_> = rules.iter().filter(|r| r.contains(contracts)).collect();
            let resolved = resolver.resolve_tier(contracts);
            if contracts < start {
                prop_assert!(matching.is_empty());
                prop_assert!(resolved.using_fallback());
            } else {
                prop_assert_eq!(matching.len(), 1);
                prop_assert!(!resolved.using_fallback());
                prop_assert_eq!(*resolved.value(), matching[0].tier);
            }
        }
    }

    #[test]
    fn prop_amount_never_decreases(rules in rule_set_strategy()) {
        let start = rules[0].min_contracts;
        let resolver = CommissionResolver::from_table(TierTable::new(rules).unwrap());

        let mut previous: Option<(Tier, u64)> = None;
        for contracts in start..start + 250 {
            let tier = resolver.resolve_tier(contracts).into_value();
            let amount = resolver.compute_amount(contracts, tier).into_value();
            if let Some((previous_tier, previous_amount)) = previous {
                prop_assert!(amount >= previous_amount);
                if tier != previous_tier {
                    prop_assert!(amount > previous_amount);
                }
            }
            previous = Some((tier, amount));
        }
    }

    #[test]
    fn prop_status_never_moves_backwards(
        start in status_strategy(),
        kinds in prop::collection::vec(any::<EventKind>(), 0..30),
    ) {
        let id = Uuid::new_v4();
        let mut status = start;
        for kind in kinds {
            let event = kind.for_contact(id);
            if let Some(transition) = next_status(id, status, &event) {
                prop_assert_eq!(transition.from, status);
                match transition.to {
                    ContactStatus::Lost => {
                        prop_assert!(
                            matches!(event, ContactEvent::MarkLost { .. }),
                            "only MarkLost may move a contact to lost"
                        );
                        prop_assert!(!status.is_terminal());
                    }
                    to => {
                        prop_assert!(to.progress() > status.progress());
                    }
                }
                status = transition.to;
            }
        }
    }

    #[test]
    fn prop_repeating_an_event_is_idempotent(
        start in status_strategy(),
        prefix in prop::collection::vec(any::<EventKind>(), 0..10),
        kind in any::<EventKind>(),
    ) {
        let id = Uuid::new_v4();
        let prefix: Vec<_> = prefix.into_iter().map(|k| k.for_contact(id)).collect();
        let event = kind.for_contact(id);

        let base = apply_all(start, &prefix, id);
        let once = apply_all(base, &[event], id);
        let twice = apply_all(base, &[event, event], id);
        prop_assert_eq!(once, twice);
    }
}

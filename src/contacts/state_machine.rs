use statig::prelude::*;

use super::types::{ContactEvent, ContactId, ContactStatus};

/// Input to the lifecycle machine.
///
/// Machines are built fresh for every event and seeded with the stored
/// status through `Restore` before the business event is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleInput {
    Restore(ContactStatus),
    Event(ContactEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: ContactStatus,
    pub to: ContactStatus,
}

/// Context for a single contact's status machine
#[derive(Debug)]
pub struct ContactLifecycle {
    pub contact_id: ContactId,
    pub status: ContactStatus,
    pub last_transition: Option<StatusTransition>,
}

impl ContactLifecycle {
    pub fn new(contact_id: ContactId) -> Self {
        Self {
            contact_id,
            status: ContactStatus::Lead,
            last_transition: None,
        }
    }

    fn targets_this_contact(&self, event: &ContactEvent) -> bool {
        if event.contact_id() != self.contact_id {
            tracing::error!(
                contact_id = %self.contact_id,
                event_contact_id = %event.contact_id(),
                "Event routed to the wrong contact"
            );
            return false;
        }
        true
    }

    fn hold_terminal(&self, input: &LifecycleInput) -> Outcome<State> {
        if let LifecycleInput::Event(event) = input {
            tracing::trace!(
                contact_id = %self.contact_id,
                status = %self.status,
                event = event.kind(),
                "Contact is terminal"
            );
        }
        Handled
    }

    fn advance(&mut self, to: ContactStatus) {
        let transition = StatusTransition {
            from: self.status,
            to,
        };
        tracing::info!(
            contact_id = %self.contact_id,
            from = %transition.from,
            to = %transition.to,
            "Contact status advanced"
        );
        self.status = to;
        self.last_transition = Some(transition);
    }
}

#[state_machine(initial = "State::unhydrated()")]
impl ContactLifecycle {
    #[state]
    fn unhydrated(&mut self, event: &LifecycleInput) -> Outcome<State> {
        match event {
            LifecycleInput::Restore(status) => {
                self.status = *status;
                match status {
                    ContactStatus::Lead => Transition(State::lead()),
                    ContactStatus::Prospect => Transition(State::prospect()),
                    ContactStatus::Negotiation => Transition(State::negotiation()),
                    ContactStatus::Signed => Transition(State::signed()),
                    ContactStatus::Lost => Transition(State::lost()),
                }
            }
            LifecycleInput::Event(_) => {
                tracing::warn!(contact_id = %self.contact_id, "Event before status was restored, ignoring");
                Handled
            }
        }
    }

    #[state]
    fn lead(&mut self, event: &LifecycleInput) -> Outcome<State> {
        let LifecycleInput::Event(event) = event else {
            return Handled;
        };
        if !self.targets_this_contact(event) {
            return Handled;
        }
        match event {
            ContactEvent::AppointmentConfirmed { .. } => {
                self.advance(ContactStatus::Prospect);
                Transition(State::prospect())
            }
            ContactEvent::QuoteCreated { .. } => {
                self.advance(ContactStatus::Negotiation);
                Transition(State::negotiation())
            }
            ContactEvent::MarkLost { .. } => {
                self.advance(ContactStatus::Lost);
                Transition(State::lost())
            }
            ContactEvent::QuoteAccepted { .. } => Handled,
        }
    }

    #[state]
    fn prospect(&mut self, event: &LifecycleInput) -> Outcome<State> {
        let LifecycleInput::Event(event) = event else {
            return Handled;
        };
        if !self.targets_this_contact(event) {
            return Handled;
        }
        match event {
            ContactEvent::QuoteCreated { .. } => {
                self.advance(ContactStatus::Negotiation);
                Transition(State::negotiation())
            }
            ContactEvent::MarkLost { .. } => {
                self.advance(ContactStatus::Lost);
                Transition(State::lost())
            }
            _ => Handled,
        }
    }

    #[state]
    fn negotiation(&mut self, event: &LifecycleInput) -> Outcome<State> {
        let LifecycleInput::Event(event) = event else {
            return Handled;
        };
        if !self.targets_this_contact(event) {
            return Handled;
        }
        match event {
            ContactEvent::QuoteAccepted { .. } => {
                self.advance(ContactStatus::Signed);
                Transition(State::signed())
            }
            ContactEvent::MarkLost { .. } => {
                self.advance(ContactStatus::Lost);
                Transition(State::lost())
            }
            _ => Handled,
        }
    }

    #[state]
    fn signed(&mut self, event: &LifecycleInput) -> Outcome<State> {
        self.hold_terminal(event)
    }

    #[state]
    fn lost(&mut self, event: &LifecycleInput) -> Outcome<State> {
        self.hold_terminal(event)
    }
}

/// Evaluate `event` against a contact currently in `current`.
///
/// Returns the transition to persist, or `None` when the guard does not hold
/// and the event is a no-op.
pub fn next_status(
    contact_id: ContactId,
    current: ContactStatus,
    event: &ContactEvent,
) -> Option<StatusTransition> {
    let mut sm = ContactLifecycle::new(contact_id).state_machine();
    sm.handle(&LifecycleInput::Restore(current));
    sm.handle(&LifecycleInput::Event(*event));

    let transition = sm.inner().last_transition;
    if transition.is_none() {
        tracing::debug!(
            contact_id = %contact_id,
            status = %current,
            event = event.kind(),
            "Guard not satisfied, event ignored"
        );
    }
    transition
}

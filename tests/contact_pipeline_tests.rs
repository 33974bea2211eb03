// Contact pipeline behaviour: guards, notifications and per-contact ordering

use adlab_hub::contacts::{
    Contact, ContactEvent, ContactPipeline, ContactStatus, ContactStore, InMemoryContactStore,
    StatusNotifier, TransitionOutcome,
};
use std::sync::Arc;
use tokio::task::JoinSet;

fn pipeline_with(contacts: Vec<Contact>) -> Arc<ContactPipeline<InMemoryContactStore>> {
    Arc::new(ContactPipeline::new(
        Arc::new(InMemoryContactStore::with_contacts(contacts)),
        StatusNotifier::new(64),
    ))
}

#[tokio::test]
async fn test_late_appointment_does_not_revert_negotiation() {
    let contact = Contact::new("Hedy", "hedy@example.com");
    let id = contact.id;
    let pipeline = pipeline_with(vec![contact]);

    let outcome = pipeline
        .apply(ContactEvent::QuoteCreated { contact_id: id })
        .await
        .unwrap();
    assert_eq!(outcome.status(), ContactStatus::Negotiation);

    let outcome = pipeline
        .apply(ContactEvent::AppointmentConfirmed { contact_id: id })
        .await
        .unwrap();
    assert!(!outcome.is_applied());
    assert_eq!(outcome.status(), ContactStatus::Negotiation);
}

#[tokio::test]
async fn test_signed_contact_cannot_be_lost() {
    let mut contact = Contact::new("Katherine", "katherine@example.com");
    contact.status = ContactStatus::Negotiation;
    let id = contact.id;
    let pipeline = pipeline_with(vec![contact]);

    let outcome = pipeline
        .apply(ContactEvent::QuoteAccepted { contact_id: id })
        .await
        .unwrap();
    assert_eq!(outcome.status(), ContactStatus::Signed);

    let outcome = pipeline
        .apply(ContactEvent::MarkLost { contact_id: id })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        TransitionOutcome::Ignored {
            contact_id: id,
            status: ContactStatus::Signed
        }
    );
    assert_eq!(pipeline.store().load(id).await.unwrap().status, ContactStatus::Signed);
}

#[tokio::test]
async fn test_full_pipeline_emits_one_notification_per_step() {
    let contact = Contact::new("Joan", "joan@example.com");
    let id = contact.id;
    let pipeline = pipeline_with(vec![contact]);
    let mut changes = pipeline.subscribe();

    for event in [
        ContactEvent::AppointmentConfirmed { contact_id: id },
        ContactEvent::AppointmentConfirmed { contact_id: id },
        ContactEvent::QuoteCreated { contact_id: id },
        ContactEvent::QuoteAccepted { contact_id: id },
        ContactEvent::QuoteAccepted { contact_id: id },
    ] {
        pipeline.apply(event).await.unwrap();
    }

    let mut seen = Vec::new();
    while let Ok(change) = changes.try_recv() {
        assert_eq!(change.contact_id, id);
        seen.push((change.previous_status, change.new_status));
    }
    assert_eq!(
        seen,
        vec![
            (ContactStatus::Lead, ContactStatus::Prospect),
            (ContactStatus::Prospect, ContactStatus::Negotiation),
            (ContactStatus::Negotiation, ContactStatus::Signed),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_events_apply_once() {
    let contact = Contact::new("Frances", "frances@example.com");
    let id = contact.id;
    let pipeline = pipeline_with(vec![contact]);
    let mut changes = pipeline.subscribe();

    let mut tasks = JoinSet::new();
    for _ in 0..32 {
        let pipeline = pipeline.clone();
        tasks.spawn(async move {
            pipeline
                .apply(ContactEvent::QuoteCreated { contact_id: id })
                .await
        });
    }

    let mut applied = 0;
    while let Some(result) = tasks.join_next().await {
        let outcome = result.expect("task panicked").expect("no store conflicts under the contact lock");
        if outcome.is_applied() {
            applied += 1;
        }
        assert_eq!(outcome.status(), ContactStatus::Negotiation);
    }

    assert_eq!(applied, 1);
    assert!(changes.try_recv().is_ok());
    assert!(changes.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mixed_events_stay_monotonic() {
    let contacts: Vec<Contact> = (0..8)
        .map(|i| Contact::new(format!("contact-{i}"), format!("c{i}@example.com")))
        .collect();
    let ids: Vec<_> = contacts.iter().map(|c| c.id).collect();
    let pipeline = pipeline_with(contacts);
    let mut changes = pipeline.subscribe();

    let mut tasks = JoinSet::new();
    for id in &ids {
        for event in [
            ContactEvent::QuoteAccepted { contact_id: *id },
            ContactEvent::QuoteCreated { contact_id: *id },
            ContactEvent::AppointmentConfirmed { contact_id: *id },
            ContactEvent::QuoteCreated { contact_id: *id },
        ] {
            let pipeline = pipeline.clone();
            tasks.spawn(async move { pipeline.apply(event).await });
        }
    }
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    while let Ok(change) = changes.try_recv() {
        assert!(
            change.new_status.progress() > change.previous_status.progress(),
            "{:?} -> {:?} moved backwards",
            change.previous_status,
            change.new_status
        );
    }
    for contact in pipeline.store().list().await.unwrap() {
        assert!(matches!(
            contact.status,
            ContactStatus::Negotiation | ContactStatus::Signed
        ));
    }
}

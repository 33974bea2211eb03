use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::Command;
use crate::contacts::{
    Contact, ContactId, ContactPipeline, ContactStatus, ContactStore, InMemoryContactStore,
    RawContactEvent, StatusNotifier, TransitionOutcome,
};

/// Replay file: seed contacts plus the events to run against them
#[derive(Debug, Deserialize)]
pub struct ReplayFile {
    #[serde(default)]
    pub contacts: Vec<SeedContact>,
    pub events: Vec<RawContactEvent>,
}

#[derive(Debug, Deserialize)]
pub struct SeedContact {
    pub id: ContactId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

impl SeedContact {
    fn into_contact(self) -> Result<Contact> {
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse::<ContactStatus>()?,
            None => ContactStatus::Lead,
        };
        let now = Utc::now();
        Ok(Contact {
            id: self.id,
            name: self.name,
            email: self.email,
            status,
            assigned_to: self.assigned_to,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub ignored: usize,
    pub rejected: usize,
}

pub struct ReplayCommand {
    pub events: PathBuf,
    pub channel_capacity: usize,
}

impl ReplayCommand {
    pub fn new(events: PathBuf, channel_capacity: usize) -> Self {
        Self {
            events,
            channel_capacity,
        }
    }

    pub async fn load(&self) -> Result<ReplayFile> {
        let raw = tokio::fs::read_to_string(&self.events)
            .await
            .with_context(|| format!("reading {}", self.events.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", self.events.display()))
    }

    /// Run every event in order. Malformed events and unknown contacts are
    /// reported and skipped.
    pub async fn run(&self, file: ReplayFile) -> Result<ReplaySummary> {
        let contacts = file
            .contacts
            .into_iter()
            .map(SeedContact::into_contact)
            .collect::<Result<Vec<_>>>()?;
        let store = Arc::new(InMemoryContactStore::with_contacts(contacts));
        let pipeline = ContactPipeline::new(store.clone(), StatusNotifier::new(self.channel_capacity));

        let mut summary = ReplaySummary::default();
        for (index, raw) in file.events.into_iter().enumerate() {
            let label = format!("#{:<3} {:<22}", index + 1, raw.kind);
            match pipeline.apply_raw(raw).await {
                Ok(TransitionOutcome::Applied(change)) => {
                    summary.applied += 1;
                    println!(
                        "✅ {label} {} {} -> {}",
                        change.contact_id, change.previous_status, change.new_status
                    );
                }
                Ok(TransitionOutcome::Ignored { contact_id, status }) => {
                    summary.ignored += 1;
                    println!("⏸️  {label} {contact_id} stays {status}");
                }
                Err(e) => {
                    summary.rejected += 1;
                    println!("❌ {label} {e}");
                }
            }
        }

        println!();
        println!("📋 Final statuses:");
        for contact in store.list().await? {
            println!("   {} {:<24} {}", contact.id, contact.name, contact.status);
        }
        println!();
        println!(
            "📊 {} applied, {} ignored, {} rejected",
            summary.applied, summary.ignored, summary.rejected
        );
        Ok(summary)
    }
}

impl Command for ReplayCommand {
    async fn execute(&self) -> Result<()> {
        let file = self.load().await?;
        self.run(file).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replay_counts_outcomes() {
        let id = uuid::Uuid::new_v4();
        let file: ReplayFile = serde_json::from_value(json!({
            "contacts": [{ "id": id, "name": "Margaret" }],
            "events": [
                { "kind": "quote_created", "contact_id": id.to_string() },
                { "kind": "appointment_confirmed", "contact_id": id.to_string() },
                { "kind": "quote_accepted", "contact_id": id.to_string() },
                { "kind": "mark_lost", "contact_id": id.to_string() },
                { "kind": "quote_exploded", "contact_id": id.to_string() },
                { "kind": "mark_lost", "contact_id": uuid::Uuid::new_v4().to_string() }
            ]
        }))
        .unwrap();

        let command = ReplayCommand::new(PathBuf::from("unused.json"), 8);
        let summary = command.run(file).await.unwrap();
        assert_eq!(
            summary,
            ReplaySummary {
                applied: 2,
                ignored: 2,
                rejected: 2
            }
        );
    }

    #[tokio::test]
    async fn test_seed_with_unknown_status_fails() {
        let file: ReplayFile = serde_json::from_value(json!({
            "contacts": [{ "id": uuid::Uuid::new_v4(), "name": "Frances", "status": "vip" }],
            "events": []
        }))
        .unwrap();
        let command = ReplayCommand::new(PathBuf::from("unused.json"), 8);
        assert!(command.run(file).await.is_err());
    }
}

//! List/create/update/delete commands shared by every entity type.

use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use clap::Subcommand;
use colored::Colorize;
use serde_json::Value;

use dockyard_admin::ListEditor;
use dockyard_core::{Entity, EntityId, Record};
use dockyard_http::RestGateway;

use crate::output;
use crate::session::{Context, LogAlerter, TerminalConfirmer};

#[derive(Subcommand, Debug)]
pub enum EntityCommand {
    /// List all records
    List {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Print one summary line per record instead of JSON
        #[arg(long, conflicts_with = "pretty")]
        short: bool,
    },

    /// Create a record from a JSON object of fields
    Create {
        /// Field values, e.g. '{"name": "Acme"}'
        #[arg(long)]
        json: String,
    },

    /// Update a record; fields not given keep their current value
    Update {
        /// Record id
        id: String,

        /// Field values to change, as a JSON object
        #[arg(long)]
        json: String,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

type Editor<E> = ListEditor<E, RestGateway<E>>;

fn editor<E: Entity>(ctx: &Context, force: bool) -> Editor<E> {
    ListEditor::new(
        ctx.client.gateway::<E>(),
        Arc::new(LogAlerter),
        Arc::new(TerminalConfirmer::new(force)),
    )
}

fn parse_object(json: &str) -> Result<serde_json::Map<String, Value>> {
    match serde_json::from_str(json).context("Invalid JSON")? {
        Value::Object(map) => Ok(map),
        _ => bail!("Expected a JSON object of fields"),
    }
}

/// Overlay `changes` on the fields of `base`.
fn merge_fields<E: Entity>(base: &E, changes: serde_json::Map<String, Value>) -> Result<E> {
    let mut value = serde_json::to_value(base)?;
    if let Value::Object(fields) = &mut value {
        fields.extend(changes);
    }
    serde_json::from_value(value).with_context(|| format!("Invalid {} fields", E::LABEL))
}

fn find<'a, E: Entity>(records: &'a [Record<E>], id: &EntityId) -> Result<&'a Record<E>> {
    records
        .iter()
        .find(|r| &r.id == id)
        .with_context(|| format!("No {} with id {}", E::LABEL, id))
}

pub async fn run<E: Entity>(ctx: &Context, cmd: EntityCommand) -> Result<()> {
    ctx.require_session()?;

    let force = matches!(cmd, EntityCommand::Delete { force: true, .. });
    let mut editor = editor::<E>(ctx, force);
    editor
        .mount()
        .await
        .with_context(|| format!("Failed to load {} list", E::LABEL))?;

    match cmd {
        EntityCommand::List { pretty, short } => {
            if editor.records().is_empty() {
                output::note(&format!("No {} records found.", E::LABEL));
                return Ok(());
            }
            for record in editor.records() {
                if short {
                    println!("{}", record.summary());
                } else if pretty {
                    output::json_pretty(record)?;
                } else {
                    output::json(record)?;
                }
            }
        }

        EntityCommand::Create { json } => {
            let draft = merge_fields(&E::default(), parse_object(&json)?)?;

            editor.open_create();
            if let Some(slot) = editor.draft_mut() {
                *slot = draft;
            }
            editor
                .save()
                .await
                .with_context(|| format!("Failed to create {}", E::LABEL))?;

            output::success(&format!("Created {}", E::LABEL));
            output::field("Records", &editor.records().len().to_string());
        }

        EntityCommand::Update { id, json } => {
            let id = EntityId::new(id)?;
            let record = find(editor.records(), &id)?.clone();
            let draft = merge_fields(&record.fields, parse_object(&json)?)?;

            if draft == record.fields {
                output::note("Nothing to change.");
                return Ok(());
            }

            editor.open_edit(&record);
            if let Some(slot) = editor.draft_mut() {
                *slot = draft;
            }
            editor
                .save()
                .await
                .with_context(|| format!("Failed to update {} {}", E::LABEL, id))?;

            output::success(&format!("Updated {} {}", E::LABEL, id));
        }

        EntityCommand::Delete { id, .. } => {
            let id = EntityId::new(id)?;
            let record = find(editor.records(), &id)?.clone();

            let deleted = editor
                .delete(&record)
                .await
                .with_context(|| format!("Failed to delete {} {}", E::LABEL, id))?;

            if deleted {
                output::success(&format!("Deleted {} {}", E::LABEL, record.summary().bold()));
            } else {
                eprintln!("Aborted.");
            }
        }
    }

    Ok(())
}

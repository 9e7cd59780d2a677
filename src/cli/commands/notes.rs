use serde_json::json;

use crate::cli::client::NotesClient;
use crate::cli::utils::{output_created, output_notes, output_success};
use crate::cli::OutputFormat;
use crate::database::models::NotePatch;

pub async fn list(
    client: &NotesClient,
    search: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let notes = client.list(search.as_deref()).await?;
    output_notes(&output_format, &notes)
}

pub async fn add(
    client: &NotesClient,
    title: String,
    content: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let note = client
        .create(&title, content.as_deref().unwrap_or_default())
        .await?;
    output_created(&output_format, &note)
}

pub async fn update(
    client: &NotesClient,
    id: String,
    patch: NotePatch,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to update: pass --title, --content or --completed");
    }

    client.update(&id, &patch).await?;
    output_success(
        &output_format,
        &format!("Updated note {}", id),
        Some(json!({ "id": id, "changes": patch })),
    )
}

pub async fn done(client: &NotesClient, id: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let patch = NotePatch {
        completed: Some(true),
        ..NotePatch::default()
    };

    client.update(&id, &patch).await?;
    output_success(
        &output_format,
        &format!("Marked note {} as done", id),
        Some(json!({ "id": id })),
    )
}

pub async fn delete(client: &NotesClient, id: String, output_format: OutputFormat) -> anyhow::Result<()> {
    client.delete(&id).await?;
    output_success(
        &output_format,
        &format!("Deleted note {}", id),
        Some(json!({ "id": id })),
    )
}

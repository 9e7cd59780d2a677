use crate::cli::client::NotesClient;
use crate::cli::utils::print_json;
use crate::cli::OutputFormat;

pub async fn health(client: &NotesClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let payload = client.health().await?;

    match output_format {
        OutputFormat::Json => print_json(&payload)?,
        OutputFormat::Text => {
            let status = payload.get("status").and_then(|v| v.as_str()).unwrap_or("unknown");
            let database = payload.get("database").and_then(|v| v.as_str()).unwrap_or("unknown");
            println!("{}: {} (database: {})", client.base_url(), status, database);
        }
    }
    Ok(())
}

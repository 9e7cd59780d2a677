use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::{Note, NoteSummary};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            print_json(&response)?;
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a note listing in the appropriate format
pub fn output_notes(output_format: &OutputFormat, notes: &[NoteSummary]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&notes)?,
        OutputFormat::Text => {
            if notes.is_empty() {
                println!("No notes found");
            }
            for note in notes {
                println!("{}", note_line(note));
            }
        }
    }
    Ok(())
}

/// Output a freshly created note in the appropriate format
pub fn output_created(output_format: &OutputFormat, note: &Note) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(note),
        OutputFormat::Text => {
            println!("✓ Created note {}", note.id);
            println!("{}", note_line(&NoteSummary::from(note.clone())));
            Ok(())
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `[x] <id>  <title>` plus an indented content line when there is content.
pub fn note_line(note: &NoteSummary) -> String {
    let mark = if note.completed { "x" } else { " " };
    let title = if note.title.is_empty() { "(untitled)" } else { note.title.as_str() };

    let mut line = format!("[{}] {}  {}", mark, note.id, title);
    if !note.content.is_empty() {
        line.push_str("\n    ");
        line.push_str(&note.content.replace('\n', "\n    "));
    }
    line
}

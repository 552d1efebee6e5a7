use std::io::{self, Write};

use anyhow::{Context, Result};
use weather_core::{DisplayFields, Presentation};

/// Multi-line text for a presentation, as shown in the terminal.
pub fn render_text(presentation: &Presentation) -> String {
    match presentation {
        Presentation::Weather(fields) => render_fields(fields),
        Presentation::Error(msg) => format!("❌ {msg}"),
    }
}

fn render_fields(fields: &DisplayFields) -> String {
    let mut lines = Vec::with_capacity(5);
    if let Some(location) = &fields.location {
        lines.push(format!("📍 {location}"));
    }
    lines.push(fields.summary_line());
    lines.push(fields.emoji.to_string());
    lines.push(fields.description.clone());
    lines.push(fields.sun_line());
    lines.join("\n")
}

pub fn render_json(presentation: &Presentation) -> Result<String> {
    let value = match presentation {
        Presentation::Weather(fields) => serde_json::to_value(fields),
        Presentation::Error(msg) => Ok(serde_json::json!({ "error": msg })),
    }
    .context("Failed to serialize weather output")?;

    serde_json::to_string_pretty(&value).context("Failed to serialize weather output")
}

pub fn print_presentation(presentation: &Presentation, json: bool) -> Result<()> {
    let text = if json {
        render_json(presentation)?
    } else {
        render_text(presentation)
    };

    let mut out = io::stdout().lock();
    writeln!(out, "{text}").context("Failed to write to stdout")?;
    Ok(())
}

//! Prompt templates and context rendering for the summarizer
//!
//! Payloads are rendered as JSON so the model sees exactly the fields the
//! caller gets back in `details`.

use domain::{DigestBag, SourceKind};

use crate::error::ApplicationError;

/// Sources the entity extraction pass reads, in prompt order
const EXTRACTION_SOURCES: [SourceKind; 3] =
    [SourceKind::Calendar, SourceKind::Emails, SourceKind::Todos];

/// Section headings for the final digest prompt, in prompt order
const DIGEST_SECTIONS: [(SourceKind, &str); 6] = [
    (SourceKind::Emails, "EMAILS:"),
    (SourceKind::Calendar, "CALENDAR EVENTS:"),
    (SourceKind::News, "NEWS:"),
    (SourceKind::Weather, "WEATHER:"),
    (SourceKind::Traffic, "TRAFFIC:"),
    (SourceKind::Todos, "TODOS:"),
];

const EXTRACTION_INSTRUCTIONS: &str = "\
You are a personal assistant reading the user's calendar events, emails and to-do items. \
Identify two things.

First, any specific places that are mentioned. Collect them into a list, for example \
[\"New York\", \"San Francisco\", \"San Jose\"].

Second, any trips the user is likely to drive. A trip is an origin and destination pair. \
From \"Home: San Francisco, I'm driving to San Jose to visit family.\" you would extract \
[[\"San Francisco\", \"San Jose\"]].

Return the result as a JSON object with \"locations\" and/or \"trips\" as keys, for example \
{\"locations\": [\"New York\", \"San Francisco\"], \"trips\": [[\"San Francisco\", \"San Jose\"]]}. \
If nothing is found, return {}. \
Respond with only the raw JSON object, without code block formatting, language tags or extra text.

Here is the context:

";

const DIGEST_INSTRUCTIONS: &str = "\
You are a personal assistant helping to create a daily digest.

Based on the following information, create a concise, actionable summary that highlights:
1. Urgent emails that need responses
2. Important calendar events today
3. Critical news that might affect the user
4. Weather considerations for the day
5. Traffic alerts or considerations
6. Top priority todos

Feel free to make inferences about what is most relevant to the user. \
Do not include anything that is not relevant to the user.

Here's the data:

";

const DIGEST_CLOSING: &str = "\n\nPlease provide a well-organized summary with clear action items \
and priorities. Use bullet points and be concise.";

/// Calendar, email and todo payloads, one JSON document per line
///
/// Empty when none of those sources are in the bag.
pub fn render_extraction_context(bag: &DigestBag) -> Result<String, ApplicationError> {
    let mut parts = Vec::with_capacity(EXTRACTION_SOURCES.len());
    for kind in EXTRACTION_SOURCES {
        if let Some(data) = bag.get(kind) {
            parts.push(to_json(data, false)?);
        }
    }
    Ok(parts.join("\n"))
}

/// Labeled sections for every source present in the bag
pub fn render_digest_context(bag: &DigestBag) -> Result<String, ApplicationError> {
    let mut parts = Vec::with_capacity(DIGEST_SECTIONS.len());
    for (kind, heading) in DIGEST_SECTIONS {
        if let Some(data) = bag.get(kind) {
            let separator = if parts.is_empty() { "" } else { "\n" };
            parts.push(format!("{separator}{heading}\n{}", to_json(data, true)?));
        }
    }
    Ok(parts.join("\n"))
}

/// Prompt asking for places and trips as JSON
#[must_use]
pub fn extraction_prompt(context: &str) -> String {
    format!("{EXTRACTION_INSTRUCTIONS}{context}")
}

/// Prompt asking for the final bulleted digest
#[must_use]
pub fn digest_prompt(context: &str) -> String {
    format!("{DIGEST_INSTRUCTIONS}{context}{DIGEST_CLOSING}")
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, ApplicationError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| ApplicationError::Internal(format!("failed to render context: {e}")))
}

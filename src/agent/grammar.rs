//! The tool-call grammar a generator reply must follow.
//!
//! To request a tool, a reply embeds exactly one JSON object of the form
//! `{"tool_name": "calculator", "tool_input": "2+2"}` inside a json-tagged
//! code fence. The recognizer is strict about the payload shape but lenient about
//! everything else: an absent fence means the reply is a plain answer, and
//! a broken fence degrades to the text preceding it. That fallback is
//! policy, applied by the caller, not an accident of pattern matching.

use serde::Deserialize;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// A generator reply, recognized against the tool-call grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// No tool-call fence present; the whole text is the answer.
    Plain(String),
    /// A well-formed tool request, with the text preceding the fence kept
    /// for fallback messages.
    ToolRequest {
        name: String,
        input: String,
        preamble: String,
    },
    /// A fence was present but its payload did not match the grammar.
    Malformed { preamble: String },
}

/// The exact payload shape: `tool_name` is required, `tool_input` may be
/// absent (the caller treats an absent input the same as an empty one).
#[derive(Deserialize)]
struct ToolRequestPayload {
    tool_name: String,
    #[serde(default)]
    tool_input: Option<String>,
}

/// Recognize a raw generator reply.
///
/// At most one fenced object is honored: the first. Text after the fence
/// is discarded. Pure: parsing the same text twice yields the same value.
pub fn parse_reply(raw: &str) -> Reply {
    let Some(open) = raw.find(FENCE_OPEN) else {
        return Reply::Plain(raw.trim().to_string());
    };

    let preamble = raw[..open].trim().to_string();
    let rest = &raw[open + FENCE_OPEN.len()..];

    let Some(close) = rest.find(FENCE_CLOSE) else {
        return Reply::Malformed { preamble };
    };

    let payload = rest[..close].trim();
    match serde_json::from_str::<ToolRequestPayload>(payload) {
        Ok(request) => Reply::ToolRequest {
            name: request.tool_name,
            input: request.tool_input.unwrap_or_default(),
            preamble,
        },
        Err(_) => Reply::Malformed { preamble },
    }
}

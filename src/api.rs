//! Read-only HTTP client for the note-storage-and-search service.
//!
//! The subsystem consumes exactly three endpoints: suggestion search, the
//! full link graph, and single-note lookup. Payload parsing is permissive:
//! a shape the service does not send decodes to an empty value, never an
//! error out of the client.

use serde::Deserialize;
use thiserror::Error;

/// Path prefix the note service is mounted under.
pub const DEFAULT_API_BASE: &str = "/api";

/// Failures crossing the HTTP boundary. Every caller degrades these to an
/// empty batch or an empty view plus a notification; none are fatal.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("unexpected status {0}")]
	Status(reqwest::StatusCode),
}

/// A note as served by `GET {base}/notes/{id}`. The storage service owns
/// these; we only ever read a cached copy into the editor.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Note {
	pub id: i64,
	pub title: String,
	#[serde(default)]
	pub content: String,
	#[serde(default)]
	pub updated_at: Option<String>,
}

/// One autocomplete candidate. A batch is ephemeral: the next query
/// replaces it wholesale, batches are never merged.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Suggestion {
	pub id: i64,
	pub title: String,
	#[serde(default)]
	pub content: String,
}

impl Suggestion {
	/// First 100 characters of the note body, for the dropdown preview line.
	pub fn preview(&self) -> String {
		let mut out: String = self.content.chars().take(100).collect();
		if self.content.chars().count() > 100 {
			out.push('…');
		}
		out
	}
}

/// Wire shape of `GET {base}/graph/`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawGraph {
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	#[serde(default)]
	pub links: Vec<RawLink>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawNode {
	pub id: i64,
	#[serde(default)]
	pub title: String,
	/// Degree as reported by the service. Ignored downstream: counts are
	/// recomputed from the link set at adapt time, since the payload has
	/// been observed stale relative to its own links.
	#[serde(default)]
	pub connections: u32,
	#[serde(default)]
	pub created: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RawLink {
	pub source: i64,
	pub target: i64,
	#[serde(default = "default_strength")]
	pub strength: f64,
}

fn default_strength() -> f64 {
	1.0
}

/// The search endpoint has been seen returning a bare array, a
/// `{"suggestions": [...]}` wrapper and a `{"notes": [...]}` wrapper.
/// Accept all three; anything else is an empty batch.
fn parse_suggestions(value: serde_json::Value) -> Vec<Suggestion> {
	let items = match value {
		serde_json::Value::Array(items) => serde_json::Value::Array(items),
		serde_json::Value::Object(mut map) => map
			.remove("suggestions")
			.or_else(|| map.remove("notes"))
			.unwrap_or_else(|| serde_json::Value::Array(Vec::new())),
		_ => return Vec::new(),
	};
	serde_json::from_value(items).unwrap_or_default()
}

/// Thin client over the three consumed endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
	http: reqwest::Client,
	base: String,
}

impl ApiClient {
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			http: reqwest::Client::new(),
			base: base.into(),
		}
	}

	/// Builds a client against the current page's origin. reqwest wants
	/// absolute URLs even where fetch would take a relative one.
	pub fn from_window() -> Self {
		let origin = web_sys::window()
			.map(|w| w.location())
			.and_then(|l| l.origin().ok())
			.unwrap_or_default();
		Self::new(format!("{origin}{DEFAULT_API_BASE}"))
	}

	/// `GET {base}/search?q=<text>&limit=<n>`.
	pub async fn search(&self, text: &str, limit: usize) -> Result<Vec<Suggestion>, ApiError> {
		let resp = self
			.http
			.get(format!("{}/search", self.base))
			.query(&[("q", text), ("limit", &limit.to_string())])
			.send()
			.await?;
		if !resp.status().is_success() {
			return Err(ApiError::Status(resp.status()));
		}
		Ok(parse_suggestions(resp.json().await?))
	}

	/// `GET {base}/graph/`.
	pub async fn graph(&self) -> Result<RawGraph, ApiError> {
		let resp = self.http.get(format!("{}/graph/", self.base)).send().await?;
		if !resp.status().is_success() {
			return Err(ApiError::Status(resp.status()));
		}
		Ok(resp.json().await?)
	}

	/// `GET {base}/notes/{id}`.
	pub async fn note(&self, id: i64) -> Result<Note, ApiError> {
		let resp = self
			.http
			.get(format!("{}/notes/{id}", self.base))
			.send()
			.await?;
		if !resp.status().is_success() {
			return Err(ApiError::Status(resp.status()));
		}
		Ok(resp.json().await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn suggestions_accept_bare_array() {
		let batch = parse_suggestions(json!([
			{"id": 1, "title": "Alpha", "content": "first"},
			{"id": 2, "title": "Beta"}
		]));
		assert_eq!(batch.len(), 2);
		assert_eq!(batch[0].title, "Alpha");
		assert_eq!(batch[1].content, "");
	}

	#[test]
	fn suggestions_accept_wrapped_shapes() {
		let wrapped = parse_suggestions(json!({"suggestions": [{"id": 3, "title": "C"}]}));
		assert_eq!(wrapped.len(), 1);

		let notes = parse_suggestions(json!({"notes": [{"id": 4, "title": "D"}]}));
		assert_eq!(notes.len(), 1);
		assert_eq!(notes[0].id, 4);
	}

	#[test]
	fn suggestions_absent_key_is_empty_not_error() {
		assert!(parse_suggestions(json!({})).is_empty());
		assert!(parse_suggestions(json!({"total": 7})).is_empty());
		assert!(parse_suggestions(json!(null)).is_empty());
		assert!(parse_suggestions(json!("nope")).is_empty());
	}

	#[test]
	fn graph_payload_defaults_strength_to_one() {
		let raw: RawGraph = serde_json::from_value(json!({
			"nodes": [{"id": 1, "title": "A", "connections": 0, "created": "2024-01-01"}],
			"links": [{"source": 1, "target": 1}]
		}))
		.unwrap();
		assert_eq!(raw.links[0].strength, 1.0);
		assert_eq!(raw.nodes[0].created.as_deref(), Some("2024-01-01"));
	}

	#[test]
	fn graph_payload_tolerates_missing_sections() {
		let raw: RawGraph = serde_json::from_value(json!({})).unwrap();
		assert!(raw.nodes.is_empty());
		assert!(raw.links.is_empty());
	}

	#[test]
	fn preview_truncates_long_content() {
		let s = Suggestion {
			id: 1,
			title: "T".into(),
			content: "x".repeat(150),
		};
		assert_eq!(s.preview().chars().count(), 101);
		let short = Suggestion {
			id: 2,
			title: "U".into(),
			content: "brief".into(),
		};
		assert_eq!(short.preview(), "brief");
	}
}

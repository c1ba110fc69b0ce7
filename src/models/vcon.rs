use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::field::VconField;
use crate::error::VconError;
use crate::parsers::deserializers::{deserialize_null_default, parse_timestamp};

const DIALOG_TYPE_TRANSCRIPT: &str = "transcript";
const ANALYSIS_TYPE_SUMMARY: &str = "summary";

/// Opaque attachment object, carried through untouched.
pub type Attachment = Map<String, Value>;

/// A participant in the conversation.
///
/// Entries keep the source object as-is: explicit nulls and identifiers of
/// any JSON type serialize back unchanged. Typed views are accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Party(pub Map<String, Value>);

impl Party {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn name(&self) -> Option<Cow<'_, str>> {
        identifier(&self.0, "name")
    }

    pub fn email(&self) -> Option<Cow<'_, str>> {
        identifier(&self.0, "email")
    }

    pub fn tel(&self) -> Option<Cow<'_, str>> {
        identifier(&self.0, "tel")
    }

    /// First non-empty identifier, checked in name, email, tel order
    pub fn display_name(&self) -> Option<Cow<'_, str>> {
        self.name().or_else(|| self.email()).or_else(|| self.tel())
    }
}

/// One recorded segment of the conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dialog(pub Map<String, Value>);

impl Dialog {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Recording URL; empty strings count as absent
    pub fn url(&self) -> Option<&str> {
        non_empty_str(&self.0, "url")
    }

    pub fn dialog_type(&self) -> Option<&str> {
        non_empty_str(&self.0, "type")
    }

    /// Body value, `None` when absent or `null`
    pub fn body(&self) -> Option<&Value> {
        present(&self.0, "body")
    }

    pub fn is_transcript(&self) -> bool {
        self.dialog_type() == Some(DIALOG_TYPE_TRANSCRIPT)
    }

    /// Duration in seconds of the entry at `index` in its dialog list
    ///
    /// # Errors
    ///
    /// [`VconError::MissingDuration`] when the key is absent or `null`,
    /// [`VconError::InvalidDuration`] when it holds anything but a number.
    pub fn duration_secs(&self, index: usize) -> Result<f64, VconError> {
        match present(&self.0, "duration") {
            None => Err(VconError::MissingDuration { index }),
            Some(Value::Number(seconds)) => {
                seconds.as_f64().ok_or(VconError::InvalidDuration { index })
            }
            Some(_) => Err(VconError::InvalidDuration { index }),
        }
    }
}

/// A derived annotation such as a generated summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Analysis(pub Map<String, Value>);

impl Analysis {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn analysis_type(&self) -> Option<&str> {
        non_empty_str(&self.0, "type")
    }

    /// Body value, `None` when absent or `null`
    pub fn body(&self) -> Option<&Value> {
        present(&self.0, "body")
    }

    pub fn vendor(&self) -> Option<&str> {
        non_empty_str(&self.0, "vendor")
    }

    pub fn is_summary(&self) -> bool {
        self.analysis_type() == Some(ANALYSIS_TYPE_SUMMARY)
    }
}

/// A vCon conversation record.
///
/// Equality and hashing are defined over the serialized form returned by
/// [`Vcon::to_value`], so two records compare equal exactly when they would
/// produce the same JSON document. Top-level keys outside the seven modeled
/// fields are dropped when a record is built from JSON; keys nested inside
/// parties, dialog, attachments and analysis entries are preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vcon {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub dialog: Vec<Dialog>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub parties: Vec<Party>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub analysis: Vec<Analysis>,
}

impl Vcon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dialog(&mut self, dialog: Dialog) {
        self.dialog.push(dialog);
    }

    pub fn add_party(&mut self, party: Party) {
        self.parties.push(party);
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn add_analysis(&mut self, analysis: Analysis) {
        self.analysis.push(analysis);
    }

    /// Build a record from a JSON object, defaulting every missing field
    ///
    /// # Errors
    ///
    /// Returns [`VconError::Json`] if the value is not an object or a present
    /// field has an incompatible shape (e.g. `dialog` is not an array).
    pub fn from_value(value: Value) -> Result<Self, VconError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a record from JSON text
    pub fn from_json(text: &str) -> Result<Self, VconError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Project the record into a JSON object that always carries all seven fields
    pub fn to_value(&self) -> Value {
        json!({
            "uuid": self.uuid,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
            "dialog": self.dialog,
            "parties": self.parties,
            "attachments": self.attachments,
            "analysis": self.analysis,
        })
    }

    /// Compact JSON with keys in sorted order
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", self.to_value())
    }

    /// `created_at` parsed into a UTC timestamp, if it is in a recognised format
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn updated_at_time(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }

    /// Display names of the parties; parties with no name, email or tel are skipped
    ///
    /// Numeric identifiers (a `tel` stored as a number) are rendered as text.
    pub fn party_names(&self) -> Vec<Cow<'_, str>> {
        self.parties.iter().filter_map(Party::display_name).collect()
    }

    /// Recording URLs in dialog order; missing and empty URLs are skipped
    pub fn dialog_urls(&self) -> Vec<&str> {
        self.dialog.iter().filter_map(Dialog::url).collect()
    }

    /// Body of the first analysis entry of type `summary`
    ///
    /// Only the first matching entry is considered, even when it carries no body.
    pub fn summary(&self) -> Option<String> {
        self.analysis.iter().find(|a| a.is_summary())?.body().map(body_text)
    }

    pub fn has_summary(&self) -> bool {
        self.summary().is_some()
    }

    /// Total dialog duration in seconds
    ///
    /// # Errors
    ///
    /// Returns [`VconError::MissingDuration`] for the first dialog entry without
    /// a duration and [`VconError::InvalidDuration`] for one whose duration is
    /// not a number; no entry is ever counted as zero.
    pub fn duration(&self) -> Result<f64, VconError> {
        self.dialog
            .iter()
            .enumerate()
            .try_fold(0.0, |total, (index, dialog)| Ok(total + dialog.duration_secs(index)?))
    }

    /// Bodies of all transcript dialog entries, joined without a separator
    pub fn transcript(&self) -> String {
        let mut transcript = String::new();
        for dialog in self.dialog.iter().filter(|d| d.is_transcript()) {
            if let Some(body) = dialog.body() {
                transcript.push_str(&body_text(body));
            }
        }
        transcript
    }

    /// Serialized value of a single top-level field
    pub fn get(&self, field: VconField) -> Value {
        match field {
            VconField::Uuid => json!(self.uuid),
            VconField::CreatedAt => json!(self.created_at),
            VconField::UpdatedAt => json!(self.updated_at),
            VconField::Dialog => json!(self.dialog),
            VconField::Parties => json!(self.parties),
            VconField::Attachments => json!(self.attachments),
            VconField::Analysis => json!(self.analysis),
        }
    }

    /// Replace a top-level field from a JSON value; `null` resets it
    ///
    /// # Errors
    ///
    /// Returns [`VconError::FieldShape`] if the value cannot be decoded into the
    /// field's type. The record is left unchanged in that case.
    pub fn set(&mut self, field: VconField, value: Value) -> Result<(), VconError> {
        match field {
            VconField::Uuid => self.uuid = decode_field(field, value)?,
            VconField::CreatedAt => self.created_at = decode_field(field, value)?,
            VconField::UpdatedAt => self.updated_at = decode_field(field, value)?,
            VconField::Dialog => self.dialog = decode_field(field, value)?,
            VconField::Parties => self.parties = decode_field(field, value)?,
            VconField::Attachments => self.attachments = decode_field(field, value)?,
            VconField::Analysis => self.analysis = decode_field(field, value)?,
        }
        Ok(())
    }

    /// Reset a top-level field to its empty default
    pub fn clear(&mut self, field: VconField) {
        match field {
            VconField::Uuid => self.uuid = None,
            VconField::CreatedAt => self.created_at = None,
            VconField::UpdatedAt => self.updated_at = None,
            VconField::Dialog => self.dialog.clear(),
            VconField::Parties => self.parties.clear(),
            VconField::Attachments => self.attachments.clear(),
            VconField::Analysis => self.analysis.clear(),
        }
    }

    /// Iterate `(field, value)` pairs of the serialized form in a fixed order
    pub fn fields(&self) -> impl Iterator<Item = (VconField, Value)> + '_ {
        VconField::ALL.iter().map(move |field| (*field, self.get(*field)))
    }
}

impl PartialEq for Vcon {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl Eq for Vcon {}

impl Hash for Vcon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Object keys serialize in sorted order, so this is canonical
        self.to_json().hash(state);
    }
}

impl fmt::Display for Vcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Text form of a body value: strings verbatim, anything else as compact JSON
pub fn body_text(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Value under `key` unless it is absent or `null`
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str).filter(|text| !text.is_empty())
}

/// Party identifier as text: non-empty strings borrowed, numbers formatted
fn identifier<'a>(object: &'a Map<String, Value>, key: &str) -> Option<Cow<'a, str>> {
    match object.get(key)? {
        Value::String(text) if !text.is_empty() => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        _ => None,
    }
}

fn decode_field<T>(field: VconField, value: Value) -> Result<T, VconError>
where
    T: DeserializeOwned + Default,
{
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|source| VconError::FieldShape { field, source })
}

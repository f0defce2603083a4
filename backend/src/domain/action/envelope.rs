//! The two-variant action envelope returned by every action.
//!
//! Wire shape:
//!
//! ```text
//! { "success": true,  "data": <T>, "message"?: "..." }
//! { "success": false, "error": { "message": "...", "code"?: "...", "details"?: {...} }, "message"?: "..." }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Failure payload carried inside [`ActionResult::Failure`].
///
/// # Examples
/// ```
/// use backend::domain::action::ActionError;
/// use serde_json::json;
///
/// let error = ActionError::new("name already used")
///     .with_code("DUPLICATE_NAME")
///     .with_detail("field", "name");
/// assert_eq!(
///     serde_json::to_value(&error).unwrap(),
///     json!({ "message": "name already used", "code": "DUPLICATE_NAME", "details": { "field": "name" } })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionError {
    #[schema(example = "A work named \"Screed\" already exists")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "DUPLICATE_NAME")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    details: Option<Map<String, Value>>,
}

impl ActionError {
    /// Error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Attach a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Replace the structured details.
    #[must_use]
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// Add a single detail entry.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Human-readable message safe to show to the caller.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Machine-readable code, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Structured details, if any.
    pub fn details(&self) -> Option<&Map<String, Value>> {
        self.details.as_ref()
    }
}

/// Outcome of an action: exactly one of success or failure.
///
/// Check the variant (or [`ActionResult::is_success`]) before reaching for
/// the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    /// The operation produced `data`.
    Success { data: T, message: Option<String> },
    /// The operation was refused or failed.
    Failure {
        error: ActionError,
        message: Option<String>,
    },
}

impl<T> ActionResult<T> {
    /// Success envelope around `data`.
    pub fn success(data: T) -> Self {
        Self::Success {
            data,
            message: None,
        }
    }

    /// Failure envelope around `error`.
    pub fn failure(error: ActionError) -> Self {
        Self::Failure {
            error,
            message: None,
        }
    }

    /// Attach the optional top-level message, consuming the envelope.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = Some(message.into());
        match self {
            Self::Success { data, .. } => Self::Success { data, message },
            Self::Failure { error, .. } => Self::Failure { error, message },
        }
    }

    /// The discriminant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Payload of a success envelope.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Error of a failure envelope.
    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Optional top-level message.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message.as_deref(),
        }
    }

    /// Convert into a standard `Result`, dropping the top-level message.
    pub fn into_result(self) -> Result<T, ActionError> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// Transform the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Success { data, message } => ActionResult::Success {
                data: f(data),
                message,
            },
            Self::Failure { error, message } => ActionResult::Failure { error, message },
        }
    }
}

/// Reasons a JSON value is not a well-formed envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeShapeError {
    /// Top-level value is not an object.
    #[error("envelope must be a JSON object")]
    NotAnObject,
    /// `success` is absent or not a boolean.
    #[error("envelope is missing the boolean `success` discriminant")]
    MissingDiscriminant,
    /// `success: true` without `data`.
    #[error("successful envelope is missing `data`")]
    MissingData,
    /// `success: false` without `error`.
    #[error("failed envelope is missing `error`")]
    MissingError,
    /// `message` is present but not a string.
    #[error("envelope `message` must be a string")]
    InvalidMessage,
    /// `data` or `error` did not deserialise into the expected type.
    #[error("envelope payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

impl<T: DeserializeOwned> ActionResult<T> {
    /// Parse an envelope, discriminating on `success` before touching
    /// `data` or `error`.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeShapeError> {
        let Value::Object(mut object) = value else {
            return Err(EnvelopeShapeError::NotAnObject);
        };
        let success = object
            .get("success")
            .and_then(Value::as_bool)
            .ok_or(EnvelopeShapeError::MissingDiscriminant)?;
        let message = match object.remove("message") {
            None | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message),
            Some(_) => return Err(EnvelopeShapeError::InvalidMessage),
        };

        if success {
            let data = object
                .remove("data")
                .ok_or(EnvelopeShapeError::MissingData)?;
            Ok(Self::Success {
                data: serde_json::from_value(data)?,
                message,
            })
        } else {
            let error = object
                .remove("error")
                .ok_or(EnvelopeShapeError::MissingError)?;
            Ok(Self::Failure {
                error: serde_json::from_value(error)?,
                message,
            })
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let message = self.message();
        let mut state =
            serializer.serialize_struct("ActionResult", 2 + usize::from(message.is_some()))?;
        match self {
            Self::Success { data, .. } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure { error, .. } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        match message {
            Some(message) => state.serialize_field("message", message)?,
            None => state.skip_field("message")?,
        }
        state.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ActionResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

/// Values an operation may return.
///
/// Plain data is wrapped in a success envelope; an [`ActionResult`] is
/// passed through untouched so operations can encode their own business
/// failures without being wrapped twice.
pub trait IntoActionResult {
    /// Payload type of the resulting envelope.
    type Data;

    /// Produce the envelope.
    fn into_action_result(self) -> ActionResult<Self::Data>;
}

impl<T> IntoActionResult for ActionResult<T> {
    type Data = T;

    fn into_action_result(self) -> ActionResult<T> {
        self
    }
}

/// Untyped results get a structural check: an object with a boolean
/// `success` plus `data` (when true) or an `error` object (when false) that
/// parses as an envelope passes through; anything else is data.
impl IntoActionResult for Value {
    type Data = Value;

    fn into_action_result(self) -> ActionResult<Value> {
        if is_envelope_shaped(&self) {
            if let Ok(envelope) = ActionResult::<Value>::from_value(self.clone()) {
                return envelope;
            }
        }
        ActionResult::success(self)
    }
}

fn is_envelope_shaped(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    match object.get("success").and_then(Value::as_bool) {
        Some(true) => object.contains_key("data"),
        Some(false) => object.get("error").is_some_and(Value::is_object),
        None => false,
    }
}

/// Declare types that are always plain action data.
///
/// This is the extension point for payload types defined outside this
/// crate: each listed type is wrapped as `{ "success": true, "data": ... }`
/// when an operation returns it.
///
/// # Examples
/// ```
/// use backend::domain::action::{ActionResult, IntoActionResult};
///
/// #[derive(Debug, PartialEq)]
/// struct Quote {
///     total_cents: i64,
/// }
///
/// backend::plain_action_data!(Quote);
///
/// let quote = Quote { total_cents: 12_500 };
/// assert_eq!(
///     quote.into_action_result(),
///     ActionResult::success(Quote { total_cents: 12_500 })
/// );
/// ```
#[macro_export]
macro_rules! plain_action_data {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::domain::action::IntoActionResult for $ty {
                type Data = $ty;

                fn into_action_result(self) -> $crate::domain::action::ActionResult<$ty> {
                    $crate::domain::action::ActionResult::success(self)
                }
            }
        )*
    };
}

macro_rules! generic_action_data {
    ($(<$($param:ident),+> $ty:ty),* $(,)?) => {
        $(
            impl<$($param),+> IntoActionResult for $ty {
                type Data = Self;

                fn into_action_result(self) -> ActionResult<Self> {
                    ActionResult::success(self)
                }
            }
        )*
    };
}

plain_action_data!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Map<String, Value>,
);

generic_action_data!(
    <T> Vec<T>,
    <T> Option<T>,
    <T> VecDeque<T>,
    <T> BTreeSet<T>,
    <T, S> HashSet<T, S>,
    <K, V> BTreeMap<K, V>,
    <K, V, S> HashMap<K, V, S>,
    <A> (A,),
    <A, B> (A, B),
    <A, B, C> (A, B, C),
    <A, B, C, D> (A, B, C, D),
    <A, B, C, D, E> (A, B, C, D, E),
    <A, B, C, D, E, F> (A, B, C, D, E, F),
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn success_serialises_without_absent_message() {
        let value = serde_json::to_value(ActionResult::success(3)).expect("serialise");
        assert_eq!(value, json!({ "success": true, "data": 3 }));
    }

    #[rstest]
    fn failure_serialises_with_message() {
        let envelope: ActionResult<()> =
            ActionResult::failure(ActionError::new("nope").with_code("FORBIDDEN"))
                .with_message("Ask an owner");
        let value = serde_json::to_value(envelope).expect("serialise");
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": { "message": "nope", "code": "FORBIDDEN" },
                "message": "Ask an owner",
            })
        );
    }

    #[rstest]
    fn unit_success_serialises_null_data() {
        let value = serde_json::to_value(ActionResult::success(())).expect("serialise");
        assert_eq!(value, json!({ "success": true, "data": null }));
    }

    #[rstest]
    #[case(json!([]), "NotAnObject")]
    #[case(json!({ "data": 1 }), "MissingDiscriminant")]
    #[case(json!({ "success": "yes", "data": 1 }), "MissingDiscriminant")]
    #[case(json!({ "success": true }), "MissingData")]
    #[case(json!({ "success": false }), "MissingError")]
    #[case(json!({ "success": true, "data": 1, "message": 5 }), "InvalidMessage")]
    #[case(json!({ "success": false, "error": { "code": "X" } }), "Payload")]
    fn from_value_rejects_malformed_shapes(#[case] value: Value, #[case] expected: &str) {
        let err = ActionResult::<Value>::from_value(value).expect_err("malformed");
        assert!(
            format!("{err:?}").starts_with(expected),
            "expected {expected}, got {err:?}"
        );
    }

    #[rstest]
    fn deserialises_typed_payload() {
        let envelope: ActionResult<Vec<u32>> =
            serde_json::from_value(json!({ "success": true, "data": [1, 2], "message": "ok" }))
                .expect("valid envelope");
        assert_eq!(envelope.data(), Some(&vec![1, 2]));
        assert_eq!(envelope.message(), Some("ok"));
    }

    #[rstest]
    fn json_envelope_passes_through_unchanged() {
        let raw = json!({ "success": false, "error": { "message": "x" } });
        let envelope = raw.clone().into_action_result();
        assert!(!envelope.is_success());
        assert_eq!(serde_json::to_value(&envelope).expect("serialise"), raw);
    }

    #[rstest]
    #[case(json!({ "success": true }))]
    #[case(json!({ "success": false, "error": "text" }))]
    #[case(json!({ "success": false, "error": { "code": "NO_MESSAGE" } }))]
    #[case(json!({ "ok": true, "data": 1 }))]
    #[case(json!(42))]
    fn non_envelope_json_is_wrapped_as_data(#[case] raw: Value) {
        let envelope = raw.clone().into_action_result();
        assert_eq!(envelope, ActionResult::success(raw));
    }

    #[rstest]
    fn tuples_and_maps_are_plain_data() {
        let pair = (2.5_f64, "m2".to_owned()).into_action_result();
        assert_eq!(
            serde_json::to_value(&pair).expect("serialise"),
            json!({ "success": true, "data": [2.5, "m2"] })
        );

        let totals = BTreeMap::from([("labour", 120_u32), ("materials", 80)]);
        assert_eq!(
            totals.clone().into_action_result(),
            ActionResult::success(totals)
        );

        let mut fields = Map::new();
        fields.insert("success".to_owned(), json!(false));
        fields.insert("error".to_owned(), json!({ "message": "x" }));
        assert_eq!(
            fields.clone().into_action_result(),
            ActionResult::success(fields)
        );
    }

    #[rstest]
    fn into_result_and_map_preserve_variants() {
        let doubled = ActionResult::success(21).map(|n| n * 2);
        assert_eq!(doubled.into_result(), Ok(42));

        let failed: ActionResult<i32> = ActionResult::failure(ActionError::new("no"));
        assert_eq!(
            failed.map(|n| n + 1).into_result(),
            Err(ActionError::new("no"))
        );
    }
}

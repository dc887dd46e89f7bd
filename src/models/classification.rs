//! Classification endpoint request and response shapes.

use super::EntityRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the request field carrying the email body.
pub const INPUT_FIELD: &str = "input_email_body";

/// Request payload for the classification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Raw email body.
    pub input_email_body: String,
}

impl ClassifyRequest {
    /// Extracts a request from an arbitrary JSON value.
    ///
    /// A non-object payload or an absent field is a `MissingField` error; a
    /// field of the wrong type is `InvalidInput`.
    pub fn from_value(payload: &Value) -> Result<Self> {
        let field = payload
            .as_object()
            .and_then(|object| object.get(INPUT_FIELD))
            .ok_or_else(|| Error::MissingField(INPUT_FIELD.to_string()))?;

        let body = field
            .as_str()
            .ok_or_else(|| Error::InvalidInput(format!("'{INPUT_FIELD}' must be a string")))?;

        Ok(Self {
            input_email_body: body.to_string(),
        })
    }
}

/// Response record for the classification endpoint.
///
/// Field order is a wire contract: serde serializes in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRecord {
    /// The email body exactly as received.
    pub input_email_body: String,
    /// Entities masked in detection order.
    pub list_of_masked_entities: Vec<EntityRecord>,
    /// The masked email body.
    pub masked_email: String,
    /// Category resolved by the classifier.
    pub category_of_the_email: String,
}

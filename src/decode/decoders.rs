//! Decoders for success and error documents

use super::types::{ErrorResponse, QueryResponse};
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use serde::de::DeserializeOwned;

/// Code reported when an error document carries none
const UNKNOWN_ERROR_CODE: &str = "Unknown";

/// Decode a successful response body into its result element
pub fn decode_response<R>(body: &str) -> Result<QueryResponse<R>>
where
    R: DeserializeOwned,
{
    quick_xml::de::from_str(body).map_err(|e| Error::xml(format!("invalid response document: {e}")))
}

/// Turn a non-success response into an error
///
/// Bodies that are not an `<ErrorResponse>` document become
/// [`Error::HttpStatus`] carrying the raw body.
pub fn parse_error_response(status: u16, body: &str) -> Error {
    if !body.trim_start().starts_with('<') {
        return Error::http_status(status, body);
    }

    match quick_xml::de::from_str::<ErrorResponse>(body) {
        Ok(doc) if doc.error.code.is_some() || doc.error.message.is_some() => {
            let code = doc
                .error
                .code
                .none_if_empty()
                .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string());
            let message = doc.error.message.unwrap_or_default();
            Error::api(code, message, status).with_request_id(doc.request_id.none_if_empty())
        }
        _ => Error::http_status(status, body),
    }
}

//! Query API document shapes

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

/// `<ResponseMetadata>` block of a successful response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponseMetadata {
    #[serde(rename = "RequestId")]
    pub request_id: Option<String>,
}

/// A decoded `<{Action}Response>` envelope
///
/// The result element is recognized by its `Result` suffix, so one type
/// serves every action.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse<R> {
    /// Contents of `<{Action}Result>`
    pub result: R,
    /// Request id reported by the service
    pub request_id: Option<String>,
}

impl<'de, R> Deserialize<'de> for QueryResponse<R>
where
    R: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EnvelopeVisitor<R>(PhantomData<R>);

        impl<'de, R> Visitor<'de> for EnvelopeVisitor<R>
        where
            R: Deserialize<'de>,
        {
            type Value = QueryResponse<R>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a Query API response envelope")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut result = None;
                let mut request_id = None;

                while let Some(key) = map.next_key::<String>()? {
                    if key == "ResponseMetadata" {
                        let metadata: ResponseMetadata = map.next_value()?;
                        request_id = metadata.request_id;
                    } else if key.ends_with("Result") && result.is_none() {
                        result = Some(map.next_value()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }

                let result = result.ok_or_else(|| de::Error::missing_field("{Action}Result"))?;
                Ok(QueryResponse { result, request_id })
            }
        }

        deserializer.deserialize_map(EnvelopeVisitor(PhantomData))
    }
}

/// `<ErrorResponse>` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: ErrorDetail,
    #[serde(rename = "RequestId")]
    pub request_id: Option<String>,
}

/// `<Error>` element of an error document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    /// "Sender" or "Receiver"
    #[serde(rename = "Type")]
    pub error_type: Option<String>,
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Message")]
    pub message: Option<String>,
}

//! Response decoder module
//!
//! # Overview
//!
//! The RDS Query API answers with XML: a `<{Action}Response>` envelope that
//! wraps one `<{Action}Result>` element and a `<ResponseMetadata>` block, or
//! an `<ErrorResponse>` document on failure. This module turns both into
//! Rust values using quick-xml's serde support.
//!
//! Repeated elements in RDS responses sit under a wrapper element
//! (`<TagList><Tag/>...</TagList>`). [`element_list!`] generates the
//! `deserialize_with` helpers that unwrap them into plain vectors so the
//! decoded records serialize to flat JSON arrays.

mod decoders;
mod types;

pub use decoders::{decode_response, parse_error_response};
pub use types::{ErrorDetail, ErrorResponse, QueryResponse, ResponseMetadata};

/// Generate a `deserialize_with` function that unwraps
/// `<Wrapper><Element/>...</Wrapper>` into a `Vec`
macro_rules! element_list {
    ($vis:vis fn $name:ident, $element:literal, $item:ty) => {
        $vis fn $name<'de, D>(deserializer: D) -> std::result::Result<Vec<$item>, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            #[derive(serde::Deserialize)]
            struct Wrapper {
                #[serde(rename = $element, default)]
                items: Vec<$item>,
            }
            let wrapper: Wrapper = serde::Deserialize::deserialize(deserializer)?;
            Ok(wrapper.items)
        }
    };
}

pub(crate) use element_list;

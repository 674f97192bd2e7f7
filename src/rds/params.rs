//! Query API request parameters
//!
//! RDS flattens structured input into form fields: lists become
//! `Prefix.member.N` or `Prefix.Element.N`, tags `Tags.Tag.N.Key`, filters
//! `Filters.Filter.N.Values.Value.M`. Indices start at 1.

use super::types::UserAuthConfig;
use super::API_VERSION;
use crate::error::{Error, Result};
use crate::pagination::Filter;
use crate::types::{QueryParams, Tag};

/// Form parameters for one Query API action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    action: &'static str,
    params: QueryParams,
}

impl QueryRequest {
    /// Start a request for `action` at the RDS API version
    pub fn new(action: &'static str) -> Self {
        let mut params = QueryParams::new();
        params.insert("Action".to_string(), action.to_string());
        params.insert("Version".to_string(), API_VERSION.to_string());
        Self { action, params }
    }

    /// Action name
    pub fn action(&self) -> &'static str {
        self.action
    }

    /// Encoded parameters
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Set a parameter
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.params.insert(name.into(), value.to_string());
    }

    /// Set a parameter when a value is present
    pub fn set_opt<V: ToString>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    /// Set `Prefix.member.N` for each value
    pub fn members(&mut self, prefix: &str, values: &[String]) {
        self.elements(prefix, "member", values);
    }

    /// Set `Prefix.Element.N` for lists with a named member element
    pub fn elements(&mut self, prefix: &str, element: &str, values: &[String]) {
        for (i, value) in values.iter().enumerate() {
            self.set(format!("{prefix}.{element}.{}", i + 1), value);
        }
    }

    /// Set `Tags.Tag.N.Key` and `Tags.Tag.N.Value`
    pub fn tags(&mut self, tags: &[Tag]) {
        for (i, tag) in tags.iter().enumerate() {
            let n = i + 1;
            self.set(format!("Tags.Tag.{n}.Key"), &tag.key);
            self.set(format!("Tags.Tag.{n}.Value"), &tag.value);
        }
    }

    /// Set `Filters.Filter.N.Name` and `Filters.Filter.N.Values.Value.M`
    pub fn filters(&mut self, filters: &[Filter]) {
        for (i, filter) in filters.iter().enumerate() {
            let n = i + 1;
            self.set(format!("Filters.Filter.{n}.Name"), &filter.name);
            for (j, value) in filter.values.iter().enumerate() {
                self.set(format!("Filters.Filter.{n}.Values.Value.{}", j + 1), value);
            }
        }
    }

    /// Set `Marker` and `MaxRecords`
    pub fn paging(&mut self, marker: Option<&str>, max_records: Option<u32>) {
        self.set_opt("Marker", marker.filter(|m| !m.is_empty()));
        self.set_opt("MaxRecords", max_records);
    }
}

/// Fail unless `value` is non-empty
pub fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_parameter(name, "is required"));
    }
    Ok(())
}

/// Fail unless `values` has at least one entry
pub fn require_any<T>(name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid_parameter(name, "needs at least one value"));
    }
    Ok(())
}

/// Parse `name=v1,v2` into a filter
pub fn parse_filter(raw: &str) -> Result<Filter> {
    let (name, values) = raw
        .split_once('=')
        .ok_or_else(|| Error::invalid_parameter("filter", format!("expected name=value, got '{raw}'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_parameter("filter", format!("missing name in '{raw}'")));
    }
    let values: Vec<String> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if values.is_empty() {
        return Err(Error::invalid_parameter("filter", format!("no values in '{raw}'")));
    }
    Ok(Filter::new(name, values))
}

/// Parse `key=value` into a tag
pub fn parse_tag(raw: &str) -> Result<Tag> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
    if key.trim().is_empty() {
        return Err(Error::invalid_parameter("tag", format!("missing key in '{raw}'")));
    }
    Ok(Tag::new(key.trim(), value.trim()))
}

/// Parse `AuthScheme=SECRETS,SecretArn=arn:...` into a proxy auth entry
pub fn parse_auth(raw: &str) -> Result<UserAuthConfig> {
    let mut auth = UserAuthConfig::default();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            Error::invalid_parameter("auth", format!("expected Key=Value, got '{pair}'"))
        })?;
        let value = Some(value.trim().to_string());
        match key.trim() {
            "Description" => auth.description = value,
            "UserName" => auth.user_name = value,
            "AuthScheme" => auth.auth_scheme = value,
            "SecretArn" => auth.secret_arn = value,
            "IAMAuth" => auth.iam_auth = value,
            "ClientPasswordAuthType" => auth.client_password_auth_type = value,
            other => {
                return Err(Error::invalid_parameter(
                    "auth",
                    format!("unknown key '{other}'"),
                ))
            }
        }
    }
    if auth == UserAuthConfig::default() {
        return Err(Error::invalid_parameter("auth", "empty auth entry"));
    }
    Ok(auth)
}

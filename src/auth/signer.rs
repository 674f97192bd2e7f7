//! AWS Signature Version 4
//!
//! Signs a built `reqwest::Request` in place:
//!
//! 1. Canonical request from method, path, sorted query, signed headers and
//!    the payload hash
//! 2. String to sign over the credential scope
//! 3. Signing key derived from the secret, date, region and service
//! 4. `Authorization` header carrying the signature
//!
//! Headers added by the client at send time (user agent, accept) are left
//! unsigned, which the service accepts.

use super::types::Credentials;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Request;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// RFC 3986 unreserved characters stay literal; everything else is escaped
const SIGV4_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Signs requests for one region and service
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
    region: String,
    service: String,
}

impl SigV4Signer {
    /// Create a signer
    pub fn new(
        credentials: Credentials,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Region requests are scoped to
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign `request` as of `timestamp`
    ///
    /// Adds `x-amz-date`, `x-amz-security-token` (temporary credentials) and
    /// `authorization`.
    pub fn sign(&self, request: &mut Request, timestamp: DateTime<Utc>) -> Result<()> {
        let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = timestamp.format("%Y%m%d").to_string();

        insert_header(request, "x-amz-date", &amz_date)?;
        if let Some(token) = &self.credentials.session_token {
            insert_header(request, "x-amz-security-token", token)?;
        }

        let mut headers = BTreeMap::new();
        for (name, value) in request.headers() {
            let value = value
                .to_str()
                .map_err(|_| Error::credentials(format!("header {name} is not printable")))?;
            headers.insert(name.as_str().to_string(), normalize_header_value(value));
        }
        headers.insert("host".to_string(), host_header(request.url())?);

        let payload = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .unwrap_or_default();
        let payload_hash = sha256_hex(payload);

        let canonical_request = canonical_request(
            request.method().as_str(),
            request.url(),
            &headers,
            &payload_hash,
        );
        let scope = format!(
            "{date_stamp}/{}/{}/aws4_request",
            self.region, self.service
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );
        let signing_key = self.signing_key(&date_stamp)?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");
        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key_id
        );
        let value = HeaderValue::from_str(&authorization)
            .map_err(|e| Error::credentials(format!("invalid authorization header: {e}")))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }

    /// kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
    pub(crate) fn signing_key(&self, date_stamp: &str) -> Result<Vec<u8>> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes())?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

/// Canonical request; `headers` keys must already be lowercase
pub(crate) fn canonical_request(
    method: &str,
    url: &Url,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> String {
    let path = match url.path() {
        "" => "/".to_string(),
        p => p
            .split('/')
            .map(uri_encode)
            .collect::<Vec<_>>()
            .join("/"),
    };

    let mut query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    query.sort();
    let query = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_headers: String = headers.iter().map(|(k, v)| format!("{k}:{v}\n")).collect();
    let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");

    format!("{method}\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}")
}

/// Percent-encode everything except RFC 3986 unreserved characters
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, SIGV4_ENCODE_SET).to_string()
}

/// Hex-encoded SHA-256
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::credentials(format!("invalid signing key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::config(format!("URL has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Trim and collapse runs of spaces
fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn insert_header(request: &mut Request, name: &'static str, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::credentials(format!("invalid {name} header: {e}")))?;
    request
        .headers_mut()
        .insert(HeaderName::from_static(name), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::CONTENT_TYPE;

    // Published IAM ListUsers example from the AWS SigV4 documentation
    const EXAMPLE_URL: &str = "https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08";
    const EXAMPLE_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
    const EXAMPLE_SIGNATURE: &str =
        "5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7";

    fn example_signer() -> SigV4Signer {
        SigV4Signer::new(
            Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
            "us-east-1",
            "iam",
        )
    }

    fn example_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2015-08-30T12:36:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn example_request() -> Request {
        reqwest::Client::new()
            .get(EXAMPLE_URL)
            .header(CONTENT_TYPE, EXAMPLE_CONTENT_TYPE)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_payload_hash() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_canonical_request_matches_example() {
        let url = Url::parse(EXAMPLE_URL).unwrap();
        let headers = BTreeMap::from([
            ("content-type".to_string(), EXAMPLE_CONTENT_TYPE.to_string()),
            ("host".to_string(), "iam.amazonaws.com".to_string()),
            ("x-amz-date".to_string(), "20150830T123600Z".to_string()),
        ]);
        let canonical = canonical_request("GET", &url, &headers, &sha256_hex(b""));

        assert_eq!(
            sha256_hex(canonical.as_bytes()),
            "f536975d06c0309214f805bb90ccff089219ecd68b2577efef23edd43b7e1a59"
        );
    }

    #[test]
    fn test_signing_key_matches_example() {
        let key = example_signer().signing_key("20150830").unwrap();
        assert_eq!(
            hex::encode(key),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }

    #[test]
    fn test_sign_matches_example() {
        let mut request = example_request();
        example_signer().sign(&mut request, example_time()).unwrap();

        let authorization = request.headers()[AUTHORIZATION].to_str().unwrap();
        assert_eq!(
            authorization,
            format!(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, \
                 SignedHeaders=content-type;host;x-amz-date, Signature={EXAMPLE_SIGNATURE}"
            )
        );
        assert_eq!(request.headers()["x-amz-date"], "20150830T123600Z");
    }

    #[test]
    fn test_session_token_is_signed() {
        let credentials = Credentials::new("AKIDEXAMPLE", "secret").with_session_token("token-1");
        let signer = SigV4Signer::new(credentials, "eu-west-1", "rds");
        let mut request = example_request();
        signer.sign(&mut request, example_time()).unwrap();

        assert_eq!(request.headers()["x-amz-security-token"], "token-1");
        let authorization = request.headers()[AUTHORIZATION].to_str().unwrap();
        assert!(authorization.contains("/20150830/eu-west-1/rds/aws4_request"));
        assert!(authorization.contains("SignedHeaders=content-type;host;x-amz-date;x-amz-security-token"));
    }

    #[test]
    fn test_body_changes_signature() {
        let signer = example_signer();
        let build = |body: &'static str| {
            let mut request = reqwest::Client::new()
                .post("https://rds.us-east-1.amazonaws.com/")
                .header(CONTENT_TYPE, EXAMPLE_CONTENT_TYPE)
                .body(body)
                .build()
                .unwrap();
            signer.sign(&mut request, example_time()).unwrap();
            request.headers()[AUTHORIZATION].clone()
        };

        assert_ne!(build("Action=DescribeDBInstances"), build("Action=DescribeDBClusters"));
    }

    #[test]
    fn test_host_includes_non_default_port() {
        let url = Url::parse("http://127.0.0.1:4566/").unwrap();
        assert_eq!(host_header(&url).unwrap(), "127.0.0.1:4566");
        let url = Url::parse("https://rds.us-east-1.amazonaws.com/").unwrap();
        assert_eq!(host_header(&url).unwrap(), "rds.us-east-1.amazonaws.com");
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("abcABC123-_.~"), "abcABC123-_.~");
        assert_eq!(uri_encode("hello world"), "hello%20world");
        assert_eq!(uri_encode("a/b=c"), "a%2Fb%3Dc");
        assert_eq!(uri_encode("2015-08-30T12:36:00Z"), "2015-08-30T12%3A36%3A00Z");
    }

    #[test]
    fn test_canonical_query_is_sorted() {
        let url = Url::parse("https://example.com/?Z=1&A=2&M=3").unwrap();
        let canonical = canonical_request("GET", &url, &BTreeMap::new(), "");
        assert_eq!(canonical.lines().nth(2), Some("A=2&M=3&Z=1"));
    }
}

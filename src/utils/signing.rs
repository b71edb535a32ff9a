// Copyright 2023 rust-dns-sdk authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use chrono::{DateTime, Utc};
use hex::encode as hex_encode;
use hmac::{Hmac, KeyInit, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, HOST};
use sha2::{Digest, Sha256};
use crate::error::Result;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Everything but the unreserved characters `A-Z a-z 0-9 - _ . ~`.
const SIGV4_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Static credentials used to sign requests.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Signature Version 4 context for one request.
#[derive(Clone)]
pub(crate) struct Authorization {
    /// Service name (route53)
    service: String,
    /// API endpoint host
    host: String,
    region: String,
    method: String,
    canonical_uri: String,
    canonical_query: String,
    payload: String,
    amz_date: String,
    date: String,
}

impl Authorization {
    /// Creates a signing context stamped with the current time.
    pub(crate) fn new(host: &str, region: &str) -> Self {
        Self::at(host, region, Utc::now())
    }

    pub(crate) fn at(host: &str, region: &str, now: DateTime<Utc>) -> Self {
        Self {
            service: "route53".to_string(),
            host: host.to_string(),
            region: region.to_string(),
            method: "GET".to_string(),
            canonical_uri: "/".to_string(),
            canonical_query: String::new(),
            payload: String::new(),
            amz_date: now.format("%Y%m%dT%H%M%SZ").to_string(),
            date: now.format("%Y%m%d").to_string(),
        }
    }

    pub(crate) fn method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    /// Sets the request path as sent on the wire.
    ///
    /// Every segment is encoded once more for the canonical request.
    pub(crate) fn uri(mut self, uri: &str) -> Self {
        self.canonical_uri = uri.split('/').map(uri_encode).collect::<Vec<_>>().join("/");
        self
    }

    /// Sets the query parameters; they are encoded and sorted here.
    pub(crate) fn query(mut self, params: &[(&str, String)]) -> Self {
        self.canonical_query = canonical_query(params);
        self
    }

    pub(crate) fn payload(mut self, payload: &str) -> Self {
        self.payload = payload.to_string();
        self
    }

    pub(crate) fn canonical_query_string(&self) -> &str {
        &self.canonical_query
    }

    fn sign(key: &[u8], msg: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(msg.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn sha256_hex(input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hex_encode(hasher.finalize())
    }

    fn signed_headers(session_token: Option<&str>) -> &'static str {
        if session_token.is_some() {
            "host;x-amz-date;x-amz-security-token"
        } else {
            "host;x-amz-date"
        }
    }

    fn credential_scope(&self) -> String {
        format!("{}/{}/{}/aws4_request", self.date, self.region, self.service)
    }

    fn generate_canonical_request(&self, session_token: Option<&str>) -> String {
        let mut canonical_headers = format!("host:{}\nx-amz-date:{}\n", self.host, self.amz_date);
        if let Some(token) = session_token {
            canonical_headers.push_str(&format!("x-amz-security-token:{}\n", token.trim()));
        }
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method,
            self.canonical_uri,
            self.canonical_query,
            canonical_headers,
            Self::signed_headers(session_token),
            Self::sha256_hex(&self.payload)
        )
    }

    fn generate_string_to_sign(&self, canonical_request: &str) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            self.amz_date,
            self.credential_scope(),
            Self::sha256_hex(canonical_request)
        )
    }

    fn calculate_signature(&self, string_to_sign: &str, secret_key: &str) -> String {
        let secret_date = Self::sign(format!("AWS4{}", secret_key).as_bytes(), &self.date);
        let secret_region = Self::sign(&secret_date, &self.region);
        let secret_service = Self::sign(&secret_region, &self.service);
        let secret_signing = Self::sign(&secret_service, "aws4_request");
        hex_encode(Self::sign(&secret_signing, string_to_sign))
    }

    fn generate_authorization_header(&self, credentials: &Credentials) -> String {
        let token = credentials.session_token.as_deref();
        let canonical_request = self.generate_canonical_request(token);
        let string_to_sign = self.generate_string_to_sign(&canonical_request);
        let signature = self.calculate_signature(&string_to_sign, &credentials.secret_access_key);
        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            credentials.access_key_id,
            self.credential_scope(),
            Self::signed_headers(token),
            signature
        )
    }

    /// Builds the signed request headers.
    pub(crate) fn build_request_headers(self, credentials: &Credentials) -> Result<HeaderMap> {
        let authorization_header = self.generate_authorization_header(credentials);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&authorization_header)?);
        headers.insert(HOST, HeaderValue::from_str(&self.host)?);
        headers.insert("X-Amz-Date", HeaderValue::from_str(&self.amz_date)?);
        if let Some(token) = &credentials.session_token {
            headers.insert("X-Amz-Security-Token", HeaderValue::from_str(token.trim())?);
        }
        Ok(headers)
    }
}

/// Percent-encodes everything outside the unreserved set, as SigV4 requires.
pub(crate) fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, SIGV4_ENCODE_SET).to_string()
}

fn canonical_query(params: &[(&str, String)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (uri_encode(key), uri_encode(value)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn credentials(token: Option<&str>) -> Credentials {
        Credentials {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
            session_token: token.map(str::to_string),
        }
    }

    fn context() -> Authorization {
        let now = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        Authorization::at("route53.amazonaws.com", "us-east-1", now)
            .method("GET")
            .uri("/2013-04-01/hostedzone")
    }

    #[test]
    fn authorization_header_names_scope_and_headers() {
        let headers = context().build_request_headers(&credentials(None)).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/route53/aws4_request, \
             SignedHeaders=host;x-amz-date, Signature="
        ));
        let signature = auth.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(headers.get("X-Amz-Date").unwrap(), "20150830T123600Z");
        assert_eq!(headers.get(HOST).unwrap(), "route53.amazonaws.com");
    }

    #[test]
    fn signature_is_deterministic_and_covers_the_payload() {
        let sig = |payload: &str| {
            context()
                .payload(payload)
                .build_request_headers(&credentials(None))
                .unwrap()
                .get(AUTHORIZATION)
                .unwrap()
                .to_str()
                .unwrap()
                .to_string()
        };
        assert_eq!(sig("<a/>"), sig("<a/>"));
        assert_ne!(sig("<a/>"), sig("<b/>"));
    }

    #[test]
    fn session_token_is_signed_and_sent() {
        let headers = context().build_request_headers(&credentials(Some("token"))).unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(auth.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
        assert_eq!(headers.get("X-Amz-Security-Token").unwrap(), "token");
    }

    #[test]
    fn query_is_encoded_and_sorted() {
        let auth = context().query(&[
            ("type", "A".to_string()),
            ("name", "www.example.com.".to_string()),
            ("maxitems", "10".to_string()),
        ]);
        assert_eq!(auth.canonical_query_string(), "maxitems=10&name=www.example.com.&type=A");
        assert_eq!(uri_encode("a b/c*"), "a%20b%2Fc%2A");
        assert_eq!(uri_encode("é~"), "%C3%A9~");
    }

    #[test]
    fn canonical_uri_encodes_wire_path_again() {
        let auth = context().uri("/2013-04-01/hostedzone/a%20b");
        assert_eq!(auth.canonical_uri, "/2013-04-01/hostedzone/a%2520b");

        let plain = context();
        assert_eq!(plain.canonical_uri, "/2013-04-01/hostedzone");
    }
}

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

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use crate::error::{Error, Result};
use crate::utils::signing::{uri_encode, Authorization};

pub use crate::utils::signing::Credentials;

/// Status line and body of one service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

/// Issues one authenticated request against the service.
///
/// `path` segments are joined with `/` under the API version segment. Query pairs whose value
/// is `None` are left out. Signing, connection reuse and any transport-level retries belong to
/// the implementation.
#[async_trait]
pub trait SignedHttpClient: Send + Sync {
    async fn send(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, Option<String>)],
        body: Option<String>,
    ) -> Result<RawResponse>;
}

/// reqwest-backed client signing every request with Signature Version 4.
pub struct Route53HttpClient {
    inner: Client,
    /// Scheme and authority, e.g. `https://route53.amazonaws.com`
    endpoint: String,
    host: String,
    region: String,
    api_version: String,
    credentials: Credentials,
}

impl Route53HttpClient {
    pub fn new(
        endpoint: &str,
        region: &str,
        api_version: &str,
        credentials: Credentials,
    ) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let host = endpoint
            .split_once("://")
            .map(|(_, rest)| rest)
            .filter(|host| !host.is_empty() && !host.contains('/'))
            .ok_or_else(|| Error::config(format!("invalid endpoint {}", endpoint)))?
            .to_string();

        Ok(Self {
            inner: Client::new(),
            endpoint,
            host,
            region: region.to_string(),
            api_version: api_version.to_string(),
            credentials,
        })
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn path(&self, segments: &[&str]) -> String {
        let mut path = format!("/{}", uri_encode(&self.api_version));
        for segment in segments {
            path.push('/');
            path.push_str(&uri_encode(segment));
        }
        path
    }
}

#[async_trait]
impl SignedHttpClient for Route53HttpClient {
    async fn send(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, Option<String>)],
        body: Option<String>,
    ) -> Result<RawResponse> {
        let uri = self.path(path);
        let params: Vec<(&str, String)> = query
            .iter()
            .filter_map(|(key, value)| value.clone().map(|value| (*key, value)))
            .collect();

        let auth = Authorization::new(&self.host, &self.region)
            .method(method.as_str())
            .uri(&uri)
            .query(&params)
            .payload(body.as_deref().unwrap_or_default());

        let mut url = format!("{}{}", self.endpoint, uri);
        if !auth.canonical_query_string().is_empty() {
            url.push('?');
            url.push_str(auth.canonical_query_string());
        }

        let mut headers = auth.build_request_headers(&self.credentials)?;
        let mut req = self.inner.request(method, url);
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8"));
            req = req.body(body);
        }

        let response = req.headers(headers).send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            access_key_id: "id".into(),
            secret_access_key: "secret".into(),
            session_token: None,
        }
    }

    #[test]
    fn path_is_prefixed_with_api_version() {
        let client = Route53HttpClient::new("https://route53.amazonaws.com/", "us-east-1", "2013-04-01", credentials())
            .unwrap();
        assert_eq!(client.path(&["hostedzone", "Z1", "rrset"]), "/2013-04-01/hostedzone/Z1/rrset");
        assert_eq!(client.path(&[]), "/2013-04-01");
        assert_eq!(client.host, "route53.amazonaws.com");
        assert_eq!(client.api_version(), "2013-04-01");
    }

    #[test]
    fn rejects_endpoints_without_host() {
        for endpoint in ["route53.amazonaws.com", "https://", "https://host/path"] {
            assert!(matches!(
                Route53HttpClient::new(endpoint, "us-east-1", "2013-04-01", credentials()),
                Err(Error::Config(_))
            ));
        }
    }
}

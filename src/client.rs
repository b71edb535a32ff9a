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

use reqwest::Method;
use tracing::{debug, error, trace};
use uuid::Uuid;
use crate::error::{Error, Result};
use crate::models::Page;
use crate::models::change_batch::ChangeBatch;
use crate::models::change_info::{ChangeInfo, CHANGE_PREFIX};
use crate::models::hosted_zone::{bare_zone_id, HostedZone};
use crate::models::record::{Record, RecordType};
use crate::utils::request::{RawResponse, Route53HttpClient, SignedHttpClient};
use crate::utils::signing::Credentials;
use crate::utils::templates;
use crate::utils::xml::{self, marker, ResultSet, XmlEntity};

pub const DEFAULT_ENDPOINT: &str = "https://route53.amazonaws.com";
pub const DEFAULT_REGION: &str = "us-east-1";
/// First API version accepting UPSERT changes.
pub const DEFAULT_API_VERSION: &str = "2013-04-01";

/// Builder for creating Route 53 client instances.
#[derive(Debug, Default)]
pub struct Route53DnsBuilder {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
    endpoint: Option<String>,
    region: Option<String>,
    api_version: Option<String>,
}

impl Route53DnsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and
    /// `AWS_SESSION_TOKEN`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            access_key_id: var("AWS_ACCESS_KEY_ID"),
            secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            session_token: var("AWS_SESSION_TOKEN"),
            ..Self::default()
        }
    }

    /// Sets configuration parameters for the client builder.
    ///
    /// Supported keys:
    /// - "access_key_id"
    /// - "secret_access_key"
    /// - "session_token"
    /// - "endpoint"
    /// - "region"
    /// - "api_version"
    pub fn set_param(mut self, key: &str, value: &str) -> Result<Self> {
        let value = Some(value.to_string());
        match key {
            "access_key_id" => self.access_key_id = value,
            "secret_access_key" => self.secret_access_key = value,
            "session_token" => self.session_token = value,
            "endpoint" => self.endpoint = value,
            "region" => self.region = value,
            "api_version" => self.api_version = value,
            _ => return Err(Error::config(format!("invalid parameter: {}", key))),
        }
        Ok(self)
    }

    /// Constructs a client that signs its own requests.
    pub fn build(self) -> Result<Route53Dns<Route53HttpClient>> {
        let credentials = Credentials {
            access_key_id: self
                .access_key_id
                .ok_or_else(|| Error::config("access_key_id is required"))?,
            secret_access_key: self
                .secret_access_key
                .ok_or_else(|| Error::config("secret_access_key is required"))?,
            session_token: self.session_token,
        };
        let api_version = self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let http_client = Route53HttpClient::new(
            self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
            self.region.as_deref().unwrap_or(DEFAULT_REGION),
            &api_version,
            credentials,
        )?;
        Ok(Route53Dns::with_client(http_client, &api_version))
    }
}

/// Zone and record set operations on top of a signed HTTP client.
pub struct Route53Dns<T: SignedHttpClient> {
    /// HTTP client for making requests
    http_client: T,
    /// Namespace of request documents
    xmlns: String,
}

impl<T: SignedHttpClient> Route53Dns<T> {
    /// Wraps any client; `api_version` must be the version that client prefixes paths with.
    pub fn with_client(http_client: T, api_version: &str) -> Self {
        Self {
            http_client,
            xmlns: templates::namespace(api_version),
        }
    }

    pub fn http_client(&self) -> &T {
        &self.http_client
    }

    pub fn xmlns(&self) -> &str {
        &self.xmlns
    }

    /// Sends one request and returns the body if the status is `expected_status`.
    async fn call(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, Option<String>)],
        body: Option<String>,
        expected_status: u16,
    ) -> Result<String> {
        debug!(%method, path = %path.join("/"), "route53 request");
        let RawResponse { status, reason, body } =
            self.http_client.send(method, path, query, body).await?;
        trace!(status, %body, "route53 response");

        if status == expected_status {
            Ok(body)
        } else {
            error!(status, %reason, %body, "route53 request failed");
            Err(Error::Service { status, reason, body })
        }
    }

    async fn get_object<E: XmlEntity>(
        &self,
        method: Method,
        path: &[&str],
        body: Option<String>,
        expected_status: u16,
    ) -> Result<E> {
        let body = self.call(method, path, &[], body, expected_status).await?;
        xml::parse_object(&body)
    }

    async fn get_list(
        &self,
        path: &[&str],
        marker: xml::Marker,
        query: &[(&str, Option<String>)],
    ) -> Result<ResultSet> {
        let body = self.call(Method::GET, path, query, None, 200).await?;
        xml::parse_list(&body, &[marker])
    }

    /// Returns every hosted zone on the first page of the account's listing.
    pub async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        Ok(self.list_hosted_zones_page(None, None).await?.items)
    }

    /// Returns one page of hosted zones starting at `marker`.
    pub async fn list_hosted_zones_page(
        &self,
        marker_id: Option<&str>,
        max_items: Option<u32>,
    ) -> Result<Page<HostedZone>> {
        let query = [
            ("marker", marker_id.map(|m| bare_zone_id(m).to_string())),
            ("maxitems", max_items.map(|n| n.to_string())),
        ];
        let set = self
            .get_list(&["hostedzone"], marker::<HostedZone>("HostedZone"), &query)
            .await?;
        Ok(Page::from_result_set(set))
    }

    /// Gets one hosted zone with its delegation set.
    pub async fn get_hosted_zone(&self, hosted_zone_id: &str) -> Result<HostedZone> {
        let id = bare_zone_id(hosted_zone_id);
        self.get_object(Method::GET, &["hostedzone", id], None, 200).await
    }

    /// Creates a hosted zone.
    ///
    /// A version 4 UUID is used as caller reference when none is given, so a failed request can
    /// be retried without creating the zone twice.
    pub async fn create_hosted_zone(
        &self,
        domain_name: &str,
        caller_reference: Option<&str>,
        comment: Option<&str>,
    ) -> Result<HostedZone> {
        let caller_reference = caller_reference
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let body = templates::create_hosted_zone_xml(
            &self.xmlns,
            domain_name,
            &caller_reference,
            comment.unwrap_or_default(),
        );
        self.get_object(Method::POST, &["hostedzone"], Some(body), 201).await
    }

    pub async fn delete_hosted_zone(&self, hosted_zone_id: &str) -> Result<ChangeInfo> {
        let id = bare_zone_id(hosted_zone_id);
        self.get_object(Method::DELETE, &["hostedzone", id], None, 200).await
    }

    /// Lists record sets of a zone, starting at `name`/`record_type` in the service's ordering.
    pub async fn list_record_sets(
        &self,
        hosted_zone_id: &str,
        record_type: Option<RecordType>,
        name: Option<&str>,
        max_items: Option<u32>,
    ) -> Result<Vec<Record>> {
        Ok(self
            .list_record_sets_page(hosted_zone_id, record_type, name, max_items)
            .await?
            .items)
    }

    pub async fn list_record_sets_page(
        &self,
        hosted_zone_id: &str,
        record_type: Option<RecordType>,
        name: Option<&str>,
        max_items: Option<u32>,
    ) -> Result<Page<Record>> {
        let id = bare_zone_id(hosted_zone_id);
        let query = [
            ("type", record_type.map(|t| t.to_string())),
            ("name", name.map(str::to_string)),
            ("maxitems", max_items.map(|n| n.to_string())),
        ];
        let set = self
            .get_list(&["hostedzone", id, "rrset"], marker::<Record>("ResourceRecordSet"), &query)
            .await?;
        Ok(Page::from_result_set(set))
    }

    /// Lists record sets of an already fetched zone.
    pub async fn zone_records(
        &self,
        zone: &HostedZone,
        record_type: Option<RecordType>,
        name: Option<&str>,
        max_items: Option<u32>,
    ) -> Result<Vec<Record>> {
        self.list_record_sets(zone.require_id()?, record_type, name, max_items)
            .await
    }

    /// Deletes an already fetched zone.
    pub async fn delete_zone(&self, zone: &HostedZone) -> Result<ChangeInfo> {
        self.delete_hosted_zone(zone.require_id()?).await
    }

    /// Starts an empty change batch for a zone.
    pub fn begin_change_batch(&self, hosted_zone_id: &str, comment: Option<&str>) -> ChangeBatch {
        ChangeBatch::new(hosted_zone_id, comment)
    }

    /// Submits a batch as one request and marks it submitted once the service accepts it.
    ///
    /// A rejected batch stays open: the service queued none of its changes.
    pub async fn commit(&self, batch: &mut ChangeBatch) -> Result<ChangeInfo> {
        if batch.is_submitted() {
            return Err(Error::BatchSubmitted(batch.hosted_zone_id().to_string()));
        }
        let body = batch.to_xml(&self.xmlns);
        let info: ChangeInfo = self
            .get_object(
                Method::POST,
                &["hostedzone", batch.hosted_zone_id(), "rrset"],
                Some(body),
                200,
            )
            .await?;
        batch.mark_submitted();
        Ok(info)
    }

    /// Gets the status of a submitted change.
    pub async fn get_change(&self, change_id: &str) -> Result<ChangeInfo> {
        let id = change_id.strip_prefix(CHANGE_PREFIX).unwrap_or(change_id);
        self.get_object(Method::GET, &["change", id], None, 200).await
    }

    /// Fetches the change again and returns a snapshot with every field taken from the service.
    pub async fn refresh(&self, change: &ChangeInfo) -> Result<ChangeInfo> {
        let id = change
            .id
            .as_deref()
            .ok_or_else(|| Error::parse("change info has no id"))?;
        let fresh = self.get_change(id).await?;
        Ok(change.overlay(fresh))
    }
}

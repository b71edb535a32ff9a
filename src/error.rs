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

use std::collections::BTreeMap;
use std::error::Error as StdError;
use thiserror::Error;
use route53_sdk_macros::field_setters;
use crate::utils::xml::{self, XmlEntity, XmlHandler};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Raised by the signed HTTP client; never handled by this crate.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The service answered with a status other than the one the operation expects.
    #[error("service error: {status} {reason}")]
    Service {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("change batch for hosted zone {0} has already been submitted")]
    BatchSubmitted(String),
}

impl Error {
    pub fn transport<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Error::Transport(Box::new(err))
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// HTTP status of a `Service` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Best-effort decoding of the `ErrorResponse` document carried by a `Service` error.
    ///
    /// Returns `None` for other variants or when the body is not an error document.
    pub fn service_details(&self) -> Option<ServiceErrorDetails> {
        let Error::Service { body, .. } = self else {
            return None;
        };
        xml::parse_object::<ServiceErrorDetails>(body)
            .ok()
            .filter(|details| details.code.is_some())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::transport(err)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Error::transport(err)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Fields of the service's `ErrorResponse` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceErrorDetails {
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub request_id: Option<String>,
    pub extra: BTreeMap<String, String>,
}

field_setters!(ServiceErrorDetails {
    "Type" => error_type: text,
    "Code" => code: text,
    "Message" => message: text,
    "RequestId" => request_id: text,
});

impl XmlHandler for ServiceErrorDetails {
    fn end_element(&mut self, name: &str, value: &str) -> Result<()> {
        if !self.set_field(name, value).map_err(Error::Parse)? {
            self.extra.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}

impl XmlEntity for ServiceErrorDetails {}

#[cfg(test)]
mod tests {
    use super::*;

    const ERROR_BODY: &str = r#"<?xml version="1.0"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <Error>
    <Type>Sender</Type>
    <Code>NoSuchHostedZone</Code>
    <Message>No hosted zone found with ID: Z404</Message>
  </Error>
  <RequestId>req-1</RequestId>
</ErrorResponse>"#;

    #[test]
    fn service_details_decode_error_document() {
        let err = Error::Service {
            status: 404,
            reason: "Not Found".into(),
            body: ERROR_BODY.into(),
        };
        let details = err.service_details().unwrap();
        assert_eq!(details.error_type.as_deref(), Some("Sender"));
        assert_eq!(details.code.as_deref(), Some("NoSuchHostedZone"));
        assert_eq!(details.message.as_deref(), Some("No hosted zone found with ID: Z404"));
        assert_eq!(details.request_id.as_deref(), Some("req-1"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn service_details_ignore_non_error_bodies() {
        let err = Error::Service {
            status: 502,
            reason: "Bad Gateway".into(),
            body: "<html>upstream down".into(),
        };
        assert!(err.service_details().is_none());
        assert!(Error::parse("x").service_details().is_none());
    }

    #[test]
    fn display_carries_status_and_reason() {
        let err = Error::Service {
            status: 400,
            reason: "Bad Request".into(),
            body: String::new(),
        };
        assert_eq!(err.to_string(), "service error: 400 Bad Request");
    }
}

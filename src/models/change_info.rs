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

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use route53_sdk_macros::field_setters;
use crate::error::{Error, Result};
use crate::utils::xml::{XmlEntity, XmlHandler};

/// Path prefix the service puts in front of change ids.
pub const CHANGE_PREFIX: &str = "/change/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Pending,
    InSync,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Pending => "PENDING",
            ChangeStatus::InSync => "INSYNC",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(ChangeStatus::Pending),
            "INSYNC" => Ok(ChangeStatus::InSync),
            other => Err(Error::parse(format!("unknown change status {}", other))),
        }
    }
}

/// Status of an asynchronous mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeInfo {
    pub id: Option<String>,
    pub status: Option<ChangeStatus>,
    pub submitted_at: Option<String>,
    pub comment: Option<String>,
    pub extra: BTreeMap<String, String>,
}

field_setters!(ChangeInfo {
    "Id" => id: strip("/change/"),
    "Status" => status: parse_opt,
    "SubmittedAt" => submitted_at: text,
    "Comment" => comment: text,
});

impl ChangeInfo {
    /// Returns a new snapshot holding every field of `fresh`.
    ///
    /// Nothing from `self` is carried over, so a field the service stopped reporting is absent
    /// from the result.
    pub fn overlay(&self, fresh: ChangeInfo) -> ChangeInfo {
        ChangeInfo {
            id: fresh.id,
            status: fresh.status,
            submitted_at: fresh.submitted_at,
            comment: fresh.comment,
            extra: fresh.extra,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Some(ChangeStatus::Pending)
    }
}

impl fmt::Display for ChangeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeInfo:{}", self.id.as_deref().unwrap_or_default())
    }
}

impl XmlHandler for ChangeInfo {
    fn end_element(&mut self, name: &str, value: &str) -> Result<()> {
        if !self.set_field(name, value).map_err(Error::Parse)? {
            self.extra.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl XmlEntity for ChangeInfo {}

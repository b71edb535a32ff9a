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
use crate::utils::templates;
use crate::utils::xml::{XmlEntity, XmlHandler};

/// TTL applied to records when none is given.
pub const DEFAULT_TTL: u32 = 600;

/// Resource record types accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Spf,
    Srv,
    Txt,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Soa => "SOA",
            RecordType::Spf => "SPF",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "NS" => Ok(RecordType::Ns),
            "PTR" => Ok(RecordType::Ptr),
            "SOA" => Ok(RecordType::Soa),
            "SPF" => Ok(RecordType::Spf),
            "SRV" => Ok(RecordType::Srv),
            "TXT" => Ok(RecordType::Txt),
            other => Err(Error::parse(format!("unsupported record type {}", other))),
        }
    }
}

/// A resource record set: one name and type sharing a TTL and an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub record_type: Option<RecordType>,
    /// Type reported by the service when it is none of the `RecordType` variants, such as `CAA`.
    pub unknown_type: Option<String>,
    pub ttl: u32,
    pub values: Vec<String>,
    /// Leaf elements without a dedicated field, keyed by element name.
    pub extra: BTreeMap<String, String>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            name: String::new(),
            record_type: None,
            unknown_type: None,
            ttl: DEFAULT_TTL,
            values: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

field_setters!(Record {
    "Name" => name: string,
    "TTL" => ttl: parse,
    "Value" => values: push,
});

impl Record {
    pub fn new(name: impl Into<String>, record_type: RecordType, ttl: Option<u32>) -> Self {
        Self {
            name: name.into(),
            record_type: Some(record_type),
            ttl: ttl.unwrap_or(DEFAULT_TTL),
            ..Default::default()
        }
    }

    /// Appends a value; values keep insertion order.
    pub fn add_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Wire name of the record type, whether or not it is a known `RecordType`.
    pub fn type_name(&self) -> Option<&str> {
        self.record_type
            .map(|t| t.as_str())
            .or(self.unknown_type.as_deref())
    }

    fn set_type(&mut self, value: &str) {
        let value = value.trim();
        match value.parse::<RecordType>() {
            Ok(record_type) => {
                self.record_type = Some(record_type);
                self.unknown_type = None;
            }
            Err(_) => {
                self.record_type = None;
                self.unknown_type = Some(value.to_string());
            }
        }
    }

    /// Renders the `ResourceRecordSet` element for this record.
    pub fn to_xml(&self) -> String {
        templates::resource_record_set_xml(
            &self.name,
            self.type_name().unwrap_or_default(),
            self.ttl,
            &self.values,
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record_type = self.type_name().unwrap_or("?");
        write!(f, "{} {} {:?}", self.name, record_type, self.values)
    }
}

impl XmlHandler for Record {
    fn start_element(&mut self, name: &str) -> Option<Box<dyn XmlHandler>> {
        if name == "ResourceRecords" {
            self.values.clear();
        }
        None
    }

    fn end_element(&mut self, name: &str, value: &str) -> Result<()> {
        if name == "Type" {
            self.set_type(value);
        } else if !self.set_field(name, value).map_err(Error::Parse)? {
            self.extra.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl XmlEntity for Record {}

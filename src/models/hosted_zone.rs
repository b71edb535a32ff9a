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
use route53_sdk_macros::field_setters;
use crate::error::{Error, Result};
use crate::models::change_batch::ChangeBatch;
use crate::models::change_info::ChangeInfo;
use crate::utils::xml::{XmlEntity, XmlHandler};

/// Path prefix the service puts in front of hosted zone ids.
pub const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";

/// Path prefix the service puts in front of reusable delegation set ids.
pub const DELEGATION_SET_PREFIX: &str = "/delegationset/";

/// Removes the `/hostedzone/` prefix from a zone id, if present.
pub fn bare_zone_id(id: &str) -> &str {
    id.strip_prefix(HOSTED_ZONE_PREFIX).unwrap_or(id)
}

/// A DNS zone managed by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostedZone {
    pub id: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub version: Option<String>,
    pub caller_reference: Option<String>,
    pub comment: Option<String>,
    pub resource_record_set_count: Option<u64>,
    pub name_servers: Vec<String>,
    /// Id of the reusable delegation set serving the zone, when the response names one.
    pub delegation_set_id: Option<String>,
    /// Present when the response reported the status of a change, as zone creation does.
    pub change_info: Option<ChangeInfo>,
    pub extra: BTreeMap<String, String>,
}

field_setters!(HostedZone {
    "Id" => id: strip("/hostedzone/"),
    "Name" => name: text,
    "Owner" => owner: text,
    "Version" => version: text,
    "CallerReference" => caller_reference: text,
    "Comment" => comment: text,
    "ResourceRecordSetCount" => resource_record_set_count: parse_opt,
    "NameServer" => name_servers: push,
});

/// The `DelegationSet` block of a zone response.
///
/// It carries its own `Id` and `CallerReference`, so it is parsed apart from the zone.
#[derive(Debug, Default)]
struct DelegationSet {
    id: Option<String>,
    caller_reference: Option<String>,
    name_servers: Vec<String>,
    extra: BTreeMap<String, String>,
}

field_setters!(DelegationSet {
    "Id" => id: strip("/delegationset/"),
    "CallerReference" => caller_reference: text,
    "NameServer" => name_servers: push,
});

impl XmlHandler for DelegationSet {
    fn start_element(&mut self, name: &str) -> Option<Box<dyn XmlHandler>> {
        if name == "NameServers" {
            self.name_servers.clear();
        }
        None
    }

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

impl HostedZone {
    /// Begins a change batch against this zone.
    pub fn change_batch(&self, comment: Option<&str>) -> Result<ChangeBatch> {
        Ok(ChangeBatch::new(self.require_id()?, comment))
    }

    /// Bare id of the zone; zones built by hand may not have one.
    pub fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .map(bare_zone_id)
            .ok_or_else(|| Error::parse("hosted zone has no id"))
    }
}

impl fmt::Display for HostedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostedZone:{}", self.id.as_deref().unwrap_or_default())
    }
}

impl XmlHandler for HostedZone {
    fn start_element(&mut self, name: &str) -> Option<Box<dyn XmlHandler>> {
        match name {
            "ChangeInfo" => Some(Box::new(ChangeInfo::default())),
            "DelegationSet" => Some(Box::new(DelegationSet::default())),
            "NameServers" => {
                self.name_servers.clear();
                None
            }
            _ => None,
        }
    }

    fn end_element(&mut self, name: &str, value: &str) -> Result<()> {
        if !self.set_field(name, value).map_err(Error::Parse)? {
            self.extra.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn attach(&mut self, _name: &str, child: Box<dyn XmlHandler>) {
        let child = match child.into_any().downcast::<ChangeInfo>() {
            Ok(info) => {
                self.change_info = Some(*info);
                return;
            }
            Err(other) => other,
        };
        if let Ok(set) = child.downcast::<DelegationSet>() {
            let DelegationSet { id, caller_reference, name_servers, extra } = *set;
            self.delegation_set_id = id;
            self.name_servers = name_servers;
            if let Some(reference) = caller_reference {
                self.extra.insert("DelegationSet.CallerReference".to_string(), reference);
            }
            for (name, value) in extra {
                self.extra.insert(format!("DelegationSet.{}", name), value);
            }
        }
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl XmlEntity for HostedZone {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::change_info::ChangeStatus;
    use crate::utils::xml::{marker, parse_list, parse_object};

    const CREATED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CreateHostedZoneResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <HostedZone>
    <Id>/hostedzone/Z1PA6795UKMFR9</Id>
    <Name>example.com.</Name>
    <CallerReference>myUniqueIdentifier</CallerReference>
    <Config>
      <Comment></Comment>
    </Config>
    <ResourceRecordSetCount>2</ResourceRecordSetCount>
  </HostedZone>
  <ChangeInfo>
    <Id>/change/C1PA6795UKMFR9</Id>
    <Status>PENDING</Status>
    <SubmittedAt>2017-03-15T01:36:41.958Z</SubmittedAt>
  </ChangeInfo>
  <DelegationSet>
    <NameServers>
      <NameServer>ns-2048.awsdns-64.com</NameServer>
      <NameServer>ns-2049.awsdns-65.net</NameServer>
    </NameServers>
  </DelegationSet>
  <Location>https://route53.amazonaws.com/2013-04-01/hostedzone/Z1PA6795UKMFR9</Location>
</CreateHostedZoneResponse>"#;

    #[test]
    fn parses_creation_response() {
        let zone: HostedZone = parse_object(CREATED).unwrap();
        assert_eq!(zone.id.as_deref(), Some("Z1PA6795UKMFR9"));
        assert_eq!(zone.name.as_deref(), Some("example.com."));
        assert_eq!(zone.caller_reference.as_deref(), Some("myUniqueIdentifier"));
        assert_eq!(zone.comment.as_deref(), Some(""));
        assert_eq!(zone.resource_record_set_count, Some(2));
        assert_eq!(zone.name_servers, vec!["ns-2048.awsdns-64.com", "ns-2049.awsdns-65.net"]);

        let info = zone.change_info.as_ref().unwrap();
        assert_eq!(info.id.as_deref(), Some("C1PA6795UKMFR9"));
        assert_eq!(info.status, Some(ChangeStatus::Pending));
    }

    #[test]
    fn unknown_elements_land_in_extra() {
        let zone: HostedZone = parse_object(CREATED).unwrap();
        assert_eq!(
            zone.extra.get("Location").map(String::as_str),
            Some("https://route53.amazonaws.com/2013-04-01/hostedzone/Z1PA6795UKMFR9")
        );
        assert!(!zone.extra.contains_key("Config"));
    }

    #[test]
    fn name_servers_reset_per_section() {
        let doc = "<GetHostedZoneResponse><HostedZone><Id>Z9</Id></HostedZone>\
                   <DelegationSet><NameServers><NameServer>old</NameServer></NameServers>\
                   <NameServers><NameServer>new</NameServer></NameServers></DelegationSet>\
                   </GetHostedZoneResponse>";
        let zone: HostedZone = parse_object(doc).unwrap();
        assert_eq!(zone.id.as_deref(), Some("Z9"));
        assert_eq!(zone.name_servers, vec!["new"]);
    }

    #[test]
    fn list_response_yields_zones_in_order() {
        let doc = r#"<ListHostedZonesResponse xmlns="https://route53.amazonaws.com/doc/2010-10-01/">
  <HostedZones>
    <HostedZone>
      <Id>/hostedzone/Z111111QQQQQQQ</Id>
      <Name>example2.com.</Name>
      <CallerReference>MyUniqueIdentifier2</CallerReference>
      <Config><Comment>This is my second hosted zone.</Comment></Config>
    </HostedZone>
    <HostedZone>
      <Id>/hostedzone/Z222222VVVVVVV</Id>
      <Name>example3.com.</Name>
      <CallerReference>MyUniqueIdentifier3</CallerReference>
    </HostedZone>
  </HostedZones>
  <MaxItems>10</MaxItems>
  <IsTruncated>true</IsTruncated>
  <NextMarker>Z333333YYYYYYY</NextMarker>
</ListHostedZonesResponse>"#;

        let set = parse_list(doc, &[marker::<HostedZone>("HostedZone")]).unwrap();
        assert!(set.is_truncated());
        assert_eq!(set.get("NextMarker"), Some("Z333333YYYYYYY"));

        let zones = set.into_items::<HostedZone>();
        let ids: Vec<_> = zones.iter().filter_map(|z| z.id.as_deref()).collect();
        assert_eq!(ids, vec!["Z111111QQQQQQQ", "Z222222VVVVVVV"]);
        assert_eq!(zones[0].comment.as_deref(), Some("This is my second hosted zone."));
        assert_eq!(zones[1].comment, None);
    }

    #[test]
    fn delegation_set_ids_stay_out_of_the_zone() {
        let doc = "<GetHostedZoneResponse xmlns=\"https://route53.amazonaws.com/doc/2013-04-01/\">\
                   <HostedZone><Id>/hostedzone/Z1</Id><Name>example.com.</Name>\
                   <CallerReference>zone-ref</CallerReference></HostedZone>\
                   <DelegationSet><Id>/delegationset/N1</Id><CallerReference>ds-ref</CallerReference>\
                   <NameServers><NameServer>ns-1.awsdns-1.org</NameServer></NameServers>\
                   </DelegationSet></GetHostedZoneResponse>";
        let zone: HostedZone = parse_object(doc).unwrap();
        assert_eq!(zone.id.as_deref(), Some("Z1"));
        assert_eq!(zone.caller_reference.as_deref(), Some("zone-ref"));
        assert_eq!(zone.delegation_set_id.as_deref(), Some("N1"));
        assert_eq!(zone.name_servers, vec!["ns-1.awsdns-1.org"]);
        assert_eq!(
            zone.extra.get("DelegationSet.CallerReference").map(String::as_str),
            Some("ds-ref")
        );
    }

    #[test]
    fn bare_zone_id_accepts_both_forms() {
        assert_eq!(bare_zone_id("/hostedzone/Z123"), "Z123");
        assert_eq!(bare_zone_id("Z123"), "Z123");
    }

    #[test]
    fn change_batch_requires_an_id() {
        assert!(HostedZone::default().change_batch(None).is_err());

        let zone = HostedZone { id: Some("Z1".into()), ..Default::default() };
        let batch = zone.change_batch(Some("note")).unwrap();
        assert_eq!(batch.hosted_zone_id(), "Z1");
        assert_eq!(batch.comment(), Some("note"));
    }
}

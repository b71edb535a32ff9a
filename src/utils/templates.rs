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

//! Request bodies sent to the service.
//!
//! Every function here is a pure rendering of its arguments; substituted text is escaped.

use quick_xml::escape::escape;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Namespace of request documents for an API version.
pub fn namespace(api_version: &str) -> String {
    format!("https://route53.amazonaws.com/doc/{}/", api_version)
}

/// Renders a `CreateHostedZoneRequest`.
pub fn create_hosted_zone_xml(xmlns: &str, name: &str, caller_reference: &str, comment: &str) -> String {
    format!(
        "{decl}\n\
         <CreateHostedZoneRequest xmlns=\"{xmlns}\">\n\
         \x20   <Name>{name}</Name>\n\
         \x20   <CallerReference>{caller_reference}</CallerReference>\n\
         \x20   <HostedZoneConfig>\n\
         \x20       <Comment>{comment}</Comment>\n\
         \x20   </HostedZoneConfig>\n\
         </CreateHostedZoneRequest>",
        decl = XML_DECLARATION,
        xmlns = escape(xmlns),
        name = escape(name),
        caller_reference = escape(caller_reference),
        comment = escape(comment),
    )
}

/// Renders a `ResourceRecordSet` with one `ResourceRecord` per value, in order.
pub fn resource_record_set_xml(name: &str, record_type: &str, ttl: u32, values: &[String]) -> String {
    let records: String = values
        .iter()
        .map(|value| format!("<ResourceRecord><Value>{}</Value></ResourceRecord>", escape(value.as_str())))
        .collect();

    format!(
        "<ResourceRecordSet>\
         <Name>{}</Name>\
         <Type>{}</Type>\
         <TTL>{}</TTL>\
         <ResourceRecords>{}</ResourceRecords>\
         </ResourceRecordSet>",
        escape(name),
        escape(record_type),
        ttl,
        records,
    )
}

/// Renders one `Change` around an already rendered `ResourceRecordSet`.
pub fn change_xml(action: &str, record_xml: &str) -> String {
    format!("<Change><Action>{}</Action>{}</Change>", escape(action), record_xml)
}

/// Renders a `ChangeResourceRecordSetsRequest` around already rendered `Change` elements.
pub fn change_batch_xml(xmlns: &str, comment: Option<&str>, changes: &[String]) -> String {
    let comment = comment
        .map(|c| format!("<Comment>{}</Comment>", escape(c)))
        .unwrap_or_default();

    format!(
        "{}\n\
         <ChangeResourceRecordSetsRequest xmlns=\"{}\">\
         <ChangeBatch>{}<Changes>{}</Changes></ChangeBatch>\
         </ChangeResourceRecordSetsRequest>",
        XML_DECLARATION,
        escape(xmlns),
        comment,
        changes.concat(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_zone_request_carries_all_fields() {
        let xml = create_hosted_zone_xml(&namespace("2013-04-01"), "example.com.", "ref-1", "a & b");
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<CreateHostedZoneRequest xmlns="https://route53.amazonaws.com/doc/2013-04-01/">"#));
        assert!(xml.contains("<Name>example.com.</Name>"));
        assert!(xml.contains("<CallerReference>ref-1</CallerReference>"));
        assert!(xml.contains("<Comment>a &amp; b</Comment>"));
    }

    #[test]
    fn record_set_lists_values_in_order() {
        let values = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let xml = resource_record_set_xml("n.", "TXT", 60, &values);
        assert_eq!(
            xml,
            "<ResourceRecordSet><Name>n.</Name><Type>TXT</Type><TTL>60</TTL><ResourceRecords>\
             <ResourceRecord><Value>b</Value></ResourceRecord>\
             <ResourceRecord><Value>a</Value></ResourceRecord>\
             <ResourceRecord><Value>c</Value></ResourceRecord>\
             </ResourceRecords></ResourceRecordSet>"
        );
    }

    #[test]
    fn change_batch_omits_missing_comment() {
        let xml = change_batch_xml("urn:ns", None, &[change_xml("DELETE", "<ResourceRecordSet/>")]);
        assert!(!xml.contains("<Comment>"));
        assert!(xml.contains("<Changes><Change><Action>DELETE</Action><ResourceRecordSet/></Change></Changes>"));
    }
}

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

pub mod change_batch;
pub mod change_info;
pub mod hosted_zone;
pub mod record;

use crate::utils::xml::{ResultSet, XmlEntity};

/// One page of a listing together with the cursor for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub is_truncated: bool,
    /// Zone listings: id to pass as `marker` for the next page.
    pub next_marker: Option<String>,
    /// Record listings: name to pass as `name` for the next page.
    pub next_record_name: Option<String>,
    /// Record listings: type to pass as `type` for the next page.
    pub next_record_type: Option<String>,
    pub max_items: Option<u32>,
}

impl<T: XmlEntity> Page<T> {
    pub(crate) fn from_result_set(set: ResultSet) -> Self {
        let field = |name: &str| set.get(name).map(str::to_string);
        let is_truncated = set.is_truncated();
        let next_marker = field("NextMarker");
        let next_record_name = field("NextRecordName");
        let next_record_type = field("NextRecordType");
        let max_items = set.get("MaxItems").and_then(|v| v.trim().parse().ok());
        Self {
            items: set.into_items(),
            is_truncated,
            next_marker,
            next_record_name,
            next_record_type,
            max_items,
        }
    }
}

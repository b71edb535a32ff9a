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

//! Ordered record mutations submitted to one hosted zone as a single unit.
//!
//! A batch starts in [`BatchState::Building`], where changes are appended with
//! [`ChangeBatch::add_change`]. Committing it through the client moves it to
//! [`BatchState::Submitted`]; from then on it only renders. Whether the service has applied the
//! batch is tracked by the returned [`ChangeInfo`](crate::models::change_info::ChangeInfo).

use std::fmt;
use crate::error::{Error, Result};
use crate::models::hosted_zone::bare_zone_id;
use crate::models::record::{Record, RecordType};
use crate::utils::templates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Create,
    Delete,
    Upsert,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "CREATE",
            ChangeAction::Delete => "DELETE",
            ChangeAction::Upsert => "UPSERT",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub action: ChangeAction,
    pub record: Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Building,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatch {
    hosted_zone_id: String,
    comment: Option<String>,
    changes: Vec<Change>,
    state: BatchState,
}

impl ChangeBatch {
    /// Starts an empty batch; `hosted_zone_id` may carry the `/hostedzone/` prefix.
    pub fn new(hosted_zone_id: &str, comment: Option<&str>) -> Self {
        Self {
            hosted_zone_id: bare_zone_id(hosted_zone_id).to_string(),
            comment: comment.map(str::to_string),
            changes: Vec::new(),
            state: BatchState::Building,
        }
    }

    pub fn hosted_zone_id(&self) -> &str {
        &self.hosted_zone_id
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.state == BatchState::Submitted
    }

    /// Appends a change and returns its record so values can be added to it.
    ///
    /// Fails once the batch has been submitted.
    pub fn add_change(
        &mut self,
        action: ChangeAction,
        name: &str,
        record_type: RecordType,
        ttl: Option<u32>,
    ) -> Result<&mut Record> {
        if self.is_submitted() {
            return Err(Error::BatchSubmitted(self.hosted_zone_id.clone()));
        }
        self.changes.push(Change {
            action,
            record: Record::new(name, record_type, ttl),
        });
        let index = self.changes.len() - 1;
        Ok(&mut self.changes[index].record)
    }

    /// Renders the `ChangeResourceRecordSetsRequest` for this batch.
    pub fn to_xml(&self, xmlns: &str) -> String {
        let changes: Vec<String> = self
            .changes
            .iter()
            .map(|change| templates::change_xml(change.action.as_str(), &change.record.to_xml()))
            .collect();
        templates::change_batch_xml(xmlns, self.comment.as_deref(), &changes)
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.state = BatchState::Submitted;
    }
}

//! Route 53 SDK for hosted zone and record set management
//!
//! Supported features:
//! - Hosted zone listing, lookup, creation and deletion
//! - Record set listing with type/name cursors
//! - Ordered change batches and change status polling
//! - Asynchronous operations over a pluggable signed HTTP client
//!
//! # Example
//! ```no_run
//! use rust_route53_sdk::client::Route53DnsBuilder;
//! use rust_route53_sdk::models::change_batch::ChangeAction;
//! use rust_route53_sdk::models::record::RecordType;
//!
//! # async fn run() -> rust_route53_sdk::Result<()> {
//! let client = Route53DnsBuilder::new()
//!     .set_param("access_key_id", "your_id")?
//!     .set_param("secret_access_key", "your_key")?
//!     .build()?;
//!
//! let zone = client.create_hosted_zone("example.com.", None, None).await?;
//! let mut batch = client.begin_change_batch(zone.id.as_deref().unwrap_or_default(), None);
//! batch
//!     .add_change(ChangeAction::Create, "www.example.com.", RecordType::A, Some(300))?
//!     .add_value("192.0.2.1");
//! let change = client.commit(&mut batch).await?;
//! let change = client.refresh(&change).await?;
//! # Ok(())
//! # }
//! ```

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

pub mod client;
pub mod error;
pub mod models;
pub mod utils;

pub use error::{Error, Result};

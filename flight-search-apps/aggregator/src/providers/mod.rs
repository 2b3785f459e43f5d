//!  Flight Search Aggregator
//!
//!  Copyright (C) 2026  Flight Search Aggregator Contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Provider adapters (C3).
//!
//! Each adapter in this module reads its own source shape and yields
//! canonical [`crate::flight::Flight`] values, honoring cancellation and
//! classifying its own failures as retryable or not. The concrete parsing
//! of any one airline's bespoke payload is out of scope for the core
//! itself (spec.md §1) — these are illustrative, in-process adapters used
//! to exercise the aggregator against real inputs.

pub mod fixture;
pub mod partner_feed;

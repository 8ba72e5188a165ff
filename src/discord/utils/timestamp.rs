// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use twilight_model::util::datetime::{Timestamp, TimestampParseError};

/// Gets a [Timestamp] for the given time, for use in embeds.
pub fn timestamp_from_datetime(datetime: DateTime<Utc>) -> Result<Timestamp, TimestampParseError> {
	Timestamp::from_micros(datetime.timestamp_micros())
}

pub fn timestamp_now() -> Result<Timestamp, TimestampParseError> {
	timestamp_from_datetime(Utc::now())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn converts_to_the_same_instant() {
		let datetime = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
		let timestamp = timestamp_from_datetime(datetime).unwrap();
		assert_eq!(timestamp.as_secs(), datetime.timestamp());
	}
}

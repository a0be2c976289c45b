//! Small parsing helpers shared by the HTTP adapters

use chrono::NaiveDateTime;

/// Reduce a provider timestamp ("2026-03-01T06:00:00") to display "HH:MM"
pub(crate) fn format_hhmm(timestamp: &str) -> String {
	if timestamp.is_empty() {
		return String::new();
	}
	match timestamp.split_once('T') {
		Some((_, time)) => time.chars().take(5).collect(),
		None => timestamp.chars().take(5).collect(),
	}
}

/// Minutes between two ISO-8601 local timestamps; `None` when unparseable
pub(crate) fn minutes_between(start: &str, end: &str) -> Option<u32> {
	let fmt = "%Y-%m-%dT%H:%M:%S";
	let start = NaiveDateTime::parse_from_str(start, fmt).ok()?;
	let end = NaiveDateTime::parse_from_str(end, fmt).ok()?;
	let minutes = (end - start).num_minutes();
	if minutes <= 0 {
		return None;
	}
	Some(minutes as u32)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_hhmm() {
		assert_eq!(format_hhmm("2026-03-01T06:05:00"), "06:05");
		assert_eq!(format_hhmm("14:30"), "14:30");
		assert_eq!(format_hhmm(""), "");
	}

	#[test]
	fn test_minutes_between() {
		assert_eq!(
			minutes_between("2026-03-01T06:00:00", "2026-03-01T08:30:00"),
			Some(150)
		);
		assert_eq!(minutes_between("junk", "2026-03-01T08:30:00"), None);
		assert_eq!(
			minutes_between("2026-03-01T09:00:00", "2026-03-01T08:00:00"),
			None
		);
	}
}

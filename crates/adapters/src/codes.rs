//! City-name to IATA airport code resolution
//!
//! Flight inventory providers key their searches on airport codes while
//! callers pass city names. The table covers the routes the engine is
//! deployed for; unknown cities fall back to the provider-tolerated
//! first-three-letters heuristic.

/// Well-known city to primary-airport mappings
const AIRPORT_CODES: &[(&str, &str)] = &[
	("mumbai", "BOM"),
	("delhi", "DEL"),
	("bangalore", "BLR"),
	("bengaluru", "BLR"),
	("chennai", "MAA"),
	("kolkata", "CCU"),
	("hyderabad", "HYD"),
	("pune", "PNQ"),
	("ahmedabad", "AMD"),
	("goa", "GOI"),
	("jaipur", "JAI"),
	("kochi", "COK"),
	("cochin", "COK"),
	("new york", "JFK"),
	("london", "LHR"),
	("dubai", "DXB"),
	("singapore", "SIN"),
	("bangkok", "BKK"),
	("paris", "CDG"),
	("sydney", "SYD"),
	("tokyo", "NRT"),
	("hong kong", "HKG"),
	("kuala lumpur", "KUL"),
	("doha", "DOH"),
	("abu dhabi", "AUH"),
];

/// Resolve a city name (or a code passed through verbatim) to an airport code
pub fn airport_code(city: &str) -> String {
	let city = city.trim();
	let city_lower = city.to_lowercase();

	if let Some((_, code)) = AIRPORT_CODES.iter().find(|(name, _)| *name == city_lower) {
		return (*code).to_string();
	}

	// Partial matches catch inputs like "Mumbai, India". Every name contains
	// the empty string, so blank input must not reach this pass.
	if !city_lower.is_empty() {
		if let Some((_, code)) = AIRPORT_CODES
			.iter()
			.find(|(name, _)| city_lower.contains(name) || name.contains(city_lower.as_str()))
		{
			return (*code).to_string();
		}
	}

	// Already a code
	if city.len() == 3 && city.chars().all(|c| c.is_ascii_uppercase()) {
		return city.to_string();
	}

	city.chars().take(3).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_known_city() {
		assert_eq!(airport_code("Mumbai"), "BOM");
		assert_eq!(airport_code("  tokyo "), "NRT");
	}

	#[test]
	fn test_partial_match() {
		assert_eq!(airport_code("Mumbai, India"), "BOM");
	}

	#[test]
	fn test_code_passthrough() {
		assert_eq!(airport_code("BLR"), "BLR");
	}

	#[test]
	fn test_unknown_city_heuristic() {
		assert_eq!(airport_code("Reykjavik"), "REY");
	}

	#[test]
	fn test_blank_input_never_resolves_to_a_real_code() {
		assert_eq!(airport_code(""), "");
		assert_eq!(airport_code("   "), "");
	}
}

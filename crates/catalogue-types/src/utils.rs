//! Utility functions

use rand::RngExt;

use crate::prelude::*;

pub const ID_LENGTH: usize = 24;
pub const SAFE: [char; 62] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
	'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
	'V', 'W', 'X', 'Y', 'Z',
];

pub fn random_id() -> ClResult<String> {
	let mut rng = rand::rng();
	let mut result = String::with_capacity(ID_LENGTH);

	for _ in 0..ID_LENGTH {
		result.push(SAFE[rng.random_range(0..SAFE.len())]);
	}
	Ok(result)
}

/// Checks a caller supplied entity id
pub fn validate_id(id: &str) -> ClResult<()> {
	if id.is_empty() {
		return Err(Error::ValidationError("id cannot be empty".into()));
	}
	if id.len() > 256 {
		return Err(Error::ValidationError("id is longer than 256 bytes".into()));
	}
	if id.chars().any(|c| c.is_control() || c == '/') {
		return Err(Error::ValidationError(format!("id '{}' contains invalid characters", id)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_random_id() {
		let a = random_id().unwrap();
		let b = random_id().unwrap();
		assert_eq!(a.len(), ID_LENGTH);
		assert!(a.chars().all(|c| SAFE.contains(&c)));
		assert_ne!(a, b);
	}

	#[test]
	fn test_validate_id() {
		assert!(validate_id("provider.cloud-lab").is_ok());
		assert!(validate_id("").is_err());
		assert!(validate_id("a/b").is_err());
	}
}

// vim: ts=4

//! Strongly typed identifiers spliced into BFF request paths.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (user, chat, message, expert, resume).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (user, chat, message, expert, resume).
		kind: &'static str,
	},
	/// The identifier contains a character that would alter the request path.
	#[error("{kind} identifier contains the reserved character `{character}`.")]
	ReservedCharacter {
		/// Kind of identifier (user, chat, message, expert, resume).
		kind: &'static str,
		/// Offending character.
		character: char,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} identifier exceeds {max} bytes.")]
	TooLong {
		/// Kind of identifier (user, chat, message, expert, resume).
		kind: &'static str,
		/// Maximum permitted byte length.
		max: usize,
	},
}

def_id! { UserId, "Identifier of an authenticated user.", "User" }
def_id! { ChatId, "Identifier of a chat room.", "Chat" }
def_id! { MessageId, "Identifier of a chat message.", "Message" }
def_id! { ExpertId, "Identifier of an expert profile.", "Expert" }
def_id! { ResumeId, "Identifier of a resume.", "Resume" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if let Some(character) = view.chars().find(|c| matches!(c, '/' | '?' | '#' | '%')) {
		return Err(IdentifierError::ReservedCharacter { kind, character });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_path_breaking_input() {
		assert!(ChatId::new(" chat-1").is_err(), "Leading whitespace must be rejected.");
		assert!(ChatId::new("").is_err());
		assert_eq!(
			ChatId::new("../admin"),
			Err(IdentifierError::ReservedCharacter { kind: "Chat", character: '/' })
		);
		assert!(ResumeId::new("r-1?x=1").is_err());

		let chat = ChatId::new("chat-123").expect("Chat fixture should be considered valid.");

		assert_eq!(chat.as_ref(), "chat-123");
		assert_eq!(format!("{chat:?}"), "Chat(chat-123)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let user: UserId =
			serde_json::from_str("\"user-42\"").expect("User should deserialize successfully.");

		assert_eq!(user.as_ref(), "user-42");
		assert!(serde_json::from_str::<UserId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<MessageId>("\"a/b\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		let exact = "e".repeat(IDENTIFIER_MAX_LEN);

		ExpertId::new(&exact).expect("Exact length should succeed.");

		assert!(ExpertId::new("e".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());
	}
}

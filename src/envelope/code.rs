//! Well-known envelope codes and the HTTP statuses a BFF derives from them.

/// Codes that mark a successful envelope.
pub const SUCCESS_CODES: [&str; 4] = [OK, CREATED, UPDATED, DELETED];
/// Codes that signal an unauthorized, invalid, or expired token.
pub const AUTH_FAILURE_CODES: [&str; 8] = [
	AUTH_UNAUTHORIZED,
	"UNAUTHORIZED",
	"INVALID_TOKEN",
	"TOKEN_EXPIRED",
	"AUTH_INVALID_TOKEN",
	"AUTH_TOKEN_EXPIRED",
	"INVALID_REFRESH_TOKEN",
	"REFRESH_TOKEN_EXPIRED",
];

/// Generic success.
pub const OK: &str = "OK";
/// Resource created.
pub const CREATED: &str = "CREATED";
/// Resource updated.
pub const UPDATED: &str = "UPDATED";
/// Resource deleted.
pub const DELETED: &str = "DELETED";
/// Canonical session-ended code.
pub const AUTH_UNAUTHORIZED: &str = "AUTH_UNAUTHORIZED";
/// Access denied for an authenticated caller.
pub const FORBIDDEN: &str = "FORBIDDEN";
/// Malformed request.
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
/// Generic missing resource.
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Route-boundary fallback for unexpected failures.
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
/// Fallback for refresh-token exchanges whose error body carries no code.
pub const TOKEN_REFRESH_FAILED: &str = "TOKEN_REFRESH_FAILED";

/// Returns `true` when `code` belongs to the success set.
pub fn is_success(code: &str) -> bool {
	SUCCESS_CODES.contains(&code)
}

/// Returns `true` when `code` signals an authentication failure.
pub fn is_auth_failure(code: &str) -> bool {
	AUTH_FAILURE_CODES.contains(&code)
}

/// Derives the HTTP status a BFF route answers with for a business code.
pub fn status_for_code(code: &str) -> u16 {
	if is_auth_failure(code) {
		return 401;
	}
	if code == FORBIDDEN || code.ends_with("_FORBIDDEN") {
		return 403;
	}
	if code == NOT_FOUND || code.ends_with("_NOT_FOUND") {
		return 404;
	}
	if code == INVALID_REQUEST || code.starts_with("INVALID_") {
		return 400;
	}

	200
}

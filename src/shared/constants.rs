/// Reporter identity recorded when an issue is submitted without a bearer token
pub const ANONYMOUS_REPORTER: &str = "anonymous@greenguardian.com";

/// Radius used by the nearby-issues query when none is given
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LENGTH: u64 = 6;

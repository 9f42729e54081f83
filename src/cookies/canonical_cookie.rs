use time::OffsetDateTime;

/// Represents a cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
    pub priority: CookiePriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CookiePriority {
    Low,
    Medium,
    High,
}

impl CanonicalCookie {
    // Basic constructor for now, will expand with parsing logic later
    pub fn new(
        name: String,
        value: String,
        domain: String,
        path: String,
        creation_time: OffsetDateTime,
        expiration_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name,
            value,
            domain,
            path,
            creation_time,
            expiration_time,
            last_access_time: creation_time,
            secure: false,
            http_only: false,
            host_only: true, // Default to host-only if not specified
            same_site: SameSite::Unspecified,
            priority: CookiePriority::Medium,
        }
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        if let Some(expiry) = self.expiration_time {
            expiry < current_time
        } else {
            false // Session cookie? Or logic decided by store?
        }
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(
        &self,
        secure_origin: bool,
    ) -> Result<(), crate::base::neterror::NetError> {
        use crate::base::neterror::NetError;

        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(NetError::CookieInvalidPrefix);
        }

        if self.name.starts_with("__Host-") {
            // __Host- requires: Secure flag, Path="/", host-only (no Domain), secure origin
            if !self.secure || self.path != "/" || !self.host_only || !secure_origin {
                return Err(NetError::CookieInvalidPrefix);
            }
        }

        Ok(())
    }

    /// Parse a single `Set-Cookie` header value into a [`CanonicalCookie`],
    /// per RFC 6265 §5.2. `request_host`/`request_secure` supply the
    /// defaulted domain/path and gate the `Secure` attribute's effect.
    /// Returns `None` for a header with no `name=value` pair.
    pub fn from_set_cookie(header: &str, request_host: &str, request_path: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let name_value = parts.next()?.trim();
        let (name, value) = name_value.split_once('=')?;
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() {
            return None;
        }

        let now = OffsetDateTime::now_utc();
        let mut cookie = CanonicalCookie::new(
            name.to_string(),
            value.to_string(),
            request_host.to_string(),
            default_cookie_path(request_path),
            now,
            None,
        );

        for attr in parts {
            let attr = attr.trim();
            let (key, val) = attr.split_once('=').unwrap_or((attr, ""));
            match key.to_ascii_lowercase().as_str() {
                "domain" => {
                    let domain = val.trim().trim_start_matches('.');
                    if !domain.is_empty() {
                        cookie.domain = domain.to_string();
                        cookie.host_only = false;
                    }
                }
                "path" => {
                    if val.starts_with('/') {
                        cookie.path = val.trim().to_string();
                    }
                }
                "secure" => cookie.secure = true,
                "httponly" => cookie.http_only = true,
                "samesite" => {
                    cookie.same_site = match val.trim().to_ascii_lowercase().as_str() {
                        "strict" => SameSite::Strict,
                        "lax" => SameSite::Lax,
                        "none" => SameSite::NoRestriction,
                        _ => SameSite::Unspecified,
                    };
                }
                "max-age" => {
                    if let Ok(seconds) = val.trim().parse::<i64>() {
                        cookie.expiration_time =
                            Some(now + time::Duration::seconds(seconds));
                    }
                }
                "expires" => {
                    if cookie.expiration_time.is_none() {
                        if let Ok(parsed) = time::OffsetDateTime::parse(
                            val.trim(),
                            &time::format_description::well_known::Rfc2822,
                        ) {
                            cookie.expiration_time = Some(parsed);
                        }
                    }
                }
                _ => {}
            }
        }

        Some(cookie)
    }

    /// Serialize as a `name=value` pair for a `Cookie` request header.
    pub fn to_cookie_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// RFC 6265 §5.1.4 default-path algorithm for a missing `Path` attribute.
fn default_cookie_path(request_path: &str) -> String {
    if !request_path.starts_with('/') || request_path == "/" {
        return "/".to_string();
    }
    match request_path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => request_path[..idx].to_string(),
        None => "/".to_string(),
    }
}

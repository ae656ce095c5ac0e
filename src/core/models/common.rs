/// Weak caller identity: the client network address.
///
/// Ownership checks built on this are a legacy, insecure mode. Addresses can be
/// shared or spoofed, and surveys with no recorded creator are editable by anyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub ip: String,
}

impl Requester {
    pub fn new(ip: impl Into<String>) -> Self {
        Self { ip: ip.into() }
    }

    /// Edit permission: the stored creator matches, or the survey is ownerless.
    pub fn can_edit(&self, creator_ip: Option<&str>) -> bool {
        match creator_ip {
            None => true,
            Some(c) => c.is_empty() || c == self.ip,
        }
    }

    /// Strict creator check, no ownerless fallback.
    pub fn is_creator(&self, creator_ip: Option<&str>) -> bool {
        creator_ip == Some(self.ip.as_str())
    }
}

/// Position for a new child appended after `max` existing siblings.
pub fn next_position(max: Option<i64>) -> i64 {
    max.map(|m| m + 1).unwrap_or(1)
}

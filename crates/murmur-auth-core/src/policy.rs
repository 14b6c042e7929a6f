//! Static allow-list of identities permitted to use the service

use std::collections::HashSet;
use std::sync::Arc;

/// Immutable set of allowed email addresses.
///
/// Matching is exact and case-sensitive. An empty list allows nobody.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: Arc<HashSet<String>>,
}

impl AllowList {
    /// Build from any iterator of emails, dropping blank entries
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let emails = emails
            .into_iter()
            .map(Into::into)
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            emails: Arc::new(emails),
        }
    }

    /// Parse a comma-separated list such as `ALLOWED_EMAILS`
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Check whether an identity may use the service
    #[inline]
    pub fn is_allowed(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

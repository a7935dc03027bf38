//! Options controlling a walk

use crate::{
    crc::ChecksumPolicy,
    error::{Error, Result},
};

/// Keyword used for the injected text chunk unless overridden
pub const DEFAULT_KEYWORD: &str = "mykey";

/// Longest keyword PNG text chunks allow
pub const MAX_KEYWORD_LEN: usize = 79;

/// Options for a walk over a PNG stream
///
/// This struct uses a builder pattern where the default is a read-only walk
/// that aborts on the first checksum mismatch. Use the builder methods to
/// enable injection or relax checksum handling.
///
/// # Example
///
/// ```
/// use png_splice::WalkOptions;
///
/// // Default: strict, no injection
/// let options = WalkOptions::new();
/// assert!(!options.inserts_text());
///
/// // Splice a text chunk before IEND and keep going past bad CRCs
/// let options = WalkOptions::new()
///     .insert_text("hello")
///     .keyword("Comment")
///     .lenient();
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Message to inject before IEND, if any
    pub(crate) message: Option<String>,

    /// Keyword preceding the message in the injected chunk
    pub(crate) keyword: String,

    pub(crate) checksum_policy: ChecksumPolicy,

    /// Sampling stride for decompressed image data (default: image width)
    pub(crate) stride: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            message: None,
            keyword: DEFAULT_KEYWORD.to_string(),
            checksum_policy: ChecksumPolicy::Strict,
            stride: None,
        }
    }
}

impl WalkOptions {
    /// Create default options (strict, read-only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a text chunk carrying `message` immediately before IEND
    pub fn insert_text(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the keyword for the injected chunk
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Choose strict (`true`, default) or lenient checksum handling
    pub fn fail_on_checksum_mismatch(mut self, fail: bool) -> Self {
        self.checksum_policy = if fail {
            ChecksumPolicy::Strict
        } else {
            ChecksumPolicy::Lenient
        };
        self
    }

    /// Shorthand for `fail_on_checksum_mismatch(false)`
    pub fn lenient(self) -> Self {
        self.fail_on_checksum_mismatch(false)
    }

    /// Sample every `stride`-th decompressed byte instead of every width-th
    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn inserts_text(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn keyword_str(&self) -> &str {
        &self.keyword
    }

    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum_policy
    }

    pub(crate) fn effective_stride(&self, width: u32) -> usize {
        self.stride.unwrap_or(width as usize).max(1)
    }

    /// Check options before any stream I/O
    pub fn validate(&self) -> Result<()> {
        if self.stride == Some(0) {
            return Err(Error::InvalidConfiguration(
                "stride must be at least 1".into(),
            ));
        }

        if self.message.is_none() {
            return Ok(());
        }

        if self.keyword.is_empty() {
            return Err(Error::InvalidConfiguration(
                "keyword must not be empty".into(),
            ));
        }
        if self.keyword.len() > MAX_KEYWORD_LEN {
            return Err(Error::InvalidConfiguration(format!(
                "keyword is {} bytes, limit is {}",
                self.keyword.len(),
                MAX_KEYWORD_LEN
            )));
        }
        if self.keyword.contains('\0') {
            return Err(Error::InvalidConfiguration(
                "keyword must not contain NUL".into(),
            ));
        }
        if self.message.as_deref().is_some_and(|m| m.contains('\0')) {
            return Err(Error::InvalidConfiguration(
                "message must not contain NUL".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = WalkOptions::new();
        assert!(!options.inserts_text());
        assert_eq!(options.keyword_str(), "mykey");
        assert_eq!(options.checksum_policy(), ChecksumPolicy::Strict);
        assert_eq!(options.effective_stride(16), 16);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = WalkOptions::new()
            .insert_text("hello")
            .keyword("Author")
            .lenient()
            .stride(3);
        assert_eq!(options.message(), Some("hello"));
        assert_eq!(options.keyword_str(), "Author");
        assert_eq!(options.checksum_policy(), ChecksumPolicy::Lenient);
        assert_eq!(options.effective_stride(16), 3);

        let strict = options.fail_on_checksum_mismatch(true);
        assert_eq!(strict.checksum_policy(), ChecksumPolicy::Strict);
    }

    #[test]
    fn test_zero_width_stride_is_clamped() {
        assert_eq!(WalkOptions::new().effective_stride(0), 1);
    }

    #[test]
    fn test_invalid_options() {
        let bad = [
            WalkOptions::new().insert_text("hi").keyword(""),
            WalkOptions::new().insert_text("hi").keyword("k".repeat(80)),
            WalkOptions::new().insert_text("hi").keyword("a\0b"),
            WalkOptions::new().insert_text("a\0b"),
            WalkOptions::new().stride(0),
        ];
        for options in bad {
            assert!(
                matches!(options.validate(), Err(Error::InvalidConfiguration(_))),
                "{options:?}"
            );
        }

        // Keyword is irrelevant when nothing is injected
        assert!(WalkOptions::new().keyword("").validate().is_ok());
        assert!(WalkOptions::new()
            .insert_text("")
            .keyword("k".repeat(79))
            .validate()
            .is_ok());
    }
}

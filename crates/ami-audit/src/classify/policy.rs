//! Ordered rule table mapping image metadata to a trust category.
//!
//! Rules are evaluated top to bottom and the first match wins. An image
//! that resolves but matches no rule is [`Category::Unverified`]; an image
//! that does not resolve is [`Category::Unknown`] before any rule runs.
//!
//! The default table:
//!
//! | # | Predicate                 | Category |
//! |---|---------------------------|----------|
//! | 1 | not public                | Private  |
//! | 2 | owner alias == `amazon`   | Verified |
//! | 3 | owner alias == `self`     | Private  |
//!
//! Visibility comes first: a private image is never Verified or
//! Unverified, those only describe publicly launchable images.

use ami_core::{Category, ImageMetadata, AMAZON_ALIAS, SELF_ALIAS};

use super::TrustedPublishers;

/// Condition a rule tests against resolved metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Image is not launchable by everyone
    NotPublic,
    /// Owner alias is present and equal to the value
    OwnerAlias(String),
    /// Owning account equals the value
    OwnerAccount(String),
    /// Owning account is one of the trusted publishers
    TrustedOwner(TrustedPublishers),
}

impl Predicate {
    /// Evaluate against resolved metadata
    #[must_use]
    pub fn matches(&self, meta: &ImageMetadata) -> bool {
        match self {
            Self::NotPublic => !meta.is_public(),
            Self::OwnerAlias(alias) => meta.has_alias(alias),
            Self::OwnerAccount(account) => meta.owner_id.as_deref() == Some(account.as_str()),
            Self::TrustedOwner(publishers) => meta
                .owner_id
                .as_deref()
                .is_some_and(|owner| publishers.contains(owner)),
        }
    }
}

/// One row of the policy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Short name used in logs
    pub name: &'static str,
    /// Condition to test
    pub predicate: Predicate,
    /// Category assigned on match
    pub category: Category,
}

impl Rule {
    fn new(name: &'static str, predicate: Predicate, category: Category) -> Self {
        Self {
            name,
            predicate,
            category,
        }
    }
}

/// Deterministic trust policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPolicy {
    rules: Vec<Rule>,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule::new("not-public", Predicate::NotPublic, Category::Private),
                Rule::new(
                    "amazon-alias",
                    Predicate::OwnerAlias(AMAZON_ALIAS.to_string()),
                    Category::Verified,
                ),
                Rule::new(
                    "self-alias",
                    Predicate::OwnerAlias(SELF_ALIAS.to_string()),
                    Category::Private,
                ),
            ],
        }
    }
}

impl TrustPolicy {
    /// Treat public images owned by the scanning account like `self` images.
    #[must_use]
    pub fn with_own_account(mut self, account_id: impl Into<String>) -> Self {
        self.rules.push(Rule::new(
            "own-account",
            Predicate::OwnerAccount(account_id.into()),
            Category::Private,
        ));
        self
    }

    /// Verify public images published by any of `publishers`.
    ///
    /// An empty set leaves the policy unchanged.
    #[must_use]
    pub fn with_trusted_publishers(mut self, publishers: TrustedPublishers) -> Self {
        if !publishers.is_empty() {
            self.rules.push(Rule::new(
                "trusted-publisher",
                Predicate::TrustedOwner(publishers),
                Category::Verified,
            ));
        }
        self
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule matching `meta`, if any
    #[must_use]
    pub fn matching_rule(&self, meta: &ImageMetadata) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.predicate.matches(meta))
    }

    /// Assign a category. `None` means the image did not resolve.
    #[must_use]
    pub fn classify(&self, meta: Option<&ImageMetadata>) -> Category {
        meta.map_or(Category::Unknown, |m| {
            self.matching_rule(m)
                .map_or(Category::Unverified, |rule| rule.category)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ami_core::Visibility;

    fn image(visibility: Visibility, alias: Option<&str>, owner: &str) -> ImageMetadata {
        ImageMetadata {
            owner_alias: alias.map(String::from),
            owner_id: Some(owner.to_string()),
            name: Some("test-image".into()),
            description: Some("test".into()),
            visibility,
        }
    }

    #[test]
    fn decision_table() {
        let policy = TrustPolicy::default();
        let cases = [
            (image(Visibility::Private, Some("amazon"), "137112412989"), Category::Private),
            (image(Visibility::Public, Some("amazon"), "137112412989"), Category::Verified),
            (image(Visibility::Public, Some("self"), "111122223333"), Category::Private),
            (image(Visibility::Public, Some(""), "999999999999"), Category::Unverified),
            (image(Visibility::Public, Some("12345"), "123456789012"), Category::Unverified),
            (image(Visibility::Public, None, "999999999999"), Category::Unverified),
        ];

        for (meta, expected) in &cases {
            assert_eq!(policy.classify(Some(meta)), *expected, "{meta:?}");
        }
        assert_eq!(policy.classify(None), Category::Unknown);
    }

    #[test]
    fn marketplace_alias_is_not_verified() {
        let meta = image(Visibility::Public, Some("aws-marketplace"), "679593333241");
        assert_eq!(TrustPolicy::default().classify(Some(&meta)), Category::Unverified);
    }

    #[test]
    fn unreported_visibility_is_treated_as_private() {
        let meta = image(Visibility::Unknown, None, "999999999999");
        assert_eq!(TrustPolicy::default().classify(Some(&meta)), Category::Private);
    }

    #[test]
    fn own_account_images_are_private() {
        let policy = TrustPolicy::default().with_own_account("111122223333");
        let own = image(Visibility::Public, None, "111122223333");
        let other = image(Visibility::Public, None, "444455556666");

        assert_eq!(policy.classify(Some(&own)), Category::Private);
        assert_eq!(policy.classify(Some(&other)), Category::Unverified);
        assert_eq!(policy.matching_rule(&own).map(|r| r.name), Some("own-account"));
    }

    #[test]
    fn trusted_publishers_are_verified() {
        let publishers = TrustedPublishers::parse(["099720109477"]).unwrap();
        let policy = TrustPolicy::default().with_trusted_publishers(publishers);

        let canonical = image(Visibility::Public, None, "099720109477");
        assert_eq!(policy.classify(Some(&canonical)), Category::Verified);

        // Visibility still wins over a trusted owner.
        let private = image(Visibility::Private, None, "099720109477");
        assert_eq!(policy.classify(Some(&private)), Category::Private);
    }

    #[test]
    fn empty_publisher_set_keeps_default_table() {
        let policy = TrustPolicy::default().with_trusted_publishers(TrustedPublishers::default());
        assert_eq!(policy, TrustPolicy::default());
        assert_eq!(policy.rules().len(), 3);
    }
}

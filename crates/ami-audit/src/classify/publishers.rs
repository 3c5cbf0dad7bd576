//! Operator-supplied list of publisher accounts to trust.

use std::collections::BTreeSet;

use ami_core::{AuditError, Result};

/// Set of AWS account ids whose public images count as verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedPublishers {
    accounts: BTreeSet<String>,
}

impl TrustedPublishers {
    /// Parse account ids, rejecting anything that is not a 12-digit id.
    pub fn parse<I, S>(accounts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for account in accounts {
            let account = account.as_ref().trim();
            if !is_account_id(account) {
                return Err(AuditError::Config(format!(
                    "trusted account '{account}' is not a 12-digit AWS account id"
                )));
            }
            set.insert(account.to_string());
        }
        Ok(Self { accounts: set })
    }

    /// Returns true if `account_id` is trusted
    #[must_use]
    pub fn contains(&self, account_id: &str) -> bool {
        self.accounts.contains(account_id)
    }

    /// Number of trusted accounts
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no account is trusted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Trusted accounts in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(String::as_str)
    }
}

fn is_account_id(s: &str) -> bool {
    s.len() == 12 && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_dedups() {
        let p = TrustedPublishers::parse(["099720109477", " 099720109477 ", "136693071363"]).unwrap();
        assert_eq!(p.len(), 2);
        assert!(p.contains("136693071363"));
        assert_eq!(p.iter().collect::<Vec<_>>(), ["099720109477", "136693071363"]);
    }

    #[test]
    fn rejects_aliases_and_short_ids() {
        assert!(TrustedPublishers::parse(["amazon"]).is_err());
        assert!(TrustedPublishers::parse(["12345"]).is_err());
        let err = TrustedPublishers::parse(["1234567890123"]).unwrap_err();
        assert!(err.is_fatal());
    }
}

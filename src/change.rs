//! Change numbers, patchsets, and the refs Gerrit keeps them under.

use std::sync::LazyLock;

use anyhow::Result;
use anyhow::bail;
use regex::Regex;

/// A change argument as typed on the command line: `1234` or `1234,2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeArg {
    pub number: u64,
    pub patchset: Option<u64>,
}

static CHANGE_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:[,/](\d+))?$").unwrap());

/// Parse `N` or `N,P` (a `/` separator is accepted too, matching the form
/// Gerrit change URLs use).
pub fn parse_change_arg(arg: &str) -> Result<ChangeArg> {
    let Some(captures) = CHANGE_ARG_RE.captures(arg.trim()) else {
        bail!("invalid change '{}': expected N or N,P", arg);
    };

    let number = captures[1].parse()?;
    let patchset = captures
        .get(2)
        .map(|m| m.as_str().parse())
        .transpose()?;

    Ok(ChangeArg { number, patchset })
}

/// The ref a patchset is fetched from.
///
/// Gerrit shards change refs by the last two decimal digits of the change
/// number: change 1234 patchset 2 lives at `refs/changes/34/1234/2`.
pub fn change_ref(number: u64, patchset: u64) -> String {
    format!("refs/changes/{:02}/{}/{}", number % 100, number, patchset)
}

/// The `N,P` form the `gerrit review` command addresses a patchset by.
pub fn review_id(number: u64, patchset: u64) -> String {
    format!("{},{}", number, patchset)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_only() {
        assert_eq!(
            parse_change_arg("1234").unwrap(),
            ChangeArg {
                number: 1234,
                patchset: None
            }
        );
    }

    #[test]
    fn test_parse_number_and_patchset() {
        assert_eq!(
            parse_change_arg("1234,2").unwrap(),
            ChangeArg {
                number: 1234,
                patchset: Some(2)
            }
        );
        assert_eq!(
            parse_change_arg("1234/2").unwrap(),
            ChangeArg {
                number: 1234,
                patchset: Some(2)
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_change_arg("").is_err());
        assert!(parse_change_arg("abc").is_err());
        assert!(parse_change_arg("1234,").is_err());
        assert!(parse_change_arg("1234,2,3").is_err());
        assert!(parse_change_arg("-1").is_err());
    }

    #[test]
    fn test_change_ref_sharding() {
        assert_eq!(change_ref(4, 2), "refs/changes/04/4/2");
        assert_eq!(change_ref(100, 1), "refs/changes/00/100/1");
        assert_eq!(change_ref(1234, 5), "refs/changes/34/1234/5");
        assert_eq!(change_ref(29418, 1), "refs/changes/18/29418/1");
    }

    #[test]
    fn test_review_id() {
        assert_eq!(review_id(1234, 2), "1234,2");
    }
}

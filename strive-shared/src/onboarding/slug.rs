/// Organization slugs
///
/// A slug is the lower-cased name with every run of non-alphanumeric
/// characters collapsed to a single `-`, trimmed of leading and trailing
/// dashes. Collisions are resolved by linear probing: `base`, `base-1`,
/// `base-2`, ... up to [`MAX_SLUG_PROBES`] candidates.

use std::future::Future;

/// Upper bound on existence checks per slug
pub const MAX_SLUG_PROBES: usize = 500;

/// Used when the name contains no alphanumeric characters
const FALLBACK_SLUG: &str = "organization";

/// Derives the base slug for an organization name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Candidate slug for probe number `attempt` (0 is the base itself)
pub fn slug_candidate(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// Finds the first free candidate for `base`
///
/// `exists` is called once per candidate, in order, until it reports a
/// free slug.
///
/// # Returns
///
/// None if all [`MAX_SLUG_PROBES`] candidates are taken
pub async fn find_available_slug<F, Fut>(
    base: &str,
    mut exists: F,
) -> Result<Option<String>, sqlx::Error>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, sqlx::Error>>,
{
    for attempt in 0..MAX_SLUG_PROBES {
        let candidate = slug_candidate(base, attempt);
        if !exists(candidate.clone()).await? {
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Test Completion Org"), "test-completion-org");
        assert_eq!(slugify("  Acme -- Realty, LLC  "), "acme-realty-llc");
        assert_eq!(slugify("Über Homes"), "ber-homes");
        assert_eq!(slugify("R&D 2024"), "r-d-2024");
        assert_eq!(slugify("!!!"), "organization");
        assert_eq!(slugify(""), "organization");
    }

    #[test]
    fn test_slug_candidate() {
        assert_eq!(slug_candidate("acme", 0), "acme");
        assert_eq!(slug_candidate("acme", 1), "acme-1");
        assert_eq!(slug_candidate("acme", 12), "acme-12");
    }

    async fn probe(taken: &HashSet<String>, base: &str) -> Option<String> {
        find_available_slug(base, |candidate| {
            let hit = taken.contains(&candidate);
            async move { Ok(hit) }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_free_base_is_used_as_is() {
        let taken = HashSet::new();
        assert_eq!(probe(&taken, "acme").await.as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_probes_increasing_suffixes() {
        let taken: HashSet<String> = ["duplicate-slug-test", "duplicate-slug-test-1"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            probe(&taken, "duplicate-slug-test").await.as_deref(),
            Some("duplicate-slug-test-2")
        );
    }

    #[tokio::test]
    async fn test_gives_up_after_probe_limit() {
        let taken: HashSet<String> = (0..MAX_SLUG_PROBES)
            .map(|i| slug_candidate("busy", i))
            .collect();

        assert_eq!(probe(&taken, "busy").await, None);
    }

    #[tokio::test]
    async fn test_checks_one_candidate_per_probe() {
        let mut calls = Vec::new();
        let result = find_available_slug("acme", |candidate| {
            calls.push(candidate.clone());
            let hit = candidate != "acme-2";
            async move { Ok(hit) }
        })
        .await
        .unwrap();

        assert_eq!(result.as_deref(), Some("acme-2"));
        assert_eq!(calls, vec!["acme", "acme-1", "acme-2"]);
    }
}

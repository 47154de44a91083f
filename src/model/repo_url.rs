//! Repository URL resolution.
//!
//! Formulas rarely state their source repository directly. The resolver
//! tries the head URL, then known hosting patterns on the homepage, the
//! stable archive URL and the mirror, and finally any URL that already
//! looks like a git remote.

use regex::Regex;
use std::sync::LazyLock;

/// `https://<known host>/<owner>/<repo>` with an optional `/`, `.git` or query suffix.
static KNOWN_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https://(github\.com|gitlab\.com|bitbucket\.org)/([a-zA-Z0-9_.-]+)/([a-zA-Z0-9_.-]+)(?:/|\.git|\?.*)?$",
    )
    .expect("static regex")
});

/// Release, tag-archive and tree URLs on known hosts.
static KNOWN_ARCHIVES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(
            r"^(https://github\.com/[a-zA-Z0-9_.-]+/[a-zA-Z0-9_.-]+)/(?:releases/download|archive|tree)/.*",
        )
        .expect("static regex"),
        Regex::new(
            r"^(https://gitlab\.com/[a-zA-Z0-9_.-]+/[a-zA-Z0-9_.-]+)/(?:-/archive|-/tree|uploads)/.*",
        )
        .expect("static regex"),
        Regex::new(
            r"^(https://bitbucket\.org/[a-zA-Z0-9_.-]+/[a-zA-Z0-9_.-]+)/(?:downloads|get)/.*",
        )
        .expect("static regex"),
    ]
});

/// URLs a repository can be derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepoCandidates<'a> {
    pub head: Option<&'a str>,
    pub homepage: Option<&'a str>,
    pub stable: Option<&'a str>,
    pub mirror: Option<&'a str>,
}

/// Resolve the canonical repository URL of a formula.
///
/// A head URL is returned as-is. Without one, the heuristics only run when
/// `derive` is set. An empty string means the repository is unknown.
#[must_use]
pub fn resolve_repo_url(candidates: &RepoCandidates<'_>, derive: bool) -> String {
    if let Some(head) = candidates.head.filter(|h| !h.is_empty()) {
        return head.to_string();
    }
    if !derive {
        return String::new();
    }

    if let Some(repo) = candidates.homepage.and_then(known_repo) {
        return repo;
    }

    let sources = [candidates.stable, candidates.mirror];
    for url in sources.iter().flatten() {
        if let Some(repo) = known_repo(url).or_else(|| known_archive(url)) {
            return repo;
        }
    }

    sources
        .iter()
        .flatten()
        .find(|url| url.ends_with(".git"))
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Canonical `.git` remote for a repository page on a known host.
#[must_use]
pub fn known_repo(url: &str) -> Option<String> {
    let caps = KNOWN_REPO.captures(url)?;
    let repo = caps[3].trim_end_matches(".git");
    if repo.is_empty() {
        return None;
    }
    Some(format!("https://{}/{}/{}.git", &caps[1], &caps[2], repo))
}

/// Repository embedded in a release or archive download URL.
#[must_use]
pub fn known_archive(url: &str) -> Option<String> {
    KNOWN_ARCHIVES.iter().find_map(|re| {
        re.captures(url)
            .map(|caps| format!("{}.git", caps[1].trim_end_matches(".git")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_repo_hosts() {
        assert_eq!(
            known_repo("https://github.com/mozilla/geckodriver").as_deref(),
            Some("https://github.com/mozilla/geckodriver.git")
        );
        assert_eq!(
            known_repo("https://gitlab.com/graphviz/graphviz/").as_deref(),
            Some("https://gitlab.com/graphviz/graphviz.git")
        );
        assert_eq!(
            known_repo("https://bitbucket.org/multicoreware/x265_git?tab=readme").as_deref(),
            Some("https://bitbucket.org/multicoreware/x265_git.git")
        );
    }

    #[test]
    fn test_known_repo_does_not_double_suffix() {
        assert_eq!(
            known_repo("https://github.com/foo/bar.git").as_deref(),
            Some("https://github.com/foo/bar.git")
        );
    }

    #[test]
    fn test_known_repo_rejects_deep_paths_and_other_hosts() {
        assert_eq!(known_repo("https://github.com/foo/bar/wiki/Home"), None);
        assert_eq!(known_repo("https://www.gnu.org/software/wget/"), None);
        assert_eq!(known_repo("http://github.com/foo/bar"), None);
    }

    #[test]
    fn test_known_archive() {
        assert_eq!(
            known_archive("https://github.com/jqlang/jq/releases/download/jq-1.7.1/jq-1.7.1.tar.gz")
                .as_deref(),
            Some("https://github.com/jqlang/jq.git")
        );
        assert_eq!(
            known_archive("https://github.com/foo/bar/archive/refs/tags/v1.0.tar.gz").as_deref(),
            Some("https://github.com/foo/bar.git")
        );
        assert_eq!(
            known_archive("https://gitlab.com/foo/bar/-/archive/v1/bar-v1.tar.gz").as_deref(),
            Some("https://gitlab.com/foo/bar.git")
        );
        assert_eq!(
            known_archive("https://bitbucket.org/foo/bar/get/v1.tar.gz").as_deref(),
            Some("https://bitbucket.org/foo/bar.git")
        );
        assert_eq!(
            known_archive("https://github.com/foo/bar/tree/v1.0").as_deref(),
            Some("https://github.com/foo/bar.git")
        );
        assert_eq!(known_archive("https://ftp.gnu.org/gnu/wget/wget-1.24.tar.gz"), None);
    }

    #[test]
    fn test_head_wins_over_homepage() {
        let candidates = RepoCandidates {
            head: Some("https://hg.mozilla.org/mozilla-central/"),
            homepage: Some("https://github.com/mozilla/geckodriver"),
            ..Default::default()
        };
        assert_eq!(
            resolve_repo_url(&candidates, true),
            "https://hg.mozilla.org/mozilla-central/"
        );
        assert_eq!(
            resolve_repo_url(&candidates, false),
            "https://hg.mozilla.org/mozilla-central/"
        );
    }

    #[test]
    fn test_priority_order() {
        let candidates = RepoCandidates {
            homepage: Some("https://example.org"),
            stable: Some("https://ftp.example.org/foo-1.0.tar.gz"),
            mirror: Some("https://github.com/foo/foo/releases/download/v1.0/foo-1.0.tar.gz"),
            ..Default::default()
        };
        assert_eq!(
            resolve_repo_url(&candidates, true),
            "https://github.com/foo/foo.git"
        );
    }

    #[test]
    fn test_git_suffix_fallback() {
        let candidates = RepoCandidates {
            stable: Some("https://git.savannah.gnu.org/git/foo.git"),
            ..Default::default()
        };
        assert_eq!(
            resolve_repo_url(&candidates, true),
            "https://git.savannah.gnu.org/git/foo.git"
        );
    }

    #[test]
    fn test_unresolved_is_empty() {
        let candidates = RepoCandidates {
            homepage: Some("https://www.gnu.org/software/wget/"),
            stable: Some("https://ftp.gnu.org/gnu/wget/wget-1.24.5.tar.gz"),
            ..Default::default()
        };
        assert_eq!(resolve_repo_url(&candidates, true), "");
    }

    #[test]
    fn test_no_derivation_without_head() {
        let candidates = RepoCandidates {
            homepage: Some("https://github.com/foo/bar"),
            ..Default::default()
        };
        assert_eq!(resolve_repo_url(&candidates, false), "");
    }
}

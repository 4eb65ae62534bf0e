//! Layered identifier resolution
//!
//! Resolves human- or tool-supplied identifiers (paths, names, endpoint
//! signatures, in-source references) to tracked file paths through five
//! ordered tiers. The first tier that produces results wins; lower tiers
//! are not attempted. Matching runs entirely against the search index, so
//! no query ever touches the network.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use xsync_fs::SOURCE_EXT;
use xsync_fs::names::{sanitize, sanitize_path, snake_case, snake_path};
use xsync_remote::ObjectType;
use xsync_store::{SearchIndex, SearchIndexEntry};

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactPath,
    Basename,
    SanitizedBasename,
    EndpointSignature,
    PathSuffix,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::ExactPath => "exact-path",
            Self::Basename => "basename",
            Self::SanitizedBasename => "sanitized-basename",
            Self::EndpointSignature => "endpoint-signature",
            Self::PathSuffix => "path-suffix",
        };
        write!(f, "{label}")
    }
}

/// One resolved identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMatch {
    pub path: String,
    pub tier: MatchTier,
    pub name: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
}

static ENDPOINT_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+)_(get|post|put|delete|patch)$").expect("valid endpoint query pattern")
});

static DB_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bdb\.\w+\s+"?([A-Za-z0-9_]+)"?"#).expect("valid db reference pattern")
});

static FUNCTION_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bfunction\.run\s+"([^"]+)""#).expect("valid function reference pattern")
});

/// Kind of an in-source reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Table,
    Function,
}

/// A `db.<op> <table>` or `function.run "<name>"` construct found in
/// source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReference {
    pub kind: ReferenceKind,
    pub name: String,
}

/// Layered resolver over a search index.
pub struct Resolver<'a> {
    index: &'a SearchIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self { index }
    }

    /// Resolve a query through the five tiers, first non-empty tier wins.
    /// Results are deduplicated by path, preserving index order.
    pub fn resolve(&self, query: &str) -> Vec<ResolvedMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        // lower tiers are not attempted once a tier produces results
        let found = self.exact_path(query);
        if !found.is_empty() {
            return dedup_by_path(MatchTier::ExactPath, found);
        }
        let found = self.basename(query);
        if !found.is_empty() {
            return dedup_by_path(MatchTier::Basename, found);
        }
        let found = self.sanitized_basename(query);
        if !found.is_empty() {
            return dedup_by_path(MatchTier::SanitizedBasename, found);
        }
        let found = self.endpoint_signature(query);
        if !found.is_empty() {
            return dedup_by_path(MatchTier::EndpointSignature, found);
        }
        let found = self.path_suffix(query);
        if !found.is_empty() {
            return dedup_by_path(MatchTier::PathSuffix, found);
        }
        Vec::new()
    }

    /// Tier 1: the query is a tracked path, with or without the source
    /// extension.
    fn exact_path(&self, query: &str) -> Vec<&'a SearchIndexEntry> {
        self.index.lookup_path(query).into_iter().collect()
    }

    /// Tier 2: the query equals a tracked file's basename.
    fn basename(&self, query: &str) -> Vec<&'a SearchIndexEntry> {
        self.index.lookup_basename(query)
    }

    /// Tier 3: the sanitized query matches a precomputed basename variant
    /// (sanitized or snake-cased). Verb-case normalization is tier 4's
    /// job, so only the plain sanitizer is applied here.
    fn sanitized_basename(&self, query: &str) -> Vec<&'a SearchIndexEntry> {
        self.index.lookup_sanitized(&sanitize(query))
    }

    /// Tier 4: `{path}_{VERB}` queries are split, the path portion
    /// sanitized, and the signature recombined with the canonical
    /// uppercase verb before matching basename variants.
    fn endpoint_signature(&self, query: &str) -> Vec<&'a SearchIndexEntry> {
        let Some(captures) = ENDPOINT_QUERY.captures(query) else {
            return Vec::new();
        };
        let path_part = &captures[1];
        let verb = captures[2].to_ascii_uppercase();
        let signature = format!("{}_{}", sanitize(path_part), verb);

        let mut entries = self.index.lookup_basename(&signature);
        entries.extend(self.index.lookup_sanitized(&sanitize(&signature)));
        entries.extend(self.index.lookup_sanitized(&snake_case(&signature)));
        entries
    }

    /// Tier 5: only for queries containing a path separator; a tracked
    /// object matches when its plain or sanitized path-without-extension
    /// ends with either sanitized query form, aligned at a segment
    /// boundary.
    fn path_suffix(&self, query: &str) -> Vec<&'a SearchIndexEntry> {
        if !query.contains('/') {
            return Vec::new();
        }
        let stripped = query
            .strip_suffix(&format!(".{SOURCE_EXT}"))
            .unwrap_or(query);
        let sanitized = sanitize_path(stripped);
        let snaked = snake_path(stripped);

        self.index
            .entries()
            .iter()
            .filter(|entry| {
                suffix_matches(&entry.path_no_ext, stripped)
                    || suffix_matches(&entry.sanitized_path, &sanitized)
                    || suffix_matches(&entry.snake_path, &snaked)
            })
            .collect()
    }

    /// Resolve a `db.<op> <table>` reference by exact or snake-cased
    /// table basename.
    pub fn resolve_table_reference(&self, table: &str) -> Option<ResolvedMatch> {
        let path = self.index.table_path(table)?;
        let entry = self.index.lookup_path(path)?;
        Some(to_match(MatchTier::Basename, entry))
    }

    /// Resolve a `function.run "<name>"` reference: path-suffix first,
    /// then basename-only fallback.
    pub fn resolve_function_reference(&self, name: &str) -> Option<ResolvedMatch> {
        if name.contains('/') {
            let suffix = self
                .path_suffix(name)
                .into_iter()
                .find(|e| e.object_type == ObjectType::Function);
            if let Some(entry) = suffix {
                return Some(to_match(MatchTier::PathSuffix, entry));
            }
        }
        let wanted_snake = snake_case(name);
        let target = self
            .index
            .functions()
            .iter()
            .find(|f| f.name == name || snake_case(&f.name) == wanted_snake)?;
        let entry = self.index.lookup_path(&target.path)?;
        Some(to_match(MatchTier::Basename, entry))
    }

    /// Scan source text and resolve every reference it contains.
    pub fn resolve_references(
        &self,
        content: &str,
    ) -> Vec<(SourceReference, Option<ResolvedMatch>)> {
        scan_references(content)
            .into_iter()
            .map(|reference| {
                let resolved = match reference.kind {
                    ReferenceKind::Table => self.resolve_table_reference(&reference.name),
                    ReferenceKind::Function => self.resolve_function_reference(&reference.name),
                };
                (reference, resolved)
            })
            .collect()
    }
}

/// Find `db.<op>` and `function.run` constructs, in order of appearance.
pub fn scan_references(content: &str) -> Vec<SourceReference> {
    let mut found: Vec<(usize, SourceReference)> = Vec::new();
    for captures in DB_REFERENCE.captures_iter(content) {
        let at = captures.get(0).map(|m| m.start()).unwrap_or(0);
        found.push((
            at,
            SourceReference {
                kind: ReferenceKind::Table,
                name: captures[1].to_string(),
            },
        ));
    }
    for captures in FUNCTION_REFERENCE.captures_iter(content) {
        let at = captures.get(0).map(|m| m.start()).unwrap_or(0);
        found.push((
            at,
            SourceReference {
                kind: ReferenceKind::Function,
                name: captures[1].to_string(),
            },
        ));
    }
    found.sort_by_key(|(at, _)| *at);
    found.into_iter().map(|(_, reference)| reference).collect()
}

fn suffix_matches(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack == needle || haystack.ends_with(&format!("/{needle}"))
}

fn to_match(tier: MatchTier, entry: &SearchIndexEntry) -> ResolvedMatch {
    ResolvedMatch {
        path: entry.path.clone(),
        tier,
        name: entry.name.clone(),
        object_type: entry.object_type,
    }
}

fn dedup_by_path(tier: MatchTier, entries: Vec<&SearchIndexEntry>) -> Vec<ResolvedMatch> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.path.clone()))
        .map(|entry| to_match(tier, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsync_store::{ObjectStore, TrackedObject};

    fn index() -> SearchIndex {
        let mut store = ObjectStore::new();
        store.upsert(TrackedObject::new(
            10,
            ObjectType::ApiEndpoint,
            "apis/auth/login_POST.xs",
            "api POST /auth/login {}",
        ));
        store.upsert(TrackedObject::new(
            20,
            ObjectType::Function,
            "functions/login.xs",
            "function login {}",
        ));
        store.upsert(TrackedObject::new(
            30,
            ObjectType::Table,
            "tables/UserProfiles.xs",
            "table UserProfiles {}",
        ));
        SearchIndex::build(&store)
    }

    #[test]
    fn exact_path_short_circuits_lower_tiers() {
        let index = index();
        let resolver = Resolver::new(&index);

        let matches = resolver.resolve("apis/auth/login_POST.xs");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "apis/auth/login_POST.xs");
        assert_eq!(matches[0].tier, MatchTier::ExactPath);
    }

    #[test]
    fn exact_path_matches_without_extension() {
        let index = index();
        let resolver = Resolver::new(&index);

        let matches = resolver.resolve("functions/login");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tier, MatchTier::ExactPath);
    }

    #[test]
    fn endpoint_signature_query_finds_only_the_endpoint() {
        let index = index();
        let resolver = Resolver::new(&index);

        // matches the endpoint, never functions/login.xs
        let matches = resolver.resolve("login_POST");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "apis/auth/login_POST.xs");
        assert_eq!(matches[0].object_type, ObjectType::ApiEndpoint);
    }

    #[test]
    fn basename_tier_matches_plain_names() {
        let index = index();
        let resolver = Resolver::new(&index);

        let matches = resolver.resolve("login");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "functions/login.xs");
        assert_eq!(matches[0].tier, MatchTier::Basename);
    }

    #[test]
    fn sanitized_tier_normalizes_the_query() {
        let index = index();
        let resolver = Resolver::new(&index);

        let matches = resolver.resolve("user profiles");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "tables/UserProfiles.xs");
        assert_eq!(matches[0].tier, MatchTier::SanitizedBasename);
    }

    #[test]
    fn lowercase_verb_query_reaches_the_endpoint_tier() {
        let index = index();
        let resolver = Resolver::new(&index);

        let matches = resolver.resolve("Login_post");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "apis/auth/login_POST.xs");
        assert_eq!(matches[0].tier, MatchTier::EndpointSignature);
    }

    #[test]
    fn endpoint_tier_restores_canonical_verb_case() {
        let mut store = ObjectStore::new();
        // a hook-sanitized basename that plain normalization cannot reach
        store.upsert(TrackedObject::new(
            11,
            ObjectType::ApiEndpoint,
            "apis/auth/AUTH-LOGIN_POST.xs",
            "api POST /auth/login {}",
        ));
        let index = SearchIndex::build(&store);
        let resolver = Resolver::new(&index);

        let matches = resolver.resolve("AUTH-LOGIN_post");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tier, MatchTier::EndpointSignature);
    }

    #[test]
    fn path_suffix_requires_separator() {
        let index = index();
        let resolver = Resolver::new(&index);

        let matches = resolver.resolve("auth/login_POST");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "apis/auth/login_POST.xs");

        // segment boundaries are respected: "th/login_POST" is no suffix
        assert!(resolver.resolve("th/login_POST").is_empty());
    }

    #[test]
    fn unknown_query_resolves_to_nothing() {
        let index = index();
        let resolver = Resolver::new(&index);
        assert!(resolver.resolve("does_not_exist").is_empty());
        assert!(resolver.resolve("").is_empty());
    }

    #[test]
    fn table_references_match_exact_and_snake() {
        let index = index();
        let resolver = Resolver::new(&index);

        let exact = resolver.resolve_table_reference("UserProfiles").unwrap();
        assert_eq!(exact.path, "tables/UserProfiles.xs");

        let snaked = resolver.resolve_table_reference("user_profiles").unwrap();
        assert_eq!(snaked.path, "tables/UserProfiles.xs");

        assert!(resolver.resolve_table_reference("unknown").is_none());
    }

    #[test]
    fn function_references_prefer_path_suffix() {
        let mut store = ObjectStore::new();
        store.upsert(TrackedObject::new(
            1,
            ObjectType::Function,
            "functions/billing/login.xs",
            "function login {}",
        ));
        store.upsert(TrackedObject::new(
            2,
            ObjectType::Function,
            "functions/login.xs",
            "function login {}",
        ));
        let index = SearchIndex::build(&store);
        let resolver = Resolver::new(&index);

        let suffixed = resolver.resolve_function_reference("billing/login").unwrap();
        assert_eq!(suffixed.path, "functions/billing/login.xs");
        assert_eq!(suffixed.tier, MatchTier::PathSuffix);

        let plain = resolver.resolve_function_reference("login").unwrap();
        assert_eq!(plain.path, "functions/billing/login.xs");
        assert_eq!(plain.tier, MatchTier::Basename);
    }

    #[test]
    fn scan_references_finds_db_and_function_constructs() {
        let content = r#"
function checkout {
  var user = db.get users
  db.add "orders"
  function.run "billing/charge_card"
}
"#;
        let references = scan_references(content);

        assert_eq!(
            references,
            vec![
                SourceReference {
                    kind: ReferenceKind::Table,
                    name: "users".to_string()
                },
                SourceReference {
                    kind: ReferenceKind::Table,
                    name: "orders".to_string()
                },
                SourceReference {
                    kind: ReferenceKind::Function,
                    name: "billing/charge_card".to_string()
                },
            ]
        );
    }

    #[test]
    fn resolve_references_pairs_each_construct_with_a_path() {
        let mut store = ObjectStore::new();
        store.upsert(TrackedObject::new(1, ObjectType::Table, "tables/users.xs", "table users {}"));
        store.upsert(TrackedObject::new(
            2,
            ObjectType::Function,
            "functions/billing/charge_card.xs",
            "function charge_card {}",
        ));
        let index = SearchIndex::build(&store);
        let resolver = Resolver::new(&index);

        let resolved = resolver.resolve_references(
            "db.get users\nfunction.run \"billing/charge_card\"\ndb.del ghosts\n",
        );

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].1.as_ref().unwrap().path, "tables/users.xs");
        assert_eq!(
            resolved[1].1.as_ref().unwrap().path,
            "functions/billing/charge_card.xs"
        );
        assert!(resolved[2].1.is_none());
    }
}

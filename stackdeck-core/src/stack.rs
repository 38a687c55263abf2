use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A stack as declared by the build tool, in declared order.
///
/// `full_name` is the authoritative identifier handed to deploy/destroy;
/// `backing_id` is the key used for status lookups in the backing store;
/// `display_name` is presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredStack {
    pub display_name: String,
    pub full_name: String,
    pub backing_id: String,
}

impl DeclaredStack {
    /// Parse a single listing line, e.g. `Pipeline/ServiceA (cf-servicea-prod)`.
    /// The trailing parenthesized token is the backing-store identifier; when
    /// absent, the declared name doubles as the backing id.
    pub fn parse(line: &str) -> Self {
        let full_name = line.trim().to_string();

        let backing_id = trailing_parenthesized(&full_name)
            .unwrap_or(full_name.as_str())
            .to_string();

        // Last path segment, kept verbatim (including any trailing id).
        let display_name = full_name
            .rsplit('/')
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();

        Self {
            display_name,
            full_name,
            backing_id,
        }
    }
}

fn trailing_parenthesized(name: &str) -> Option<&str> {
    let inner = name.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let id = inner[open + 1..].trim();
    if id.is_empty() { None } else { Some(id) }
}

/// Lines the listing command emits that are not stacks: synthesizer warnings,
/// build banners, notice blocks. Matched case-insensitively against the
/// trimmed line.
const NOISE_PATTERNS: &[&str] = &[
    r"^\[(warning|error|info|notice)\b",
    r"^(warning|error|info|notice)[:\s]",
    r"^notices?\b",
    r"^bundling\b",
    r"^(npm|yarn|pnpm)\b",
    r"^\d+\s+notices?\b",
    r"^if you ",
];

fn builtin_noise() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        NOISE_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("builtin noise pattern must compile"))
            .collect()
    })
}

/// Parse the raw stack listing into declared stacks, in declared order.
///
/// Noise lines are stripped by pattern; `extra_noise` comes from user config
/// (already-compiled patterns). Blank lines are always dropped.
pub fn parse_listing(raw: &str, extra_noise: &[Regex]) -> Vec<DeclaredStack> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let noisy = builtin_noise().iter().chain(extra_noise).any(|re| re.is_match(line));
            if noisy {
                log::debug!("dropping noise line from listing: {line}");
            }
            !noisy
        })
        .map(DeclaredStack::parse)
        .collect()
}

/// Compile user-supplied noise patterns, skipping (and logging) invalid ones
/// rather than failing the whole listing.
pub fn compile_noise_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(&format!("(?i){p}")) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("ignoring invalid noise pattern '{p}': {e}");
                None
            }
        })
        .collect()
}

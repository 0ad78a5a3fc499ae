//! Mod token extraction and canonicalization.
//!
//! Raw tokens pulled from log lines are noisy: file names with versions,
//! loader tags, forks of the same mod under different names. They are
//! folded into one canonical id per mod using the [`TokenTables`].

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic words that are never mod ids.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "minecraft", "java", "client", "server", "mixin", "thread", "launch", "error", "warn",
    "debug", "trace", "info", "render", "fabric", "forge", "quilt", "neoforge", "net", "com",
    "org", "mod", "mods", "modid", "file", "jar", "loading", "loader", "main", "unknown", "null",
    "none", "the", "lang", "util", "config", "class", "resource", "resources", "library",
    "native", "game", "world", "data", "has", "was", "been", "failed", "for", "from", "with",
    "and",
];

/// Forks and renames folded into one canonical id. The first member is
/// the canonical id.
pub const DEFAULT_ALIAS_GROUPS: &[&[&str]] = &[
    &["sodium", "rubidium", "embeddium", "magnesium", "chlorine"],
    &["iris", "oculus"],
    &["lithium", "radium", "canary"],
    &["optifine", "optifabric"],
    &["jei", "justenoughitems"],
    &["rei", "roughlyenoughitems"],
    &["architectury", "architectury_api", "architectury-api"],
    &["fabric-api", "fabric_api", "fabricapi"],
    &["cloth-config", "cloth_config", "clothconfig", "cloth-config2"],
    &["modmenu", "mod_menu", "mod-menu"],
    &["geckolib", "geckolib3", "geckolib4"],
];

/// Package roots that never name a mod.
const FRAMEWORK_PREFIXES: &[&str] = &[
    "java.", "javax.", "jdk.", "sun.", "com.sun.", "kotlin.", "scala.", "net.minecraft.",
    "com.mojang.", "cpw.mods.", "net.minecraftforge.", "net.neoforged.", "net.fabricmc.",
    "org.quiltmc.", "org.spongepowered.", "org.lwjgl.", "io.netty.", "com.google.",
    "org.apache.", "org.slf4j.", "it.unimi.", "org.objectweb.", "com.electronwill.",
];

/// Leading package segments that are reverse-DNS roots.
const PACKAGE_ROOTS: &[&str] = &[
    "com", "net", "org", "io", "me", "dev", "de", "fr", "ru", "cn", "xyz", "gg", "uk", "info",
    "top",
];

/// Package segments that describe code layout rather than a mod.
const LAYOUT_SEGMENTS: &[&str] = &[
    "mods", "mod", "common", "client", "server", "core", "api", "impl", "mixin", "mixins",
    "util", "utils", "internal", "main", "base",
];

static MC_VERSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_+]mc\d+(?:\.\d+)*.*$").unwrap_or_else(|_| unreachable!()));

static VERSION_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-_+]v?\d+(?:\.\d+)+(?:[-_+.][0-9a-z.+_-]*)?$").unwrap_or_else(|_| unreachable!())
});

static LOADER_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-_](?:fabric|forge|neoforge|quilt)$").unwrap_or_else(|_| unreachable!())
});

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9._-]").unwrap_or_else(|_| unreachable!()));

/// Patterns pulling raw suspect tokens out of a lowercased line.
static SUSPECT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b([a-z0-9][a-z0-9_.+-]*\.jar)\b",
        r#"\bmod(?:id)?\s*[:=]\s*['"]?([a-z0-9][a-z0-9_.-]*)"#,
        r#"\bfrom\s+mod\s+['"]?([a-z0-9][a-z0-9_.-]*)"#,
        r#"\bloading\s+['"]?([a-z0-9][a-z0-9_.-]*)['"]?\s+failed"#,
        r#"\bmod\s+['"]?([a-z0-9][a-z0-9_.-]*)['"]?\s+has\s+failed"#,
        r"\b([a-z0-9_-]+)(?:\.[a-z0-9_-]+)*?\.mixins\.json",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|_| unreachable!()))
    .collect()
});

/// `at pkg.Class.method(` frames; captures the class path.
static FRAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*at\s+(?:[\w.$-]+//?)?([a-z0-9_$]+(?:\.[a-z0-9_$]+)+)\.[a-z0-9_$<>]+\(")
        .unwrap_or_else(|_| unreachable!())
});

/// The stricter patterns used for failed mods.
static FAILED_MOD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"\bmod\s+(?:file\s+)?['"]?([a-z0-9][a-z0-9_.+-]*)['"]?\s+(?:has\s+)?failed"#,
        r#"\bloading\s+(?:mod\s+)?['"]?([a-z0-9][a-z0-9_.+-]*)['"]?\s+failed"#,
        r#"\bfailed\s+to\s+load\s+(?:mod\s+)?(?:file\s+)?['"]?([a-z0-9][a-z0-9_.+-]*)"#,
        r"\b([a-z0-9][a-z0-9_.+-]*\.jar)\b.*?\bfailed",
        r#"\bmod\s+['"]([a-z0-9][a-z0-9_.+-]*)['"]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|_| unreachable!()))
    .collect()
});

static BUILTIN_TABLES: Lazy<TokenTables> =
    Lazy::new(|| TokenTables::new(DEFAULT_BLOCKLIST, DEFAULT_ALIAS_GROUPS));

/// Blocklist and alias groups used to canonicalize tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenTables {
    blocklist: HashSet<String>,
    aliases: Vec<(String, Vec<String>)>,
}

impl TokenTables {
    /// Builds tables from a blocklist and alias groups. The first member
    /// of each group is its canonical id.
    #[must_use]
    pub fn new(blocklist: &[&str], alias_groups: &[&[&str]]) -> Self {
        let aliases = alias_groups
            .iter()
            .filter_map(|group| {
                let canonical = group.first()?;
                let members = group.iter().map(|m| m.to_lowercase()).collect();
                Some((canonical.to_lowercase(), members))
            })
            .collect();
        Self {
            blocklist: blocklist.iter().map(|w| w.to_lowercase()).collect(),
            aliases,
        }
    }

    /// The builtin tables, built once.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_TABLES
    }

    /// Returns true if `token` is a generic word.
    #[must_use]
    pub fn is_blocked(&self, token: &str) -> bool {
        self.blocklist.contains(token)
    }

    /// Folds a cleaned token onto its alias group's canonical id.
    ///
    /// Only exact members fold; `sodium-extra` is its own mod.
    #[must_use]
    pub fn canonical(&self, token: &str) -> String {
        self.aliases
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == token))
            .map_or_else(|| token.to_string(), |(canonical, _)| canonical.clone())
    }
}

/// Canonicalizes a raw token.
///
/// Lowercases, strips `.jar`, Minecraft-version suffixes, trailing dotted
/// versions and loader tags, removes characters outside `[a-z0-9._-]`,
/// then rejects short, numeric or blocklisted tokens and folds aliases.
#[must_use]
pub fn normalize_mod_token(raw: &str, tables: &TokenTables) -> Option<String> {
    let mut token = raw
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_lowercase();
    if let Some(stem) = token.strip_suffix(".jar") {
        token = stem.to_string();
    }
    token = MC_VERSION_SUFFIX.replace(&token, "").into_owned();
    token = VERSION_SUFFIX.replace(&token, "").into_owned();
    token = LOADER_SUFFIX.replace(&token, "").into_owned();
    token = DISALLOWED_CHARS.replace_all(&token, "").into_owned();
    let token = token.trim_matches(|c| c == '.' || c == '-' || c == '_');

    if token.len() < 2
        || token.chars().all(|c| c.is_ascii_digit() || c == '.')
        || tables.is_blocked(token)
    {
        return None;
    }

    let canonical = tables.canonical(token);
    (!tables.is_blocked(&canonical)).then_some(canonical)
}

/// Picks the package segment most likely to name the mod owning a class.
///
/// Framework packages yield nothing. Otherwise the reverse-DNS root and
/// layout segments are skipped; of what remains, the second segment wins
/// when there are two or more (the first is usually the author).
#[must_use]
pub fn class_path_token(class_path: &str, tables: &TokenTables) -> Option<String> {
    let lower = class_path.to_lowercase();
    if FRAMEWORK_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }
    let segments: Vec<&str> = lower.split('.').collect();
    let (_, packages) = segments.split_last()?;
    let mut packages = packages.iter().copied();
    let mut meaningful: Vec<&str> = Vec::new();
    if let Some(first) = packages.next() {
        if !PACKAGE_ROOTS.contains(&first) {
            meaningful.push(first);
        }
    }
    meaningful.extend(packages.filter(|s| !LAYOUT_SEGMENTS.contains(s)));

    let pick = if meaningful.len() >= 2 {
        meaningful[1]
    } else {
        *meaningful.first()?
    };
    normalize_mod_token(pick, tables)
}

/// Extracts canonical suspect tokens from one lowercased line.
///
/// Returns each token once, in first-seen order.
#[must_use]
pub fn suspect_tokens(lower_message: &str, tables: &TokenTables) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut push = |token: Option<String>| {
        if let Some(token) = token {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    };

    for pattern in SUSPECT_PATTERNS.iter() {
        for caps in pattern.captures_iter(lower_message) {
            push(caps.get(1).and_then(|m| normalize_mod_token(m.as_str(), tables)));
        }
    }
    if let Some(caps) = FRAME_PATTERN.captures(lower_message) {
        push(caps.get(1).and_then(|m| class_path_token(m.as_str(), tables)));
    }
    tokens
}

/// Extracts canonical failed-mod tokens from one lowercased line.
#[must_use]
pub fn failed_mod_tokens(lower_message: &str, tables: &TokenTables) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for pattern in FAILED_MOD_PATTERNS.iter() {
        for caps in pattern.captures_iter(lower_message) {
            if let Some(token) = caps.get(1).and_then(|m| normalize_mod_token(m.as_str(), tables)) {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
        }
    }
    tokens
}

/// Turns an id into a display label: `cloth-config` → `Cloth Config`.
#[must_use]
pub fn titleize(id: &str) -> String {
    id.split(['-', '_', '.', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Cause rule catalogue.
//!
//! Rules are plain data: an id, a title, a set of case-insensitive
//! patterns, a weight and fix suggestions. One generic engine
//! ([`crate::causes::score_causes`]) evaluates every rule; adding a rule
//! is a data change.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{RegexSet, RegexSetBuilder};

use crate::error::{AnalyzeError, Result};

/// A compiled cause rule.
#[derive(Debug, Clone)]
pub struct CauseRule {
    id: String,
    title: String,
    patterns: RegexSet,
    weight: f64,
    fixes: Vec<String>,
}

impl CauseRule {
    /// Compiles a rule.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::InvalidRule`] when the id is blank, the
    /// pattern list is empty, a pattern fails to compile, or the weight is
    /// not a positive finite number.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        patterns: &[&str],
        weight: f64,
        fixes: &[&str],
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AnalyzeError::invalid_rule(id, "id must not be blank"));
        }
        if patterns.is_empty() {
            return Err(AnalyzeError::invalid_rule(id, "at least one pattern is required"));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(AnalyzeError::invalid_rule(
                id,
                format!("weight must be positive, got {weight}"),
            ));
        }
        let patterns = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()
            .map_err(|e| AnalyzeError::invalid_rule(id.clone(), e.to_string()))?;

        Ok(Self {
            id,
            title: title.into(),
            patterns,
            weight,
            fixes: fixes.iter().map(|f| (*f).to_string()).collect(),
        })
    }

    /// Rule identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Base weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Fix suggestions.
    #[must_use]
    pub fn fixes(&self) -> &[String] {
        &self.fixes
    }

    /// Returns true if any pattern matches the raw message.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        self.patterns.is_match(message)
    }
}

/// An ordered, immutable set of cause rules with unique ids.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<CauseRule>,
}

impl RuleCatalog {
    /// Builds a catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::DuplicateRule`] if two rules share an id.
    pub fn new(rules: Vec<CauseRule>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(AnalyzeError::DuplicateRule(rule.id.clone()));
            }
        }
        Ok(Self { rules })
    }

    /// The builtin crash-signature catalogue, compiled once.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_CATALOG
    }

    /// All rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[CauseRule] {
        &self.rules
    }

    /// Looks a rule up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CauseRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalogue holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

struct RuleSpec {
    id: &'static str,
    title: &'static str,
    patterns: &'static [&'static str],
    weight: f64,
    fixes: &'static [&'static str],
}

const BUILTIN_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "mixin_failure",
        title: "Mixin injection failure",
        patterns: &[
            r"mixin apply(?:ing)? (?:for mod \S+ )?failed",
            r"mixinapplyerror|invalidmixinexception|mixintransformererror|invalidinjectionexception",
            r"critical injection failure",
            r"mixin prepare for mod \S+ failed",
            r"\.mixins\.json.*(?:failed|error|invalid)",
        ],
        weight: 3.2,
        fixes: &[
            "Update the mod named in the mixin error and its dependencies.",
            "Remove recently added mods that patch the same game code.",
            "Check that every mod targets the same game version.",
        ],
    },
    RuleSpec {
        id: "missing_class_or_method",
        title: "Missing class, method or field",
        patterns: &[
            r"noclassdeffounderror",
            r"classnotfoundexception",
            r"nosuchmethoderror|nosuchmethodexception",
            r"nosuchfielderror|nosuchfieldexception",
            r"could not find (?:target )?(?:class|method|field)",
        ],
        weight: 3.0,
        fixes: &[
            "Install or update the library mod that provides the missing class.",
            "Make sure all mods are built for this game and loader version.",
            "Remove outdated addons of the mod named in the stack trace.",
        ],
    },
    RuleSpec {
        id: "dependency_mismatch",
        title: "Missing or incompatible dependency",
        patterns: &[
            r"requires (?:any version of |version \S+ (?:or later )?of )?mod",
            r"missing (?:or unsupported )?(?:mandatory |required )?dependenc",
            r"incompatible mod set",
            r"unmet dependency|dependency .* (?:is )?missing",
            r"depends on .*, which is missing",
            r"mod .* requires .* version",
        ],
        weight: 3.1,
        fixes: &[
            "Install the missing dependency mentioned in the log.",
            "Update or downgrade the dependency to the required version.",
            "Remove the mod that requires the unavailable dependency.",
        ],
    },
    RuleSpec {
        id: "wrong_loader",
        title: "Mod built for a different loader",
        patterns: &[
            r"this mod is (?:for|made for) (?:forge|fabric|quilt|neoforge)",
            r"not a valid (?:fabric|forge|quilt|neoforge) mod",
            r"found (?:a )?(?:forge|fabric|quilt|neoforge) mod .* (?:on|in|under) (?:forge|fabric|quilt|neoforge)",
            r"requires (?:the )?(?:forge|fabric|quilt|neoforge) (?:mod )?loader",
            r"incompatible (?:mod )?loader",
        ],
        weight: 2.6,
        fixes: &[
            "Download the build of the mod made for this instance's loader.",
            "Remove mods that target another loader.",
        ],
    },
    RuleSpec {
        id: "duplicate_mods",
        title: "Duplicate mods installed",
        patterns: &[
            r"duplicate mods?\b",
            r"duplicatemodsfoundexception",
            r"found (?:a )?duplicate",
            r"is (?:already )?(?:loaded|present) (?:twice|more than once)",
        ],
        weight: 2.8,
        fixes: &[
            "Keep one copy of each mod in the mods folder.",
            "Remove old versions left behind after updating.",
        ],
    },
    RuleSpec {
        id: "bad_mod_metadata",
        title: "Invalid mod metadata",
        patterns: &[
            r"(?:invalid|malformed|missing|corrupt) (?:mod )?metadata",
            r"failed to (?:read|parse|load) (?:fabric\.mod\.json|mods\.toml|neoforge\.mods\.toml|quilt\.mod\.json)",
            r"(?:fabric\.mod\.json|mods\.toml|quilt\.mod\.json).*(?:invalid|malformed|error)",
            r"zip(?:exception| file).*(?:invalid|corrupt|error)",
        ],
        weight: 2.4,
        fixes: &[
            "Re-download the mod file; it may be corrupt or incomplete.",
            "Remove files in the mods folder that are not mods.",
        ],
    },
    RuleSpec {
        id: "service_loader_failure",
        title: "Service loader failure",
        patterns: &[
            r"serviceconfigurationerror",
            r"provider \S+ (?:not found|could not be instantiated)",
            r"serviceloader.*(?:failed|error)",
        ],
        weight: 2.2,
        fixes: &[
            "Update the loader and the language provider mods.",
            "Remove mods that bundle conflicting library versions.",
        ],
    },
    RuleSpec {
        id: "config_parse_error",
        title: "Broken configuration file",
        patterns: &[
            r"failed to (?:load|parse|read) (?:the )?config",
            r"config(?:uration)? file .* (?:is )?(?:invalid|corrupt|malformed)",
            r"parsingexception|malformedjsonexception|jsonsyntaxexception",
            r"(?:toml|json5?|yaml) .*(?:parse|syntax) error",
        ],
        weight: 2.0,
        fixes: &[
            "Delete or reset the config file named in the error; it is regenerated on launch.",
            "Fix the syntax error at the reported line of the config file.",
        ],
    },
    RuleSpec {
        id: "access_transformer_failure",
        title: "Access transformer or widener failure",
        patterns: &[
            r"access ?transformer.*(?:fail|error|invalid)",
            r"access ?widener.*(?:fail|error|invalid)",
            r"accesstransformer|accesswidenerformatexception",
        ],
        weight: 2.3,
        fixes: &[
            "Update the mod that ships the failing access transformer.",
            "Check that the mod matches the installed game version.",
        ],
    },
    RuleSpec {
        id: "java_version_mismatch",
        title: "Wrong Java version",
        patterns: &[
            r"unsupportedclassversionerror",
            r"class file version \d+",
            r"compiled by a more recent version of the java runtime",
            r"requires java \d+",
            r"java \d+ (?:or (?:newer|later|above)) is required",
        ],
        weight: 3.0,
        fixes: &[
            "Switch the instance to the Java version the game version requires.",
            "Point the launcher at a newer Java runtime.",
        ],
    },
    RuleSpec {
        id: "memory_oom",
        title: "Out of memory",
        patterns: &[
            r"outofmemoryerror",
            r"java heap space",
            r"gc overhead limit exceeded",
            r"could not reserve enough space",
            r"metaspace",
            r"unable to allocate \d+",
        ],
        weight: 3.4,
        fixes: &[
            "Increase the memory allocated to the instance.",
            "Remove heavy resource packs, shaders or memory-hungry mods.",
            "Close other applications to free system memory.",
        ],
    },
    RuleSpec {
        id: "render_shader_conflict",
        title: "Renderer or shader conflict",
        patterns: &[
            r"shader.*(?:compil|link).*(?:fail|error)",
            r"failed to (?:compile|link) (?:shader|program)",
            r"(?:iris|oculus|optifine|sodium|embeddium|rubidium).*(?:incompatible|conflict)",
            r"glexception|opengl error|glfw error",
            r"pixel format not accelerated",
        ],
        weight: 2.2,
        fixes: &[
            "Disable the shader pack and relaunch.",
            "Remove one of the conflicting rendering mods.",
            "Update graphics drivers.",
        ],
    },
    RuleSpec {
        id: "native_crash",
        title: "Native (JVM) crash",
        patterns: &[
            r"exception_access_violation",
            r"sigsegv|sigbus|sigill",
            r"a fatal error has been detected by the java runtime environment",
            r"hs_err_pid\d*",
            r"problematic frame",
        ],
        weight: 3.3,
        fixes: &[
            "Update graphics drivers and the Java runtime.",
            "Check the hs_err_pid file for the native library at fault.",
            "Remove mods that ship native code, one at a time.",
        ],
    },
    RuleSpec {
        id: "mod_loading_failed",
        title: "Mod loading failed",
        patterns: &[
            r"mod loading has failed",
            r"failed to load mod",
            r"mod .* (?:has )?failed to load",
            r"loadingfailedexception|modloadingexception",
            r"could not execute entrypoint",
        ],
        weight: 1.8,
        fixes: &[
            "Read the first error above this line; it names the mod at fault.",
            "Update or remove the mod named in the error.",
        ],
    },
];

static BUILTIN_CATALOG: Lazy<RuleCatalog> = Lazy::new(|| {
    let rules = BUILTIN_RULES
        .iter()
        .map(|spec| CauseRule::new(spec.id, spec.title, spec.patterns, spec.weight, spec.fixes))
        .collect::<Result<Vec<_>>>()
        .unwrap_or_else(|_| unreachable!());
    RuleCatalog::new(rules).unwrap_or_else(|_| unreachable!())
});

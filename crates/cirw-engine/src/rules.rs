//! Rule-file loading and memoization (§5, §6, §9 "Global memoization").
//!
//! Per-system rule sets are loaded at most once per process and then treated
//! as immutable shared data; callers only ever see `&'static [Pattern]` or a
//! cheaply-cloned `Rc`, never a handle that could be mutated after load.

use std::fmt;
use std::sync::{Mutex, OnceLock};

use cirw_ir::pattern::RawRule;
use cirw_ir::Pattern;

use crate::error::{EngineError, EngineResult};

/// A gate set this workspace knows rules for (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum System {
    Ibm,
    Surface,
    U,
}

impl System {
    pub fn as_str(self) -> &'static str {
        match self {
            System::Ibm => "IBM",
            System::Surface => "Surface",
            System::U => "U",
        }
    }

    pub fn parse(name: &str) -> Option<System> {
        match name {
            "IBM" => Some(System::Ibm),
            "Surface" => Some(System::Surface),
            "U" => Some(System::U),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            System::Ibm => 0,
            System::Surface => 1,
            System::U => 2,
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which rule family within a system to load. Reduction draws on two
/// families (`Reversible`, `Hadamard`); commutation and the non-local
/// search pattern each draw on one; expansion is loaded for all systems
/// up front since it may run before the working system is fixed (§4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    Reversible,
    Hadamard,
    Commutation,
    Pattern,
    Expansion,
}

impl RuleFamily {
    fn file_name(self) -> &'static str {
        match self {
            RuleFamily::Reversible => "reversible.json",
            RuleFamily::Hadamard => "hadamard.json",
            RuleFamily::Commutation => "commutation.json",
            RuleFamily::Pattern => "pattern.json",
            RuleFamily::Expansion => "expansion.json",
        }
    }
}

/// The embedded rule JSON resources, indexed the same way `include_str!`
/// requires (a compile-time constant path) — the reference implementation
/// loads these as package data at runtime; we embed them at compile time
/// since this workspace ships no separate data directory to read from.
fn resource(system: System, family: RuleFamily) -> &'static str {
    match (system, family) {
        (System::Ibm, RuleFamily::Reversible) => include_str!("../rules/IBM/reversible.json"),
        (System::Ibm, RuleFamily::Hadamard) => include_str!("../rules/IBM/hadamard.json"),
        (System::Ibm, RuleFamily::Commutation) => include_str!("../rules/IBM/commutation.json"),
        (System::Ibm, RuleFamily::Pattern) => include_str!("../rules/IBM/pattern.json"),
        (System::Ibm, RuleFamily::Expansion) => include_str!("../rules/IBM/expansion.json"),

        (System::Surface, RuleFamily::Reversible) => include_str!("../rules/Surface/reversible.json"),
        (System::Surface, RuleFamily::Hadamard) => include_str!("../rules/Surface/hadamard.json"),
        (System::Surface, RuleFamily::Commutation) => include_str!("../rules/Surface/commutation.json"),
        (System::Surface, RuleFamily::Pattern) => include_str!("../rules/Surface/pattern.json"),
        (System::Surface, RuleFamily::Expansion) => include_str!("../rules/Surface/expansion.json"),

        (System::U, RuleFamily::Reversible) => include_str!("../rules/U/reversible.json"),
        (System::U, RuleFamily::Hadamard) => include_str!("../rules/U/hadamard.json"),
        (System::U, RuleFamily::Commutation) => include_str!("../rules/U/commutation.json"),
        (System::U, RuleFamily::Pattern) => include_str!("../rules/U/pattern.json"),
        (System::U, RuleFamily::Expansion) => include_str!("../rules/U/expansion.json"),
    }
}

fn parse_patterns(system: System, family: RuleFamily) -> EngineResult<Vec<Pattern>> {
    let raw: Vec<RawRule> = serde_json::from_str(resource(system, family)).map_err(|e| {
        EngineError::MalformedRuleFile {
            resource: format!("{}/{}", system, family.file_name()),
            message: e.to_string(),
        }
    })?;

    raw.into_iter()
        .map(|rule| {
            Pattern::from_raw(rule).ok_or_else(|| EngineError::MalformedRuleFile {
                resource: format!("{}/{}", system, family.file_name()),
                message: "unknown gate kind in rule template".to_string(),
            })
        })
        .collect()
}

macro_rules! rule_cache {
    ($name:ident) => {
        static $name: OnceLock<[Vec<Pattern>; 3]> = OnceLock::new();
    };
}

rule_cache!(REVERSIBLE);
rule_cache!(HADAMARD);
rule_cache!(COMMUTATION);
rule_cache!(PATTERN);
rule_cache!(EXPANSION);

fn cache_for(family: RuleFamily) -> &'static OnceLock<[Vec<Pattern>; 3]> {
    match family {
        RuleFamily::Reversible => &REVERSIBLE,
        RuleFamily::Hadamard => &HADAMARD,
        RuleFamily::Commutation => &COMMUTATION,
        RuleFamily::Pattern => &PATTERN,
        RuleFamily::Expansion => &EXPANSION,
    }
}

/// Load (and memoize) the rule family for one system. Parsing only ever
/// happens once per family across the whole process.
pub fn load(system: System, family: RuleFamily) -> EngineResult<&'static [Pattern]> {
    let cache = cache_for(family);
    if let Some(loaded) = cache.get() {
        return Ok(&loaded[system.index()]);
    }

    let loaded = [
        parse_patterns(System::Ibm, family)?,
        parse_patterns(System::Surface, family)?,
        parse_patterns(System::U, family)?,
    ];
    // Another thread may have won the race; either outcome is correct since
    // the content is identical, so ignore `set`'s failure.
    let _ = cache.set(loaded);
    Ok(&cache.get().expect("just initialized")[system.index()])
}

fn migration_resource(source: System, target: System) -> Option<&'static str> {
    match (source, target) {
        (System::Ibm, System::Surface) => Some(include_str!("../rules/migration/IBM_to_Surface.json")),
        (System::Ibm, System::U) => Some(include_str!("../rules/migration/IBM_to_U.json")),
        _ => None,
    }
}

/// Load migration rules from `source` to `target`, falling back to the
/// swapped `target -> source` file if the direct one doesn't exist (§4.C).
pub fn load_migration(source: System, target: System) -> EngineResult<std::sync::Arc<Vec<Pattern>>> {
    static CACHE: OnceLock<Mutex<rustc_hash::FxHashMap<(System, System), std::sync::Arc<Vec<Pattern>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(rustc_hash::FxHashMap::default()));

    {
        let guard = cache.lock().expect("rule cache poisoned");
        if let Some(rules) = guard.get(&(source, target)) {
            return Ok(rules.clone());
        }
    }

    let (resource_text, swap) = match migration_resource(source, target) {
        Some(text) => (text, false),
        None => match migration_resource(target, source) {
            Some(text) => (text, true),
            None => {
                return Err(EngineError::RuleFileMissing {
                    source: source.to_string(),
                    target: target.to_string(),
                })
            }
        },
    };

    let mut raw: Vec<RawRule> = serde_json::from_str(resource_text).map_err(|e| EngineError::MalformedRuleFile {
        resource: format!("migration/{source}_to_{target}.json"),
        message: e.to_string(),
    })?;

    if swap {
        for rule in &mut raw {
            std::mem::swap(&mut rule.src, &mut rule.dst);
        }
    }

    let patterns: Vec<Pattern> = raw
        .into_iter()
        .map(|rule| {
            Pattern::from_raw(rule).ok_or_else(|| EngineError::MalformedRuleFile {
                resource: format!("migration/{source}_to_{target}.json"),
                message: "unknown gate kind in migration template".to_string(),
            })
        })
        .collect::<EngineResult<_>>()?;

    let patterns = std::sync::Arc::new(patterns);
    cache.lock().expect("rule cache poisoned").insert((source, target), patterns.clone());
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_memoizes_ibm_reversible() {
        let first = load(System::Ibm, RuleFamily::Reversible).unwrap();
        let second = load(System::Ibm, RuleFamily::Reversible).unwrap();
        assert_eq!(first.len(), second.len());
        assert!(!first.is_empty());
    }

    #[test]
    fn swap_fallback_loads_reversed_rules() {
        // Only IBM_to_Surface.json exists on disk; Surface -> IBM must
        // swap src/dst from that file rather than fail.
        let direct = load_migration(System::Ibm, System::Surface).unwrap();
        let swapped = load_migration(System::Surface, System::Ibm).unwrap();
        assert_eq!(direct.len(), swapped.len());
        assert_eq!(direct[0].src[0].kind, swapped[0].dst[0].kind);
    }

    #[test]
    fn missing_migration_pair_errors() {
        let err = load_migration(System::Surface, System::U);
        assert!(matches!(err, Err(EngineError::RuleFileMissing { .. })));
    }
}

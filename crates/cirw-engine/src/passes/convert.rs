//! Offline migration of whole *pattern files* between systems (§4.C
//! "A `convert` utility..."). Not used during a rewrite turn; this backs
//! the CLI's `convert-rules` subcommand, which pre-generates a migrated
//! system's `reversible`/`hadamard`/`commutation`/`pattern` rule files from
//! IBM-native ones rather than hand-authoring each system's files.

use cirw_ir::pattern::{Pattern, Template};
use cirw_ir::Kind;

/// Every kind a single source kind can migrate to, across every migration
/// rule that matches it (usually one, but the cross-product step below
/// supports more than one alternative rewrite per kind).
fn migration_options(kind: Kind, migration: &[Pattern]) -> Vec<Vec<Kind>> {
    let direct: Vec<Vec<Kind>> = migration
        .iter()
        .filter(|rule| rule.src.len() == 1 && rule.src[0].kind == kind)
        .map(|rule| rule.dst.iter().map(|t| t.kind).collect())
        .collect();
    if direct.is_empty() {
        vec![vec![kind]]
    } else {
        direct
    }
}

/// Substitute every template in `templates` through its migration options,
/// taking the cross product across templates (each output combination is
/// one possible migrated template list).
fn migrate_templates(templates: &[Template], migration: &[Pattern]) -> Vec<Vec<Template>> {
    let mut combinations: Vec<Vec<Template>> = vec![Vec::new()];

    for template in templates {
        let options = migration_options(template.kind, migration);
        let mut next = Vec::with_capacity(combinations.len() * options.len());
        for prefix in &combinations {
            for kinds in &options {
                let mut extended = prefix.clone();
                for &kind in kinds {
                    extended.push(Template { kind, operands: template.operands.clone(), angle: String::new() });
                }
                next.push(extended);
            }
        }
        combinations = next;
    }

    combinations
}

/// Migrate one rule, producing every combination of migrated source and
/// destination template lists (§4.C "cross-product of all source-template
/// and destination-template migration possibilities").
pub fn migrate_rule(pattern: &Pattern, migration: &[Pattern]) -> Vec<Pattern> {
    let src_options = migrate_templates(&pattern.src, migration);
    let dst_options = migrate_templates(&pattern.dst, migration);

    let mut out = Vec::with_capacity(src_options.len() * dst_options.len());
    for src in &src_options {
        for dst in &dst_options {
            let operator_signature: String = src.iter().map(|t| t.kind.code()).collect();
            out.push(Pattern { src: src.clone(), dst: dst.clone(), operator_signature });
        }
    }
    out
}

/// Migrate a whole rule file (a rule family's pattern list).
pub fn migrate_rule_file(patterns: &[Pattern], migration: &[Pattern]) -> Vec<Pattern> {
    patterns.iter().flat_map(|pattern| migrate_rule(pattern, migration)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirw_ir::pattern::RawRule;

    fn pattern(src_json: &str, dst_json: &str) -> Pattern {
        let raw = RawRule {
            src: serde_json::from_str(src_json).unwrap(),
            dst: serde_json::from_str(dst_json).unwrap(),
        };
        Pattern::from_raw(raw).unwrap()
    }

    #[test]
    fn migrates_single_template_kind() {
        let migration = vec![pattern(r#"[["z",[0]]]"#, r#"[["x",[0]],["y",[0]]]"#)];
        let rule = pattern(r#"[["z",[0]],["z",[0]]]"#, "[]");
        let migrated = migrate_rule(&rule, &migration);
        assert_eq!(migrated.len(), 1);
        assert_eq!(migrated[0].src.len(), 4);
        assert!(migrated[0].src.iter().all(|t| t.kind == Kind::X || t.kind == Kind::Y));
    }

    #[test]
    fn passes_through_kinds_with_no_migration_rule() {
        let migration: Vec<Pattern> = Vec::new();
        let rule = pattern(r#"[["h",[0]],["h",[0]]]"#, "[]");
        let migrated = migrate_rule(&rule, &migration);
        assert_eq!(migrated.len(), 1);
        assert_eq!(migrated[0].src, rule.src);
    }
}

use std::collections::{BTreeMap, HashSet};

use crate::types::{
    DefSite, DupdefReport, DuplicateKind, FuncDef, FuncDupGroup, OdrConflict, OdrVariant,
    TypeDef, TypeDupGroup,
};

/// Aggregate merged records into the three-way report: types duplicated
/// across files, functions with identical repeated bodies, and functions
/// whose identical name+signature hides conflicting bodies. The split between
/// the last two is the point of the tool: an identical copy is copy-paste
/// noise, a conflicting body is a latent link-time hazard.
pub(crate) fn classify(
    type_defs: Vec<TypeDef>,
    func_defs: Vec<FuncDef>,
    allow_inline_exemption: bool,
) -> DupdefReport {
    let mut by_type: BTreeMap<String, Vec<TypeDef>> = BTreeMap::new();
    for def in type_defs {
        by_type.entry(def.qualified_name.clone()).or_default().push(def);
    }

    let mut duplicate_classes = Vec::new();
    for (qualified_name, defs) in by_type {
        let files: HashSet<&str> = defs.iter().map(|d| d.file.as_str()).collect();
        // Repeats inside one file are a compiler concern, not cross-file
        // duplication.
        if files.len() < 2 {
            continue;
        }
        duplicate_classes.push(TypeDupGroup {
            qualified_name,
            defs: sorted_sites(defs.iter().map(|d| (d.file.as_str(), d.line))),
        });
    }

    let mut by_func: BTreeMap<(String, String), Vec<FuncDef>> = BTreeMap::new();
    for def in func_defs {
        by_func
            .entry((def.qualified_name.clone(), def.signature.clone()))
            .or_default()
            .push(def);
    }

    let mut duplicate_functions = Vec::new();
    let mut odr_conflicts = Vec::new();
    for ((qualified_name, signature), defs) in by_func {
        if defs.len() < 2 {
            continue;
        }

        let mut buckets: BTreeMap<u64, Vec<&FuncDef>> = BTreeMap::new();
        for def in &defs {
            buckets.entry(def.body_fingerprint).or_default().push(def);
        }

        if buckets.len() == 1 {
            let kind = if allow_inline_exemption {
                if defs.iter().all(|d| d.inline_or_template) {
                    // Legitimate header-only definition repeated across
                    // translation units.
                    continue;
                }
                DuplicateKind::IdenticalNonInline
            } else {
                DuplicateKind::Identical
            };
            duplicate_functions.push(FuncDupGroup {
                qualified_name,
                signature,
                kind,
                defs: sorted_sites(defs.iter().map(|d| (d.file.as_str(), d.line))),
            });
        } else {
            let variants = buckets
                .into_iter()
                .map(|(body_fingerprint, defs)| OdrVariant {
                    body_fingerprint,
                    defs: sorted_sites(defs.iter().map(|d| (d.file.as_str(), d.line))),
                })
                .collect();
            odr_conflicts.push(OdrConflict {
                qualified_name,
                signature,
                variants,
            });
        }
    }

    DupdefReport {
        duplicate_classes,
        duplicate_functions,
        odr_conflicts,
    }
}

fn sorted_sites<'a>(sites: impl Iterator<Item = (&'a str, u32)>) -> Vec<DefSite> {
    let mut out: Vec<DefSite> = sites
        .map(|(file, line)| DefSite {
            file: file.to_string(),
            line,
        })
        .collect();
    out.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));
    out
}

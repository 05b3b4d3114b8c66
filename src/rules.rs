//! Rule pipeline (§4.5): a composable, stable, multi-key sort over the
//! singleton item list, applied before the placement driver runs.
//!
//! Each rule contributes one or more sort keys; keys from higher-priority
//! rules are compared first. The whole pipeline is a pure function of
//! `(enabled_rules, items)` and never mutates its input.

use crate::model::Cargo;

/// One of the five built-in ordering rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    PriorityFirst,
    HeavyBottom,
    VolumeFirst,
    SimilarSizeStack,
    SameSizeFirst,
}

/// A rule bound to a priority: higher-priority rules contribute keys that
/// are compared before lower-priority ones.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub kind: RuleKind,
    pub priority: i32,
}

impl Rule {
    pub fn new(kind: RuleKind, priority: i32) -> Self {
        Self { kind, priority }
    }
}

/// Mass threshold (kg) above which `heavy_bottom` sorts an item into the
/// "heavy" bucket.
pub const HEAVY_BOTTOM_THRESHOLD_KG: f64 = 20.0;

/// Bucket width (cm) `same_size_first` rounds dimensions to before
/// comparing.
const SAME_SIZE_BUCKET: f64 = 10.0;

/// The engine's default rule set: all five rules enabled at the
/// priorities named in §4.5.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(RuleKind::PriorityFirst, 100),
        Rule::new(RuleKind::HeavyBottom, 80),
        Rule::new(RuleKind::SimilarSizeStack, 60),
        Rule::new(RuleKind::SameSizeFirst, 50),
        Rule::new(RuleKind::VolumeFirst, 40),
    ]
}

/// One rule's contribution to a single item's composite sort key. `f64`
/// keys are represented via their bit pattern comparison is avoided by
/// using `PartialOrd`-based `total_cmp` in the comparator below.
#[derive(Clone, Debug, PartialEq)]
enum KeyPart {
    Int(i64),
    Float(f64),
}

fn bucket(dim: f64) -> f64 {
    (dim / SAME_SIZE_BUCKET).round() * SAME_SIZE_BUCKET
}

fn key_parts(kind: RuleKind, item: &Cargo) -> Vec<KeyPart> {
    match kind {
        RuleKind::PriorityFirst => vec![KeyPart::Int(-(item.priority as i64))],
        RuleKind::HeavyBottom => {
            let bucket = if item.weight >= HEAVY_BOTTOM_THRESHOLD_KG { 0 } else { 1 };
            vec![KeyPart::Int(bucket), KeyPart::Float(-item.weight)]
        }
        RuleKind::VolumeFirst => vec![KeyPart::Float(-item.volume())],
        RuleKind::SimilarSizeStack => vec![KeyPart::Float(-item.length)],
        RuleKind::SameSizeFirst => vec![
            KeyPart::Float(-bucket(item.length)),
            KeyPart::Float(-bucket(item.width)),
            KeyPart::Float(-bucket(item.height)),
        ],
    }
}

fn compare_parts(a: &KeyPart, b: &KeyPart) -> std::cmp::Ordering {
    match (a, b) {
        (KeyPart::Int(x), KeyPart::Int(y)) => x.cmp(y),
        (KeyPart::Float(x), KeyPart::Float(y)) => x.total_cmp(y),
        _ => std::cmp::Ordering::Equal,
    }
}

/// Orders `items` per the enabled rule set, highest-priority rule's keys
/// compared first. Stable on ties, preserving input order. Pure: neither
/// `items` nor `rules` is mutated, and a clone is returned.
pub fn apply_rules(rules: &[Rule], items: &[Cargo]) -> Vec<Cargo> {
    let mut ordered: Vec<Rule> = rules.to_vec();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.priority));

    let mut indexed: Vec<(usize, Cargo)> = items.iter().cloned().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        for rule in &ordered {
            let ka = key_parts(rule.kind, a);
            let kb = key_parts(rule.kind, b);
            for (pa, pb) in ka.iter().zip(kb.iter()) {
                let ord = compare_parts(pa, pb);
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
        }
        ia.cmp(ib)
    });

    indexed.into_iter().map(|(_, c)| c).collect()
}

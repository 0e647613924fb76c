//! Noun taxonomy backing the taxonomic item measure.
//!
//! The measure only sees [`LexicalResource`]; [`Taxonomy`] is the SQLite-backed
//! implementation used by the CLI. It is loaded into memory once per run and
//! never mutated afterwards.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

pub const NOUN_POS: &str = "n";

/// Word to sense lookup plus pairwise sense similarity.
pub trait LexicalResource {
    /// Noun senses of `word`, empty when the word is unknown.
    fn noun_senses(&self, word: &str) -> &[String];

    /// Similarity of two senses in [0, 1].
    fn sense_similarity(&self, left: &str, right: &str) -> f64;
}

/// Noun suffix rewrites tried when an inflected form is not a lemma, in
/// WordNet's morphy order.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeDepth {
    /// Shortest hypernym path to a root.
    min: usize,
    /// Longest hypernym path to a root.
    max: usize,
}

#[derive(Debug)]
pub struct Taxonomy {
    noun_senses: HashMap<String, Vec<String>>,
    hypernyms: HashMap<String, Vec<String>>,
    depths: HashMap<String, NodeDepth>,
}

impl Taxonomy {
    pub fn new(
        noun_senses: HashMap<String, Vec<String>>,
        hypernyms: HashMap<String, Vec<String>>,
    ) -> Result<Self> {
        let depths = compute_depths(&noun_senses, &hypernyms)?;
        Ok(Self {
            noun_senses,
            hypernyms,
            depths,
        })
    }

    pub fn load(connection: &Connection) -> Result<Self> {
        let mut noun_senses = HashMap::<String, Vec<String>>::new();
        let mut statement = connection
            .prepare("SELECT word, sense_id FROM senses WHERE pos = ?1 ORDER BY word, sense_id")
            .context("failed to prepare sense query")?;
        let mut rows = statement.query([NOUN_POS])?;
        while let Some(row) = rows.next()? {
            let word: String = row.get(0)?;
            let sense_id: String = row.get(1)?;
            noun_senses
                .entry(canonical_word(&word))
                .or_default()
                .push(sense_id);
        }

        let mut hypernyms = HashMap::<String, Vec<String>>::new();
        let mut statement = connection
            .prepare("SELECT sense_id, hypernym_id FROM hypernyms ORDER BY sense_id, hypernym_id")
            .context("failed to prepare hypernym query")?;
        let mut rows = statement.query([])?;
        while let Some(row) = rows.next()? {
            let sense_id: String = row.get(0)?;
            let hypernym_id: String = row.get(1)?;
            hypernyms.entry(sense_id).or_default().push(hypernym_id);
        }

        let taxonomy = Self::new(noun_senses, hypernyms)?;
        debug!(
            words = taxonomy.noun_senses.len(),
            nodes = taxonomy.depths.len(),
            "taxonomy loaded"
        );
        Ok(taxonomy)
    }

    pub fn word_count(&self) -> usize {
        self.noun_senses.len()
    }

    pub fn node_count(&self) -> usize {
        self.depths.len()
    }

    pub fn max_depth(&self) -> usize {
        self.depths.values().map(|depth| depth.max).max().unwrap_or(0)
    }

    /// Wu-Palmer similarity: `2d / (l1 + l2 + 2d)`.
    ///
    /// The subsumer is the common ancestor (either sense included) with the
    /// greatest minimum depth. Either input sense wins a tie, then the
    /// smallest identifier. `d` is the subsumer's maximum depth plus one and
    /// `l1`, `l2` are the shortest upward distances to it.
    pub fn wup_similarity(&self, left: &str, right: &str) -> f64 {
        if left == right {
            return 1.0;
        }

        let left_ancestors = self.ancestor_distances(left);
        let right_ancestors = self.ancestor_distances(right);

        let common = left_ancestors
            .keys()
            .copied()
            .filter(|node| right_ancestors.contains_key(node))
            .collect::<Vec<&str>>();
        let Some(lowest) = common.iter().map(|node| self.depth_of(node).min).max() else {
            return 0.0;
        };

        let mut subsumers = common
            .into_iter()
            .filter(|node| self.depth_of(node).min == lowest)
            .collect::<Vec<&str>>();
        subsumers.sort_unstable();
        let subsumer = [left, right]
            .into_iter()
            .find(|sense| subsumers.contains(sense))
            .unwrap_or(subsumers[0]);

        let depth = (self.depth_of(subsumer).max + 1) as f64;
        let left_len = left_ancestors[subsumer] as f64;
        let right_len = right_ancestors[subsumer] as f64;
        (2.0 * depth) / (left_len + right_len + 2.0 * depth)
    }

    fn depth_of(&self, sense: &str) -> NodeDepth {
        self.depths
            .get(sense)
            .copied()
            .unwrap_or(NodeDepth { min: 0, max: 0 })
    }

    fn ancestor_distances<'a>(&'a self, sense: &'a str) -> HashMap<&'a str, usize> {
        let mut distances = HashMap::<&str, usize>::new();
        let mut queue = VecDeque::<(&str, usize)>::new();
        distances.insert(sense, 0);
        queue.push_back((sense, 0));

        while let Some((node, distance)) = queue.pop_front() {
            let Some(parents) = self.hypernyms.get(node) else {
                continue;
            };
            for parent in parents {
                let parent = parent.as_str();
                if !distances.contains_key(parent) {
                    distances.insert(parent, distance + 1);
                    queue.push_back((parent, distance + 1));
                }
            }
        }

        distances
    }

    fn lemma_senses(&self, lemma: &str) -> Option<&[String]> {
        self.noun_senses
            .get(lemma)
            .map(Vec::as_slice)
            .filter(|senses| !senses.is_empty())
    }
}

impl LexicalResource for Taxonomy {
    /// Senses of the word itself, else of the first base form produced by
    /// the noun suffix rules.
    fn noun_senses(&self, word: &str) -> &[String] {
        let word = canonical_word(word);
        if let Some(senses) = self.lemma_senses(&word) {
            return senses;
        }

        NOUN_SUFFIX_RULES
            .iter()
            .filter_map(|&(suffix, replacement)| {
                let stem = word.strip_suffix(suffix)?;
                let base = format!("{stem}{replacement}");
                (!base.is_empty()).then_some(base)
            })
            .find_map(|base| self.lemma_senses(&base))
            .unwrap_or(&[])
    }

    fn sense_similarity(&self, left: &str, right: &str) -> f64 {
        self.wup_similarity(left, right)
    }
}

/// Lemma key used by the taxonomy: lowercased, whitespace runs joined by `_`.
pub fn canonical_word(word: &str) -> String {
    word.split_whitespace()
        .collect::<Vec<&str>>()
        .join("_")
        .to_lowercase()
}

/// Opens an existing taxonomy database without write access.
pub fn open_read_only(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        bail!(
            "taxonomy database not found: {} (build it with `wups import-taxonomy`)",
            db_path.display()
        );
    }

    Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("failed to open {}", db_path.display()))
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS senses (
              word TEXT NOT NULL,
              sense_id TEXT NOT NULL,
              pos TEXT NOT NULL,
              PRIMARY KEY (word, sense_id)
            );

            CREATE INDEX IF NOT EXISTS idx_senses_pos_word ON senses(pos, word);

            CREATE TABLE IF NOT EXISTS hypernyms (
              sense_id TEXT NOT NULL,
              hypernym_id TEXT NOT NULL,
              PRIMARY KEY (sense_id, hypernym_id)
            );
            ",
        )
        .context("failed to create taxonomy schema")
}

fn compute_depths(
    noun_senses: &HashMap<String, Vec<String>>,
    hypernyms: &HashMap<String, Vec<String>>,
) -> Result<HashMap<String, NodeDepth>> {
    let mut nodes = HashSet::<&str>::new();
    for senses in noun_senses.values() {
        nodes.extend(senses.iter().map(String::as_str));
    }
    for (sense, parents) in hypernyms {
        nodes.insert(sense);
        nodes.extend(parents.iter().map(String::as_str));
    }

    let mut ordered = nodes.into_iter().collect::<Vec<&str>>();
    ordered.sort_unstable();

    let mut depths = HashMap::<String, NodeDepth>::new();
    for node in ordered {
        resolve_depth(node, hypernyms, &mut depths)?;
    }

    Ok(depths)
}

/// Depth-first walk up from `start` with an explicit stack, so hypernym
/// chain length is bounded by memory rather than the call stack.
fn resolve_depth(
    start: &str,
    hypernyms: &HashMap<String, Vec<String>>,
    depths: &mut HashMap<String, NodeDepth>,
) -> Result<()> {
    let mut stack = vec![(start, false)];
    let mut on_path = HashSet::<&str>::new();

    while let Some((node, expanded)) = stack.pop() {
        let parents = hypernyms.get(node).map(Vec::as_slice).unwrap_or(&[]);

        if expanded {
            let mut depth: Option<NodeDepth> = None;
            for parent in parents {
                let parent_depth = depths[parent.as_str()];
                depth = Some(match depth {
                    None => NodeDepth {
                        min: parent_depth.min + 1,
                        max: parent_depth.max + 1,
                    },
                    Some(current) => NodeDepth {
                        min: current.min.min(parent_depth.min + 1),
                        max: current.max.max(parent_depth.max + 1),
                    },
                });
            }
            on_path.remove(node);
            depths.insert(
                node.to_string(),
                depth.unwrap_or(NodeDepth { min: 0, max: 0 }),
            );
            continue;
        }

        if depths.contains_key(node) {
            continue;
        }
        if !on_path.insert(node) {
            bail!("hypernym cycle detected at sense {node}");
        }

        stack.push((node, true));
        for parent in parents {
            let parent = parent.as_str();
            if on_path.contains(parent) {
                bail!("hypernym cycle detected at sense {parent}");
            }
            if !depths.contains_key(parent) {
                stack.push((parent, false));
            }
        }
    }

    Ok(())
}

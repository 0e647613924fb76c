use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;
use rusqlite::{Connection, params};
use tracing::info;

use crate::cli::ImportTaxonomyArgs;
use crate::model::{TaxonomyImportManifest, TaxonomySource};
use crate::taxonomy::{NOUN_POS, Taxonomy, canonical_word, ensure_schema};
use crate::util::{ensure_parent_directory, now_utc_string, read_text_file, write_json_pretty};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SenseRow {
    word: String,
    sense_id: String,
    pos: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HypernymRow {
    sense_id: String,
    hypernym_id: String,
}

pub fn run(args: ImportTaxonomyArgs) -> Result<()> {
    let pattern = sense_id_pattern()?;

    let (senses_contents, senses_sha256) = read_text_file(&args.senses)?;
    let (hypernyms_contents, hypernyms_sha256) = read_text_file(&args.hypernyms)?;
    let senses = parse_sense_rows(&senses_contents, &args.senses, &pattern)?;
    let hypernyms = parse_hypernym_rows(&hypernyms_contents, &args.hypernyms, &pattern)?;

    info!(
        senses = senses.len(),
        hypernyms = hypernyms.len(),
        db_path = %args.db_path.display(),
        "importing taxonomy"
    );

    ensure_parent_directory(&args.db_path)?;
    let mut connection = Connection::open(&args.db_path)
        .with_context(|| format!("failed to open {}", args.db_path.display()))?;
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    ensure_schema(&connection)?;

    let generated_at = now_utc_string();
    let metadata = [
        ("imported_at", generated_at.as_str()),
        ("senses_sha256", senses_sha256.as_str()),
        ("hypernyms_sha256", hypernyms_sha256.as_str()),
    ];
    let taxonomy = replace_taxonomy(&mut connection, &senses, &hypernyms, &metadata)?;

    let manifest = TaxonomyImportManifest {
        manifest_version: 1,
        generated_at,
        db_path: args.db_path.display().to_string(),
        senses: TaxonomySource {
            path: args.senses.display().to_string(),
            sha256: senses_sha256,
            rows: senses.len(),
        },
        hypernyms: TaxonomySource {
            path: args.hypernyms.display().to_string(),
            sha256: hypernyms_sha256,
            rows: hypernyms.len(),
        },
        noun_sense_count: senses.iter().filter(|row| row.pos == NOUN_POS).count(),
        node_count: taxonomy.node_count(),
        max_depth: taxonomy.max_depth(),
    };

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.db_path.with_extension("manifest.json"));
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote taxonomy import manifest");
    info!(
        words = taxonomy.word_count(),
        nodes = taxonomy.node_count(),
        max_depth = taxonomy.max_depth(),
        "taxonomy import completed"
    );

    Ok(())
}

/// WordNet-style sense identifier, e.g. `dog.n.01`.
fn sense_id_pattern() -> Result<Regex> {
    Regex::new(r"^(?P<lemma>\S+)\.(?P<pos>[nvasr])\.(?P<index>\d+)$")
        .context("failed to compile sense identifier regex")
}

fn sense_pos(sense_id: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(sense_id)
        .and_then(|captures| captures.name("pos"))
        .map(|pos| pos.as_str().to_string())
}

fn data_rows(contents: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| (line_no, line.split('\t').map(str::trim).collect()))
}

fn parse_sense_rows(contents: &str, path: &Path, pattern: &Regex) -> Result<Vec<SenseRow>> {
    let mut rows = Vec::new();
    for (line_no, columns) in data_rows(contents) {
        let [word, sense_id] = columns.as_slice() else {
            bail!(
                "{}:{line_no}: expected `word<TAB>sense_id`, found {} columns",
                path.display(),
                columns.len()
            );
        };
        let word = canonical_word(word);
        if word.is_empty() {
            bail!("{}:{line_no}: empty word", path.display());
        }
        let pos = sense_pos(sense_id, pattern).with_context(|| {
            format!(
                "{}:{line_no}: malformed sense identifier `{sense_id}`",
                path.display()
            )
        })?;

        rows.push(SenseRow {
            word,
            sense_id: sense_id.to_string(),
            pos,
        });
    }
    Ok(rows)
}

fn parse_hypernym_rows(contents: &str, path: &Path, pattern: &Regex) -> Result<Vec<HypernymRow>> {
    let mut rows = Vec::new();
    for (line_no, columns) in data_rows(contents) {
        let [sense_id, hypernym_id] = columns.as_slice() else {
            bail!(
                "{}:{line_no}: expected `sense_id<TAB>hypernym_id`, found {} columns",
                path.display(),
                columns.len()
            );
        };
        for id in [sense_id, hypernym_id] {
            if !pattern.is_match(id) {
                bail!(
                    "{}:{line_no}: malformed sense identifier `{id}`",
                    path.display()
                );
            }
        }

        rows.push(HypernymRow {
            sense_id: sense_id.to_string(),
            hypernym_id: hypernym_id.to_string(),
        });
    }
    Ok(rows)
}

/// Replaces all taxonomy rows in one transaction. The transaction only
/// commits when the imported hierarchy loads cleanly.
fn replace_taxonomy(
    connection: &mut Connection,
    senses: &[SenseRow],
    hypernyms: &[HypernymRow],
    metadata: &[(&str, &str)],
) -> Result<Taxonomy> {
    let tx = connection
        .transaction()
        .context("failed to start taxonomy import transaction")?;

    tx.execute("DELETE FROM senses", [])?;
    tx.execute("DELETE FROM hypernyms", [])?;

    {
        let mut insert_sense = tx.prepare(
            "INSERT OR IGNORE INTO senses (word, sense_id, pos) VALUES (?1, ?2, ?3)",
        )?;
        for row in senses {
            insert_sense.execute(params![row.word, row.sense_id, row.pos])?;
        }

        let mut insert_hypernym = tx.prepare(
            "INSERT OR IGNORE INTO hypernyms (sense_id, hypernym_id) VALUES (?1, ?2)",
        )?;
        for row in hypernyms {
            insert_hypernym.execute(params![row.sense_id, row.hypernym_id])?;
        }

        let mut upsert_metadata = tx.prepare(
            "INSERT INTO metadata (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )?;
        for (key, value) in metadata {
            upsert_metadata.execute(params![key, value])?;
        }
    }

    let taxonomy = Taxonomy::load(&tx).context("imported taxonomy is invalid")?;
    tx.commit().context("failed to commit taxonomy import")?;
    Ok(taxonomy)
}

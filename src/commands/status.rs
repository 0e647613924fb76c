use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::taxonomy::{NOUN_POS, open_read_only};

#[derive(Debug, Default, PartialEq, Eq)]
struct TaxonomyCounts {
    senses: i64,
    noun_senses: i64,
    hypernyms: i64,
    imported_at: Option<String>,
}

pub fn run(args: StatusArgs) -> Result<()> {
    info!(db_path = %args.db_path.display(), "status requested");

    if !args.db_path.exists() {
        warn!(path = %args.db_path.display(), "taxonomy database missing");
        return Ok(());
    }

    let connection = open_read_only(&args.db_path)?;
    let counts = taxonomy_counts(&connection)?;
    info!(
        path = %args.db_path.display(),
        senses = counts.senses,
        noun_senses = counts.noun_senses,
        hypernyms = counts.hypernyms,
        imported_at = %counts.imported_at.unwrap_or_default(),
        "taxonomy status"
    );

    Ok(())
}

fn taxonomy_counts(connection: &Connection) -> Result<TaxonomyCounts> {
    let senses = query_count(connection, "SELECT COUNT(*) FROM senses", [])?;
    let noun_senses = query_count(
        connection,
        "SELECT COUNT(*) FROM senses WHERE pos = ?1",
        [NOUN_POS],
    )?;
    let hypernyms = query_count(connection, "SELECT COUNT(*) FROM hypernyms", [])?;
    let imported_at = connection
        .query_row(
            "SELECT value FROM metadata WHERE key = 'imported_at'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(TaxonomyCounts {
        senses,
        noun_senses,
        hypernyms,
        imported_at,
    })
}

fn query_count<P: rusqlite::Params>(connection: &Connection, sql: &str, params: P) -> Result<i64> {
    let count = connection.query_row(sql, params, |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::{TaxonomyCounts, taxonomy_counts};
    use crate::taxonomy::ensure_schema;
    use rusqlite::Connection;

    #[test]
    fn taxonomy_counts_split_noun_senses_and_read_import_time() {
        let connection = Connection::open_in_memory().expect("in-memory db");
        ensure_schema(&connection).expect("schema");
        connection
            .execute_batch(
                "
                INSERT INTO senses (word, sense_id, pos) VALUES
                  ('dog', 'dog.n.01', 'n'),
                  ('dog', 'chase.v.01', 'v');
                INSERT INTO hypernyms (sense_id, hypernym_id) VALUES ('dog.n.01', 'animal.n.01');
                INSERT INTO metadata (key, value) VALUES ('imported_at', '2026-01-01T00:00:00Z');
                ",
            )
            .expect("fixture rows");

        let counts = taxonomy_counts(&connection).expect("counts");
        assert_eq!(
            counts,
            TaxonomyCounts {
                senses: 2,
                noun_senses: 1,
                hypernyms: 1,
                imported_at: Some("2026-01-01T00:00:00Z".to_string()),
            }
        );
    }

    #[test]
    fn taxonomy_counts_tolerate_missing_import_metadata() {
        let connection = Connection::open_in_memory().expect("in-memory db");
        ensure_schema(&connection).expect("schema");
        let counts = taxonomy_counts(&connection).expect("counts");
        assert_eq!(counts, TaxonomyCounts::default());
    }
}

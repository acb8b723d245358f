//! Document repository: statements against the `documents` table.

use rusqlite::{params, Row};
use serde::Serialize;

use super::{Database, DatabaseError, FOLD_FUNCTION};

const COLUMNS: &str = "id, name, keyword1, keyword2, date, content";

/// A catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRow {
    pub id: i64,
    pub name: String,
    pub keyword1: Option<String>,
    pub keyword2: Option<String>,
    pub date: Option<String>,
    pub content: String,
}

impl DocumentRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            keyword1: row.get("keyword1")?,
            keyword2: row.get("keyword2")?,
            date: row.get("date")?,
            content: row.get::<_, Option<String>>("content")?.unwrap_or_default(),
        })
    }
}

/// The caller-supplied part of a row; `id` is assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDocument {
    pub name: String,
    pub keyword1: Option<String>,
    pub keyword2: Option<String>,
    pub date: Option<String>,
    pub content: String,
}

/// Inserts the document, or replaces keyword1/keyword2/date/content of the
/// row already holding `name`. Returns the row id, which an update keeps.
pub fn upsert(db: &Database, doc: &NewDocument) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let id = conn.query_row(
            "INSERT INTO documents (name, keyword1, keyword2, date, content)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name) DO UPDATE SET
                 keyword1 = excluded.keyword1,
                 keyword2 = excluded.keyword2,
                 date = excluded.date,
                 content = excluded.content
             RETURNING id",
            params![doc.name, doc.keyword1, doc.keyword2, doc.date, doc.content],
            |r| r.get(0),
        )?;
        Ok(id)
    })
}

/// All rows, newest first.
pub fn list_all(db: &Database) -> Result<Vec<DocumentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM documents ORDER BY id DESC",
            COLUMNS
        ))?;
        let rows = stmt
            .query_map([], DocumentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Finds a row by its unique name.
pub fn find_by_name(db: &Database, name: &str) -> Result<Option<DocumentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM documents WHERE name = ?1", COLUMNS))?;
        let mut rows = stmt.query_map(params![name], DocumentRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Builds the search statement. Each searchable column is folded and probed
/// with `instr`, so `%` and `_` in the term are matched literally.
fn search_sql() -> String {
    let conditions = ["name", "keyword1", "keyword2", "date", "content"]
        .iter()
        .map(|column| format!("instr({}({}), ?1) > 0", FOLD_FUNCTION, column))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!(
        "SELECT {} FROM documents WHERE {} ORDER BY id DESC",
        COLUMNS, conditions
    )
}

/// Rows where any text column contains `term`, ignoring case. An empty term
/// returns every row.
pub fn search(db: &Database, term: &str) -> Result<Vec<DocumentRow>, DatabaseError> {
    if term.is_empty() {
        return list_all(db);
    }

    let folded = super::fold(term);
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&search_sql())?;
        let rows = stmt
            .query_map(params![folded], DocumentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Deletes the row with `name`. Returns whether a row was removed.
pub fn delete(db: &Database, name: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM documents WHERE name = ?1", params![name])?;
        Ok(changed > 0)
    })
}

/// Number of rows in the catalog.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn sample(name: &str, content: &str) -> NewDocument {
        NewDocument {
            name: name.to_string(),
            keyword1: Some("tax".to_string()),
            keyword2: None,
            date: Some("05.11.2024".to_string()),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_upsert_and_find() {
        let db = test_db();
        let id = upsert(&db, &sample("invoice.pdf", "Total due")).unwrap();

        let found = find_by_name(&db, "invoice.pdf").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.keyword1.as_deref(), Some("tax"));
        assert_eq!(found.keyword2, None);
        assert_eq!(found.date.as_deref(), Some("05.11.2024"));
        assert_eq!(found.content, "Total due");
    }

    #[test]
    fn test_find_nonexistent() {
        let db = test_db();
        assert!(find_by_name(&db, "missing.pdf").unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_fields_and_keeps_id() {
        let db = test_db();
        let first = upsert(&db, &sample("invoice.pdf", "old")).unwrap();

        let mut replacement = sample("invoice.pdf", "new\ncontent");
        replacement.keyword1 = None;
        replacement.keyword2 = Some("paid".to_string());
        let second = upsert(&db, &replacement).unwrap();

        assert_eq!(first, second);
        assert_eq!(count(&db).unwrap(), 1);

        let found = find_by_name(&db, "invoice.pdf").unwrap().unwrap();
        assert_eq!(found.keyword1, None);
        assert_eq!(found.keyword2.as_deref(), Some("paid"));
        assert_eq!(found.content, "new\ncontent");
    }

    #[test]
    fn test_list_all_newest_first() {
        let db = test_db();
        upsert(&db, &sample("a.pdf", "")).unwrap();
        upsert(&db, &sample("b.pdf", "")).unwrap();
        upsert(&db, &sample("c.pdf", "")).unwrap();
        // Updating an older row does not move it.
        upsert(&db, &sample("a.pdf", "changed")).unwrap();

        let names: Vec<_> = list_all(&db).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c.pdf", "b.pdf", "a.pdf"]);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let db = test_db();
        upsert(&db, &sample("a.pdf", "")).unwrap();
        let b = upsert(&db, &sample("b.pdf", "")).unwrap();
        assert!(delete(&db, "b.pdf").unwrap());

        let c = upsert(&db, &sample("c.pdf", "")).unwrap();
        assert!(c > b);
    }

    #[test]
    fn test_search_matches_any_column_case_insensitive() {
        let db = test_db();
        upsert(&db, &sample("Invoice-ACME.pdf", "nothing")).unwrap();
        let mut by_keyword = sample("scan1.png", "");
        by_keyword.keyword2 = Some("Insurance".to_string());
        upsert(&db, &by_keyword).unwrap();
        upsert(&db, &sample("letter.pdf", "Dear ACME team")).unwrap();

        let upper: Vec<_> = search(&db, "ACME").unwrap().into_iter().map(|r| r.name).collect();
        let lower: Vec<_> = search(&db, "acme").unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(upper, vec!["letter.pdf", "Invoice-ACME.pdf"]);
        assert_eq!(upper, lower);

        let keyword = search(&db, "insur").unwrap();
        assert_eq!(keyword.len(), 1);
        assert_eq!(keyword[0].name, "scan1.png");

        let date = search(&db, "11.2024").unwrap();
        assert_eq!(date.len(), 3);
    }

    #[test]
    fn test_search_folds_non_ascii() {
        let db = test_db();
        upsert(&db, &sample("brief.pdf", "Straßenverkehrsamt ÜBERWEISUNG")).unwrap();

        assert_eq!(search(&db, "überweisung").unwrap().len(), 1);
        assert_eq!(search(&db, "ÜberWeisung").unwrap().len(), 1);
    }

    #[test]
    fn test_search_sigma_forms_match() {
        let db = test_db();
        upsert(&db, &sample("greek.pdf", "ὁ λόγος")).unwrap();

        for term in ["ς", "Σ", "σ", "ΛΌΓΟΣ", "λόγος"] {
            assert_eq!(search(&db, term).unwrap().len(), 1, "term {term:?}");
        }
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let db = test_db();
        upsert(&db, &sample("a.pdf", "discount 50% off")).unwrap();
        upsert(&db, &sample("b.pdf", "discount 500 off")).unwrap();

        let hits = search(&db, "50%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "a.pdf");

        assert!(search(&db, "a_pdf").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_term_lists_all() {
        let db = test_db();
        upsert(&db, &sample("a.pdf", "")).unwrap();
        upsert(&db, &sample("b.pdf", "")).unwrap();

        assert_eq!(search(&db, "").unwrap(), list_all(&db).unwrap());
    }

    #[test]
    fn test_search_ignores_null_columns() {
        let db = test_db();
        upsert(
            &db,
            &NewDocument {
                name: "bare.pdf".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(search(&db, "tax").unwrap().is_empty());
        assert_eq!(search(&db, "bare").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let db = test_db();
        upsert(&db, &sample("a.pdf", "")).unwrap();

        assert!(!delete(&db, "missing.pdf").unwrap());
        assert_eq!(count(&db).unwrap(), 1);
    }
}

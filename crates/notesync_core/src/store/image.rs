//! Note image table.

use super::EntityTable;
use crate::error::CoreResult;
use crate::model::NoteImage;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

impl EntityTable for NoteImage {
    const TABLE: &'static str = "note_images";
    const COLUMNS: &'static str =
        "id, workspace_id, note_id, file_name, image_path, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(NoteImage {
            id: row.get(0)?,
            workspace_id: row.get(1)?,
            note_id: row.get(2)?,
            file_name: row.get(3)?,
            image_path: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn insert(conn: &Connection, row: &Self) -> CoreResult<i64> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO note_images (workspace_id, note_id, file_name, image_path, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        stmt.execute(params![
            row.workspace_id,
            row.note_id,
            row.file_name,
            row.image_path,
            row.created_at,
            row.updated_at,
        ])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(conn: &Connection, row: &Self) -> CoreResult<()> {
        let mut stmt = conn.prepare_cached(
            "UPDATE note_images SET note_id = ?1, file_name = ?2, image_path = ?3,
                    created_at = ?4, updated_at = ?5
             WHERE id = ?6 AND workspace_id = ?7",
        )?;
        stmt.execute(params![
            row.note_id,
            row.file_name,
            row.image_path,
            row.created_at,
            row.updated_at,
            row.id,
            row.workspace_id,
        ])?;
        Ok(())
    }
}

/// Looks up an image by its natural key: file name and owning note.
pub fn find_by_natural_key(
    conn: &Connection,
    workspace_id: i64,
    note_id: i64,
    file_name: &str,
) -> CoreResult<Option<NoteImage>> {
    let sql = format!(
        "SELECT {} FROM note_images
         WHERE workspace_id = ?1 AND note_id = ?2 AND file_name = ?3
         ORDER BY id LIMIT 1",
        NoteImage::COLUMNS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt
        .query_row(params![workspace_id, note_id, file_name], NoteImage::from_row)
        .optional()?)
}

/// Returns true if an image other than `except_id` stores its bytes at `path`.
pub fn path_in_use(
    conn: &Connection,
    workspace_id: i64,
    path: &str,
    except_id: i64,
) -> CoreResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT EXISTS(SELECT 1 FROM note_images
                       WHERE workspace_id = ?1 AND image_path = ?2 AND id <> ?3)",
    )?;
    Ok(stmt.query_row(params![workspace_id, path, except_id], |row| row.get(0))?)
}

/// Returns the images attached to any of the given notes, ordered by id.
pub fn for_notes(
    conn: &Connection,
    workspace_id: i64,
    note_ids: &[i64],
) -> CoreResult<Vec<NoteImage>> {
    if note_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; note_ids.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM note_images
         WHERE workspace_id = ? AND note_id IN ({placeholders})
         ORDER BY id",
        NoteImage::COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let values = std::iter::once(workspace_id).chain(note_ids.iter().copied());
    let images = stmt
        .query_map(params_from_iter(values), NoteImage::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Note;
    use crate::store::test_support::fixture;
    use chrono::Utc;

    fn note(conn: &Connection, workspace_id: i64) -> i64 {
        let now = Utc::now();
        Note::insert(
            conn,
            &Note {
                id: 0,
                workspace_id,
                title: "n".into(),
                content: None,
                folder_id: None,
                images_json: "[]".into(),
                metadata_json: "{}".into(),
                content_json: None,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap()
    }

    fn image(workspace_id: i64, note_id: i64, name: &str, path: &str) -> NoteImage {
        let now = Utc::now();
        NoteImage {
            id: 0,
            workspace_id,
            note_id,
            file_name: name.into(),
            image_path: Some(path.into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn natural_key_lookup() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();
        let n1 = note(&tx, ws);
        let n2 = note(&tx, ws);

        let id = NoteImage::insert(&tx, &image(ws, n1, "a.png", "workspace_1/images/a.png")).unwrap();
        let found = find_by_natural_key(&tx, ws, n1, "a.png").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(find_by_natural_key(&tx, ws, n2, "a.png").unwrap().is_none());
        assert!(find_by_natural_key(&tx, ws, n1, "b.png").unwrap().is_none());
    }

    #[test]
    fn path_usage_and_images_for_notes() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();
        let n1 = note(&tx, ws);
        let n2 = note(&tx, ws);

        let a = NoteImage::insert(&tx, &image(ws, n1, "a.png", "p/a")).unwrap();
        NoteImage::insert(&tx, &image(ws, n2, "b.png", "p/b")).unwrap();

        assert!(!path_in_use(&tx, ws, "p/a", a).unwrap());
        assert!(path_in_use(&tx, ws, "p/a", a + 100).unwrap());
        let attached = for_notes(&tx, ws, &[n1, n2]).unwrap();
        let paths: Vec<_> = attached.iter().filter_map(|i| i.image_path.as_deref()).collect();
        assert_eq!(paths, vec!["p/a", "p/b"]);
        assert_eq!(for_notes(&tx, ws, &[n2]).unwrap().len(), 1);
        assert!(for_notes(&tx, ws, &[]).unwrap().is_empty());
    }

    #[test]
    fn deleting_note_cascades_images() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();
        let n1 = note(&tx, ws);
        let img = NoteImage::insert(&tx, &image(ws, n1, "a.png", "p/a")).unwrap();

        Note::delete(&tx, n1, ws).unwrap();
        assert!(!NoteImage::exists(&tx, img, ws).unwrap());
    }
}

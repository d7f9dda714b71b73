//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database. Engine code calls store
//! methods through the [`PostcardRepository`] trait; it never executes
//! SQL directly.

use crate::{
    error::SimResult,
    repository::{PathPoint, PostcardRecord, PostcardRepository},
    types::{PostcardId, TravelStatus},
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct PostcardStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl PostcardStore {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based databases, this opens the same file.
    pub fn reopen(&self) -> SimResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_postcards.sql"))?;
        Ok(())
    }

    // ── Postcards ──────────────────────────────────────────────

    /// Insert a new traveling postcard at a starting position.
    /// Returns the generated id.
    pub fn create_postcard(&self, lat: f64, lon: f64, created_at: &str) -> SimResult<PostcardId> {
        let postcard_id = uuid::Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO postcard (postcard_id, status, current_lat, current_lon, created_at)
             VALUES (?1, 'traveling', ?2, ?3, ?4)",
            params![postcard_id, lat.to_string(), lon.to_string(), created_at],
        )?;
        Ok(postcard_id)
    }

    /// Raw insert with caller-chosen id, status, and stored coordinate
    /// text. Lets tests plant rows with corrupt or missing coordinates.
    pub fn insert_raw(
        &self,
        postcard_id: &str,
        status: &str,
        lat: Option<&str>,
        lon: Option<&str>,
        created_at: &str,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO postcard (postcard_id, status, current_lat, current_lon, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![postcard_id, status, lat, lon, created_at],
        )?;
        Ok(())
    }

    pub fn set_status(&self, postcard_id: &str, status: TravelStatus) -> SimResult<()> {
        self.conn.execute(
            "UPDATE postcard SET status = ?1 WHERE postcard_id = ?2",
            params![status.as_str(), postcard_id],
        )?;
        Ok(())
    }

    /// Current status, or None for a value outside the known lifecycle.
    pub fn status(&self, postcard_id: &str) -> SimResult<Option<TravelStatus>> {
        let raw: String = self.conn.query_row(
            "SELECT status FROM postcard WHERE postcard_id = ?1",
            params![postcard_id],
            |row| row.get(0),
        )?;
        Ok(TravelStatus::parse(&raw))
    }

    pub fn position(&self, postcard_id: &str) -> SimResult<(Option<String>, Option<String>)> {
        self.conn
            .query_row(
                "SELECT current_lat, current_lon FROM postcard WHERE postcard_id = ?1",
                params![postcard_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(Into::into)
    }

    pub fn updated_at(&self, postcard_id: &str) -> SimResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM postcard WHERE postcard_id = ?1",
                params![postcard_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    pub fn postcard_count(&self, status: TravelStatus) -> SimResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM postcard WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    // ── Path points ────────────────────────────────────────────

    /// Append one entry to a postcard's travel history. Called by the
    /// creation/teleport flow, not by the drift cycle.
    pub fn add_path_point(
        &self,
        postcard_id: &str,
        point: &PathPoint,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO path_point (postcard_id, label, lat, lon, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![postcard_id, point.label, point.lat, point.lon, point.recorded_at],
        )?;
        Ok(())
    }

    pub fn path_for_postcard(&self, postcard_id: &str) -> SimResult<Vec<PathPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT label, lat, lon, recorded_at FROM path_point
             WHERE postcard_id = ?1 ORDER BY id ASC",
        )?;
        let points = stmt
            .query_map(params![postcard_id], |row| {
                Ok(PathPoint {
                    label:       row.get(0)?,
                    lat:         row.get(1)?,
                    lon:         row.get(2)?,
                    recorded_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(points)
    }

    /// Most recent path point, if any. Used by the nearby listing.
    pub fn last_path_point(&self, postcard_id: &str) -> SimResult<Option<PathPoint>> {
        self.conn
            .query_row(
                "SELECT label, lat, lon, recorded_at FROM path_point
                 WHERE postcard_id = ?1 ORDER BY id DESC LIMIT 1",
                params![postcard_id],
                |row| {
                    Ok(PathPoint {
                        label:       row.get(0)?,
                        lat:         row.get(1)?,
                        lon:         row.get(2)?,
                        recorded_at: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}

impl PostcardRepository for PostcardStore {
    fn traveling_postcards(&self) -> SimResult<Vec<PostcardRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT postcard_id, current_lat, current_lon FROM postcard
             WHERE status = 'traveling'
               AND current_lat IS NOT NULL AND current_lon IS NOT NULL
             ORDER BY postcard_id ASC",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(PostcardRecord {
                    postcard_id: row.get(0)?,
                    current_lat: row.get(1)?,
                    current_lon: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn update_position(
        &self,
        postcard_id: &str,
        lat: f64,
        lon: f64,
        updated_at: &str,
    ) -> SimResult<()> {
        self.conn.execute(
            "UPDATE postcard SET current_lat = ?1, current_lon = ?2, updated_at = ?3
             WHERE postcard_id = ?4",
            params![lat.to_string(), lon.to_string(), updated_at, postcard_id],
        )?;
        Ok(())
    }
}

//! [`SqliteStore`] — the SQLite implementation of [`LogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use strata_core::{
  insight::{Insight, NewInsight},
  point::{DateRange, LogPoint, NewLogPoint},
  store::LogStore,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    RawInsight, RawLogPoint, RawUser, decode_uuid, encode_date,
    encode_domain, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Strata log store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Check that a user row exists before writing rows that reference it.
  async fn require_user(&self, user_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(user_id);

    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    if exists {
      Ok(())
    } else {
      Err(Error::UserNotFound(user_id))
    }
  }
}

// ─── LogStore impl ───────────────────────────────────────────────────────────

impl LogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(user.created_at);
    let name = user.name.clone();
    let email = user.email.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, email, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, email, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, name, email, created_at
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawUser {
                  user_id:    row.get(0)?,
                  name:       row.get(1)?,
                  email:      row.get(2)?,
                  created_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, name, email, created_at
           FROM users ORDER BY created_at, user_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawUser {
              user_id:    row.get(0)?,
              name:       row.get(1)?,
              email:      row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn list_user_ids(&self) -> Result<Vec<Uuid>> {
    let ids: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT user_id FROM users ORDER BY created_at, user_id")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| decode_uuid(s)).collect()
  }

  // ── Log points ────────────────────────────────────────────────────────────

  async fn record_point(&self, input: NewLogPoint) -> Result<LogPoint> {
    self.require_user(input.user_id).await?;

    let point = LogPoint {
      point_id: Uuid::new_v4(),
      user_id:  input.user_id,
      date:     input.date,
      domain:   input.domain,
      metric:   input.metric,
      value:    input.value,
      note:     input.note,
    };

    let point_id_str = encode_uuid(point.point_id);
    let user_id_str = encode_uuid(point.user_id);
    let date_str = encode_date(point.date);
    let domain_str = encode_domain(point.domain).to_owned();
    let metric = point.metric.clone();
    let value = point.value;
    let note = point.note.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO log_points (point_id, user_id, date, domain, metric, value, note)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            point_id_str,
            user_id_str,
            date_str,
            domain_str,
            metric,
            value,
            note,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(point)
  }

  async fn fetch_points(
    &self,
    user_id: Uuid,
    range: Option<DateRange>,
  ) -> Result<Vec<LogPoint>> {
    let user_id_str = encode_uuid(user_id);
    let range_strs =
      range.map(|r| (encode_date(r.start), encode_date(r.end)));

    let raws: Vec<RawLogPoint> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawLogPoint {
            point_id: row.get(0)?,
            user_id:  row.get(1)?,
            date:     row.get(2)?,
            domain:   row.get(3)?,
            metric:   row.get(4)?,
            value:    row.get(5)?,
            note:     row.get(6)?,
          })
        };

        let rows = if let Some((start, end)) = range_strs {
          let mut stmt = conn.prepare(
            "SELECT point_id, user_id, date, domain, metric, value, note
             FROM log_points
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date, point_id",
          )?;
          stmt
            .query_map(rusqlite::params![user_id_str, start, end], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT point_id, user_id, date, domain, metric, value, note
             FROM log_points
             WHERE user_id = ?1
             ORDER BY date, point_id",
          )?;
          stmt
            .query_map(rusqlite::params![user_id_str], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLogPoint::into_point).collect()
  }

  // ── Insights ──────────────────────────────────────────────────────────────

  async fn list_insights(&self, user_id: Uuid) -> Result<Vec<Insight>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawInsight> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT insight_id, user_id, description, correlation_score, created_at
           FROM insights
           WHERE user_id = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| {
            Ok(RawInsight {
              insight_id:        row.get(0)?,
              user_id:           row.get(1)?,
              description:       row.get(2)?,
              correlation_score: row.get(3)?,
              created_at:        row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInsight::into_insight).collect()
  }

  async fn replace_insights(
    &self,
    user_id: Uuid,
    insights: Vec<NewInsight>,
  ) -> Result<Vec<Insight>> {
    self.require_user(user_id).await?;

    let created_at = Utc::now();
    let stored: Vec<Insight> = insights
      .into_iter()
      .map(|input| Insight {
        insight_id: Uuid::new_v4(),
        user_id,
        description: input.description,
        correlation_score: input.score,
        created_at,
      })
      .collect();

    let user_id_str = encode_uuid(user_id);
    let at_str = encode_dt(created_at);
    let rows: Vec<(String, String, f64)> = stored
      .iter()
      .map(|i| {
        (
          encode_uuid(i.insight_id),
          i.description.clone(),
          i.correlation_score,
        )
      })
      .collect();

    // Delete-then-insert inside one transaction: a reader never observes a
    // mix of old and new insights, and a crash leaves either the old set
    // intact or the new set complete.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM insights WHERE user_id = ?1",
          rusqlite::params![user_id_str],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO insights
               (insight_id, user_id, description, correlation_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (insight_id, description, score) in &rows {
            stmt.execute(rusqlite::params![
              insight_id,
              user_id_str,
              description,
              score,
              at_str,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(stored)
  }
}

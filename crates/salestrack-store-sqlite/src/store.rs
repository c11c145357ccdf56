//! [`SqliteStore`] — the SQLite implementation of [`SalesStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use salestrack_core::{
  lead::{Lead, LeadDraft, LeadFilter, LeadPatch, LeadUpdate},
  store::{Page, SalesStore},
  user::{NewUser, User, UserFilter, UserPatch},
};

use crate::{
  Error, Result,
  encode::{
    LEAD_COLUMNS, RawLead, RawUser, USER_COLUMNS, encode_dt, encode_interaction,
    encode_interactions, encode_uuid, read_lead, read_user,
  },
  functions::register_regexp,
  schema::{INDEXES, TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A salestrack store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The handle
/// is created by [`SqliteStore::connect`] and released by
/// [`SqliteStore::close`]; after closing, every clone fails.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, create the tables and build the
  /// unique indexes.
  pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::Connection)?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn connect_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Connection)?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(TABLES)?;
        register_regexp(conn)?;
        Ok(())
      })
      .await
      .map_err(Error::Connection)?;

    conn
      .call(|conn| {
        conn.execute_batch(INDEXES)?;
        Ok(())
      })
      .await
      .map_err(Error::IndexCreation)?;

    Ok(Self { conn })
  }

  /// Close the underlying connection, consuming this handle.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await.map_err(Error::Shutdown)
  }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// A `WHERE` clause under construction, with positional parameters.
#[derive(Default)]
struct Conditions {
  clauses: Vec<String>,
  values:  Vec<Value>,
}

impl Conditions {
  fn push(&mut self, expr: &str, value: Value) {
    self.values.push(value);
    self.clauses.push(format!("{expr} ?{}", self.values.len()));
  }

  fn equals(&mut self, column: &str, value: Option<String>) {
    if let Some(v) = value {
      self.push(&format!("{column} ="), Value::Text(v));
    }
  }

  /// Case-insensitive regular-expression match.
  fn matches(&mut self, column: &str, pattern: Option<&str>) {
    if let Some(p) = pattern {
      self.push(&format!("{column} REGEXP"), Value::Text(format!("(?i){p}")));
    }
  }

  fn where_clause(&self) -> String {
    if self.clauses.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.clauses.join(" AND "))
    }
  }

  /// Append `LIMIT … OFFSET …` parameters and return the full tail.
  fn paginate(&mut self, page: Page) -> String {
    let clause = self.where_clause();
    self.values.push(Value::Integer(i64::try_from(page.limit).unwrap_or(i64::MAX)));
    let limit = self.values.len();
    self.values.push(Value::Integer(i64::try_from(page.skip).unwrap_or(i64::MAX)));
    let offset = self.values.len();
    format!("{clause} ORDER BY rowid LIMIT ?{limit} OFFSET ?{offset}")
  }
}

fn user_conditions(filter: &UserFilter) -> Conditions {
  let mut conds = Conditions::default();
  if let Some(min_age) = filter.min_age {
    conds.push("age >=", Value::Integer(i64::from(min_age)));
  }
  conds
}

fn lead_conditions(filter: &LeadFilter) -> Conditions {
  let mut conds = Conditions::default();
  conds.matches("first_name", filter.first_name.as_deref());
  conds.matches("last_name", filter.last_name.as_deref());
  conds.equals("email", filter.email.clone());
  conds.equals("status", filter.status.map(|s| s.to_string()));
  conds.equals("source", filter.source.map(|s| s.to_string()));
  conds.matches("company", filter.company.as_deref());
  conds.matches("job_title", filter.job_title.as_deref());
  conds.equals("phone", filter.phone.clone());
  conds
}

// ─── SalesStore impl ─────────────────────────────────────────────────────────

impl SalesStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn insert_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:    Uuid::new_v4(),
      name:  input.name,
      email: input.email,
      age:   input.age,
    };

    let id_str = encode_uuid(user.id);
    let name   = user.name.clone();
    let email  = user.email.clone();
    let age    = user.age;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, email, age) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, email, age],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              read_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              read_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>> {
    let id_str = encode_uuid(id);
    let UserPatch { name, email, age } = patch;

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE users SET
                   name  = COALESCE(?2, name),
                   email = COALESCE(?3, email),
                   age   = COALESCE(?4, age)
                 WHERE user_id = ?1
                 RETURNING {USER_COLUMNS}"
              ),
              rusqlite::params![id_str, name, email, age],
              read_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("DELETE FROM users WHERE user_id = ?1 RETURNING {USER_COLUMNS}"),
              rusqlite::params![id_str],
              read_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
    let conds = user_conditions(filter);
    let sql = format!("SELECT COUNT(*) FROM users {}", conds.where_clause());

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(conds.values), |r| r.get(0))?)
      })
      .await?;

    Ok(count.max(0) as u64)
  }

  async fn list_users(&self, filter: &UserFilter, page: Page) -> Result<Vec<User>> {
    let mut conds = user_conditions(filter);
    let sql = format!("SELECT {USER_COLUMNS} FROM users {}", conds.paginate(page));

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(conds.values), read_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  async fn insert_lead(&self, draft: LeadDraft) -> Result<Lead> {
    let lead = Lead {
      id:         Uuid::new_v4(),
      fields:     draft.fields,
      score:      draft.score,
      category:   draft.category,
      created_at: draft.created_at,
      updated_at: draft.updated_at,
    };

    let f = lead.fields.clone();
    let id_str           = encode_uuid(lead.id);
    let source_str       = f.source.to_string();
    let status_str       = f.status.to_string();
    let interactions_str = encode_interactions(&f.interactions)?;
    let category_str     = lead.category.to_string();
    let score            = lead.score;
    let created_at_str   = encode_dt(lead.created_at);
    let updated_at_str   = encode_dt(lead.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO leads ({LEAD_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
          ),
          rusqlite::params![
            id_str,
            f.first_name,
            f.last_name,
            f.company,
            f.company_size,
            f.email,
            f.phone,
            f.job_title,
            source_str,
            status_str,
            interactions_str,
            score,
            category_str,
            created_at_str,
            updated_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(lead)
  }

  async fn find_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawLead> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = ?1"),
              rusqlite::params![id_str],
              read_lead,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLead::into_lead).transpose()
  }

  async fn find_leads_by_identity(
    &self,
    email: &str,
    phone: Option<&str>,
  ) -> Result<Vec<Lead>> {
    let email = email.to_owned();
    let phone = phone.map(str::to_owned);

    let raws: Vec<RawLead> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LEAD_COLUMNS} FROM leads
           WHERE email = ?1 OR (?2 IS NOT NULL AND phone = ?2)
           LIMIT 2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![email, phone], read_lead)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLead::into_lead).collect()
  }

  async fn update_lead(&self, id: Uuid, update: LeadUpdate) -> Result<Option<Lead>> {
    let LeadUpdate { set, push, score, category, updated_at } = update;

    let id_str         = encode_uuid(id);
    let replace_str    = set.interactions.as_deref().map(encode_interactions).transpose()?;
    let push_str       = push.as_ref().map(encode_interaction).transpose()?;
    let source_str     = set.source.map(|s| s.to_string());
    let status_str     = set.status.map(|s| s.to_string());
    let category_str   = category.to_string();
    let updated_at_str = encode_dt(updated_at);
    let LeadPatch { first_name, last_name, company, company_size, email, phone, job_title, .. } =
      set;

    // One statement: `$set` the patch, `$push` or replace interactions, and
    // store the score computed for this write.
    let raw: Option<RawLead> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE leads SET
                   first_name   = COALESCE(?2, first_name),
                   last_name    = COALESCE(?3, last_name),
                   company      = COALESCE(?4, company),
                   company_size = COALESCE(?5, company_size),
                   email        = COALESCE(?6, email),
                   phone        = COALESCE(?7, phone),
                   job_title    = COALESCE(?8, job_title),
                   source       = COALESCE(?9, source),
                   status       = COALESCE(?10, status),
                   interactions = CASE
                                    WHEN ?11 IS NOT NULL THEN ?11
                                    WHEN ?12 IS NOT NULL
                                      THEN json_insert(interactions, '$[#]', json(?12))
                                    ELSE interactions
                                  END,
                   score        = ?13,
                   category     = ?14,
                   updated_at   = ?15
                 WHERE lead_id = ?1
                 RETURNING {LEAD_COLUMNS}"
              ),
              rusqlite::params![
                id_str,
                first_name,
                last_name,
                company,
                company_size,
                email,
                phone,
                job_title,
                source_str,
                status_str,
                replace_str,
                push_str,
                score,
                category_str,
                updated_at_str,
              ],
              read_lead,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLead::into_lead).transpose()
  }

  async fn delete_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawLead> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("DELETE FROM leads WHERE lead_id = ?1 RETURNING {LEAD_COLUMNS}"),
              rusqlite::params![id_str],
              read_lead,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLead::into_lead).transpose()
  }

  async fn count_leads(&self, filter: &LeadFilter) -> Result<u64> {
    let conds = lead_conditions(filter);
    let sql = format!("SELECT COUNT(*) FROM leads {}", conds.where_clause());

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(conds.values), |r| r.get(0))?)
      })
      .await?;

    Ok(count.max(0) as u64)
  }

  async fn list_leads(&self, filter: &LeadFilter, page: Page) -> Result<Vec<Lead>> {
    let mut conds = lead_conditions(filter);
    let sql = format!("SELECT {LEAD_COLUMNS} FROM leads {}", conds.paginate(page));

    let raws: Vec<RawLead> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(conds.values), read_lead)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLead::into_lead).collect()
  }
}

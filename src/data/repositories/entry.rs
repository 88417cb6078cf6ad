use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;
use diesel::sqlite::Sqlite;

use crate::data::models::{ApiError, Entry, EntryRecord, NewEntry};
use crate::schema::{entries, entry_tags};
use crate::utils::{Page, normalize_tags};

pub struct EntryRepository;

impl EntryRepository {
    pub fn create(
        conn: &mut SqliteConnection,
        content: &str,
        tags: &[String],
        now: DateTime<Utc>,
    ) -> Result<Entry, ApiError> {
        if content.is_empty() {
            return Err(ApiError::Validation("Content is required".into()));
        }
        let tags = normalize_tags(tags);

        conn.transaction(|conn| {
            let record = diesel::insert_into(entries::table)
                .values(&NewEntry {
                    content,
                    created_at: now,
                    updated_at: now,
                })
                .returning(EntryRecord::as_returning())
                .get_result(conn)?;

            if !tags.is_empty() {
                let rows: Vec<_> = tags
                    .iter()
                    .map(|tag| (entry_tags::entry_id.eq(record.id), entry_tags::tag.eq(tag)))
                    .collect();
                diesel::insert_into(entry_tags::table).values(&rows).execute(conn)?;
            }

            log::info!("Entry {} created with {} tag(s)", record.id, tags.len());
            Ok(Entry { record, tags })
        })
    }

    pub fn get(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Entry>> {
        let record = entries::table
            .find(id)
            .select(EntryRecord::as_select())
            .first(conn)
            .optional()?;

        match record {
            Some(record) => Ok(Self::attach_tags(conn, vec![record])?.pop()),
            None => Ok(None),
        }
    }

    pub fn exists(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
        select(exists(entries::table.find(id))).get_result(conn)
    }

    /// Newest first. An entry must carry every tag in `tags` to match.
    pub fn list(
        conn: &mut SqliteConnection,
        tags: &[String],
        page: Page,
    ) -> QueryResult<(Vec<Entry>, i64)> {
        let tags = normalize_tags(tags);

        let total = Self::tagged(&tags).count().get_result::<i64>(conn)?;
        let records = Self::tagged(&tags)
            .order((entries::created_at.desc(), entries::id.desc()))
            .limit(page.limit)
            .offset(page.offset)
            .select(EntryRecord::as_select())
            .load(conn)?;

        Ok((Self::attach_tags(conn, records)?, total))
    }

    /// Case-insensitive substring match on the content, newest first.
    pub fn search(
        conn: &mut SqliteConnection,
        query: &str,
        tags: &[String],
        limit: i64,
    ) -> QueryResult<Vec<Entry>> {
        let tags = normalize_tags(tags);
        let mut statement = Self::tagged(&tags);
        if !query.is_empty() {
            statement = statement
                .filter(entries::content.like(format!("%{}%", escape_like(query))).escape('\\'));
        }

        let records = statement
            .order((entries::created_at.desc(), entries::id.desc()))
            .limit(limit)
            .select(EntryRecord::as_select())
            .load(conn)?;

        Self::attach_tags(conn, records)
    }

    /// Deletes the entry and its tags. Cards derived from it keep existing
    /// with their `entry_id` cleared.
    pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
        let deleted = diesel::delete(entries::table.find(id)).execute(conn)?;
        if deleted > 0 {
            log::info!("Entry {} deleted", id);
        }
        Ok(deleted > 0)
    }

    fn tagged<'a>(tags: &'a [String]) -> entries::BoxedQuery<'a, Sqlite> {
        let mut query = entries::table.into_boxed();
        for tag in tags {
            query = query.filter(
                entries::id.eq_any(
                    entry_tags::table
                        .filter(entry_tags::tag.eq(tag))
                        .select(entry_tags::entry_id),
                ),
            );
        }
        query
    }

    fn attach_tags(
        conn: &mut SqliteConnection,
        records: Vec<EntryRecord>,
    ) -> QueryResult<Vec<Entry>> {
        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let rows: Vec<(i32, String)> = entry_tags::table
            .filter(entry_tags::entry_id.eq_any(ids))
            .order((entry_tags::entry_id, entry_tags::tag))
            .select((entry_tags::entry_id, entry_tags::tag))
            .load(conn)?;

        let mut by_entry: HashMap<i32, Vec<String>> = HashMap::new();
        for (entry_id, tag) in rows {
            by_entry.entry(entry_id).or_default().push(tag);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let tags = by_entry.remove(&record.id).unwrap_or_default();
                Entry { record, tags }
            })
            .collect())
    }
}

pub(crate) fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateFilter, CandidateStatistics, NewCandidate};

const CANDIDATE_COLUMNS: &str = "id, name, age, email, phone, skills, experience, applied_position, status, created_at, updated_at";

/// Domain operations over the candidate table.
///
/// Each call is a single storage round-trip; nothing is cached, so reads
/// always observe the latest committed state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// All candidates matching `filter`, ordered by id ascending.
    async fn list(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>>;

    /// `None` when no row has this id.
    async fn get_by_id(&self, id: i32) -> Result<Option<Candidate>>;

    /// Case-insensitive exact match on email, optionally ignoring one row.
    ///
    /// Advisory only: the unique index on `LOWER(email)` is what actually
    /// prevents duplicates when two writers race past this check.
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> Result<bool>;

    /// # Errors
    ///
    /// [`Error::Conflict`] when the email is already taken.
    async fn create(&self, data: &NewCandidate) -> Result<Candidate>;

    /// Replaces every mutable field of an existing row.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the id is unknown, [`Error::Conflict`] when
    /// the new email belongs to another row.
    async fn update(&self, id: i32, data: &NewCandidate) -> Result<Candidate>;

    /// `true` if a row was removed.
    async fn delete(&self, id: i32) -> Result<bool>;

    async fn statistics(&self) -> Result<CandidateStatistics>;

    /// Cheap reachability probe used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn log_query(label: &'static str, started: Instant, rows: usize) {
    tracing::debug!(
        query = label,
        duration_ms = started.elapsed().as_millis() as u64,
        rows,
        "Executed query"
    );
}

/// Escapes LIKE metacharacters so user input is matched literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Builds the WHERE clause and its bind values for a list filter.
fn filter_clause(filter: &CandidateFilter) -> (String, Vec<String>) {
    let mut filters = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(status) = filter.status {
        filters.push(format!("status = ${}", args.len() + 1));
        args.push(status.to_string());
    }
    if let Some(search) = &filter.search {
        let n = args.len() + 1;
        filters.push(format!(
            "(name ILIKE ${n} OR email ILIKE ${n} OR COALESCE(skills, '') ILIKE ${n})"
        ));
        args.push(format!("%{}%", escape_like(search)));
    }

    let where_clause = if filters.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", filters.join(" AND "))
    };
    (where_clause, args)
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn list(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let started = Instant::now();
        let (where_clause, args) = filter_clause(filter);
        let sql = format!(
            "SELECT {} FROM candidates {} ORDER BY id ASC",
            CANDIDATE_COLUMNS, where_clause
        );

        let mut statement = sqlx::query_as::<_, Candidate>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }
        let items = statement.fetch_all(&self.pool).await?;
        log_query("list_candidates", started, items.len());
        Ok(items)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Candidate>> {
        let started = Instant::now();
        let sql = format!("SELECT {} FROM candidates WHERE id = $1", CANDIDATE_COLUMNS);
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        log_query("get_candidate", started, usize::from(candidate.is_some()));
        Ok(candidate)
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> Result<bool> {
        let started = Instant::now();
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM candidates
                WHERE LOWER(email) = LOWER($1)
                  AND ($2::INT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        log_query("email_exists", started, 1);
        Ok(exists)
    }

    async fn create(&self, data: &NewCandidate) -> Result<Candidate> {
        let started = Instant::now();
        let sql = format!(
            r#"
            INSERT INTO candidates (name, age, email, phone, skills, experience, applied_position, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(&data.name)
            .bind(data.age)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.skills)
            .bind(data.experience)
            .bind(&data.applied_position)
            .bind(data.status.as_str())
            .fetch_one(&self.pool)
            .await?;
        log_query("create_candidate", started, 1);
        Ok(candidate)
    }

    async fn update(&self, id: i32, data: &NewCandidate) -> Result<Candidate> {
        let started = Instant::now();
        let sql = format!(
            r#"
            UPDATE candidates
            SET
                name = $1,
                age = $2,
                email = $3,
                phone = $4,
                skills = $5,
                experience = $6,
                applied_position = $7,
                status = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(&data.name)
            .bind(data.age)
            .bind(&data.email)
            .bind(&data.phone)
            .bind(&data.skills)
            .bind(data.experience)
            .bind(&data.applied_position)
            .bind(data.status.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        log_query("update_candidate", started, usize::from(candidate.is_some()));
        candidate.ok_or_else(|| Error::candidate_not_found(id))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let started = Instant::now();
        let res = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        log_query("delete_candidate", started, res.rows_affected() as usize);
        Ok(res.rows_affected() > 0)
    }

    async fn statistics(&self) -> Result<CandidateStatistics> {
        let started = Instant::now();
        let stats = sqlx::query_as::<_, CandidateStatistics>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'Applied') AS applied,
                COUNT(*) FILTER (WHERE status = 'Interviewing') AS interviewing,
                COUNT(*) FILTER (WHERE status = 'Hired') AS hired,
                COUNT(*) FILTER (WHERE status = 'Rejected') AS rejected
            FROM candidates
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        log_query("candidate_statistics", started, 1);
        Ok(stats)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

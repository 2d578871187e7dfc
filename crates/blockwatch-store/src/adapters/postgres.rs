//! PostgreSQL adapter.
//!
//! Hand-rolled parameterized statements over a `sqlx` pool; no ORM. Every
//! operation acquires a connection from the pool for its own duration, and
//! every operation reports its timing and the pool occupancy through the
//! injected [`StoreObserver`].

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use blockwatch_types::{BlockNumber, ChainId, HeaderRecord, NewHeader};

use crate::error::StoreError;
use crate::ports::{BlockStore, StoreObserver};

/// Embedded migrations, applied by the runtime at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

const SELECT_LATEST: &str = "\
    SELECT id, chain_id, number, hash, parent_hash, timestamp \
    FROM block_headers \
    WHERE chain_id = $1 \
    ORDER BY number DESC \
    LIMIT 1";

const SELECT_BY_NUMBER: &str = "\
    SELECT id, chain_id, number, hash, parent_hash, timestamp \
    FROM block_headers \
    WHERE chain_id = $1 AND number = $2";

/// Interior gaps in one statement: pair each stored height with its
/// successor via a window function, then enumerate the missing heights
/// between the pairs. A single snapshot means concurrent inserts cannot
/// produce duplicate gap entries within one call, and the output can never
/// step outside the stored [first, last] range.
const SELECT_MISSING: &str = "\
    WITH ordered AS ( \
        SELECT number AS lo, LEAD(number) OVER (ORDER BY number) AS hi \
        FROM block_headers \
        WHERE chain_id = $1 \
    ), gaps AS ( \
        SELECT lo, hi FROM ordered WHERE hi > lo + 1 \
    ) \
    SELECT gs.n \
    FROM gaps \
    CROSS JOIN LATERAL generate_series(gaps.lo + 1, gaps.hi - 1) AS gs(n) \
    ORDER BY gs.n \
    LIMIT $2";

/// Block store backed by PostgreSQL.
pub struct PgBlockStore {
    pool: PgPool,
    observer: Arc<dyn StoreObserver>,
}

impl PgBlockStore {
    pub fn new(pool: PgPool, observer: Arc<dyn StoreObserver>) -> Self {
        Self { pool, observer }
    }

    /// The underlying pool, for lifecycle management by the runtime.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn finish(&self, action: &str, started: Instant, success: bool) {
        self.observer.record_query(
            "block_headers",
            action,
            success,
            started.elapsed().as_secs_f64(),
        );
        let idle = self.pool.num_idle() as u64;
        let active = u64::from(self.pool.size()).saturating_sub(idle);
        self.observer.record_pool(active, idle);
    }

    async fn latest_inner(&self, chain_id: ChainId) -> Result<Option<HeaderRecord>, StoreError> {
        let row = sqlx::query(SELECT_LATEST)
            .bind(chain_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn by_number_inner(
        &self,
        chain_id: ChainId,
        number: BlockNumber,
    ) -> Result<Option<HeaderRecord>, StoreError> {
        let row = sqlx::query(SELECT_BY_NUMBER)
            .bind(chain_id)
            .bind(number as i64)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn upsert_many_inner(&self, headers: &[NewHeader]) -> Result<u64, StoreError> {
        let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "INSERT INTO block_headers (chain_id, number, hash, parent_hash, timestamp) ",
        );
        builder.push_values(headers, |mut row, header| {
            row.push_bind(header.chain_id)
                .push_bind(header.number as i64)
                .push_bind(&header.hash)
                .push_bind(&header.parent_hash)
                .push_bind(i64::from(header.timestamp));
        });
        builder.push(" ON CONFLICT DO NOTHING");

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find_missing_inner(
        &self,
        chain_id: ChainId,
        limit: usize,
    ) -> Result<Vec<BlockNumber>, StoreError> {
        let rows = sqlx::query(SELECT_MISSING)
            .bind(chain_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let mut missing = Vec::with_capacity(rows.len());
        for row in &rows {
            let n: i64 = row.try_get("n").map_err(StoreError::from)?;
            missing.push(n as u64);
        }
        Ok(missing)
    }
}

#[async_trait]
impl BlockStore for PgBlockStore {
    async fn latest(&self, chain_id: ChainId) -> Result<Option<HeaderRecord>, StoreError> {
        let started = Instant::now();
        let result = self.latest_inner(chain_id).await;
        self.finish("latest", started, result.is_ok());
        result
    }

    async fn by_number(
        &self,
        chain_id: ChainId,
        number: BlockNumber,
    ) -> Result<Option<HeaderRecord>, StoreError> {
        let started = Instant::now();
        let result = self.by_number_inner(chain_id, number).await;
        self.finish("by_number", started, result.is_ok());
        result
    }

    async fn upsert_many(&self, headers: &[NewHeader]) -> Result<u64, StoreError> {
        if headers.is_empty() {
            return Ok(0);
        }
        let started = Instant::now();
        let result = self.upsert_many_inner(headers).await;
        self.finish("upsert_many", started, result.is_ok());
        result
    }

    async fn find_missing_in_range(
        &self,
        chain_id: ChainId,
        limit: usize,
    ) -> Result<Vec<BlockNumber>, StoreError> {
        let started = Instant::now();
        let result = self.find_missing_inner(chain_id, limit).await;
        self.finish("find_missing_in_range", started, result.is_ok());
        result
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let started = Instant::now();
        let result = sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(StoreError::from);
        self.finish("ping", started, result.is_ok());
        result
    }
}

fn record_from_row(row: &PgRow) -> Result<HeaderRecord, StoreError> {
    Ok(HeaderRecord {
        id: row.try_get::<i64, _>("id").map_err(StoreError::from)?,
        chain_id: row.try_get::<i32, _>("chain_id").map_err(StoreError::from)?,
        number: row.try_get::<i64, _>("number").map_err(StoreError::from)? as u64,
        hash: row.try_get("hash").map_err(StoreError::from)?,
        parent_hash: row.try_get("parent_hash").map_err(StoreError::from)?,
        timestamp: row.try_get::<i64, _>("timestamp").map_err(StoreError::from)? as u32,
    })
}

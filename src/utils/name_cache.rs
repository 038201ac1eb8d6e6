use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// emp_code -> display name, used when rendering attendance rows so the
/// per-shift query does not join employees on every request.
pub static EMPLOYEE_NAME_CACHE: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(50_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

// Only one warmup may run at a time.
static WARMUP_RUNNING: AtomicBool = AtomicBool::new(false);

/// Cached name lookup with a single-row DB fallback on miss.
pub async fn get_name(pool: &MySqlPool, emp_code: &str) -> Option<String> {
    if let Some(name) = EMPLOYEE_NAME_CACHE.get(emp_code).await {
        return Some(name);
    }

    let row = sqlx::query_as::<_, (String,)>("SELECT name FROM employees WHERE emp_code = ?")
        .bind(emp_code)
        .fetch_optional(pool)
        .await
        .ok()
        .flatten();

    if let Some((name,)) = row {
        EMPLOYEE_NAME_CACHE
            .insert(emp_code.to_string(), name.clone())
            .await;
        return Some(name);
    }
    None
}

/// Seed or refresh a single entry (employee create/update path).
pub async fn store(emp_code: &str, name: &str) {
    EMPLOYEE_NAME_CACHE
        .insert(emp_code.to_string(), name.to_string())
        .await;
}

pub async fn invalidate(emp_code: &str) {
    EMPLOYEE_NAME_CACHE.invalidate(emp_code).await;
}

async fn batch_store(rows: &[(String, String)]) {
    let futures: Vec<_> = rows
        .iter()
        .map(|(code, name)| EMPLOYEE_NAME_CACHE.insert(code.clone(), name.clone()))
        .collect();

    futures::future::join_all(futures).await;
}

/// Streams every employee name into the cache in batches. A second call
/// while one is in flight returns immediately.
pub async fn warmup_name_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    if WARMUP_RUNNING
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        tracing::info!("Employee name cache warmup already running, skipping");
        return Ok(());
    }

    let result = run_warmup(pool, batch_size).await;
    WARMUP_RUNNING.store(false, Ordering::SeqCst);
    result
}

async fn run_warmup(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT emp_code, name
        FROM employees
        ORDER BY emp_code
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        batch.push(row?);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_store(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_store(&batch).await;
    }

    tracing::info!("Employee name cache warmup complete: {} employees", total_count);

    Ok(())
}

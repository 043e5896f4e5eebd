//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! collection jobs whose cron expressions are configured.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use trendfeed_core::AppConfig;
use trendfeed_trends::TrendingNowParams;

use crate::api::AppState;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    state: AppState,
    config: &AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    if let Some(cron) = config.trends_cron.as_deref() {
        register_trends_job(&scheduler, state.clone(), cron).await?;
    }
    if let Some(cron) = config.ranking_cron.as_deref() {
        register_ranking_job(&scheduler, state, cron).await?;
    }

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register a trending-now collection job with default request parameters.
async fn register_trends_job(
    scheduler: &JobScheduler,
    state: AppState,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting trending-now collection");
            match trendfeed_trends::collect_trending_now(
                &state.serpapi,
                &state.pool,
                TrendingNowParams::default(),
            )
            .await
            {
                Ok(outcome) => {
                    tracing::info!(stored = outcome.stored, "scheduler: trending-now run complete");
                }
                Err(e) => tracing::error!(error = %e, "scheduler: trending-now run failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: registered trending-now job");
    Ok(())
}

/// Register a ranking collection job. Uncategorized titles are classified
/// when a generation provider is configured.
async fn register_ranking_job(
    scheduler: &JobScheduler,
    state: AppState,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting ranking collection");
            match trendfeed_ranking::collect_ranking(&state.ranking, &state.pool, Some(&state.chat))
                .await
            {
                Ok(items) => {
                    tracing::info!(parsed = items.len(), "scheduler: ranking run complete");
                }
                Err(e) => tracing::error!(error = %e, "scheduler: ranking run failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: registered ranking job");
    Ok(())
}

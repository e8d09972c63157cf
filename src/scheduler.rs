use crate::service::AnalysisService;
use anyhow::Result;
use chrono_tz::Tz;
use iana_time_zone::get_timezone;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Periodic re-scoring of every stored conversation.
pub struct BatchScheduler {
    service: Arc<AnalysisService>,
    scheduler: Mutex<JobScheduler>,
    cron_expr: String,
}

/// Accepts classic five-field cron by prepending a seconds field.
fn normalize_cron_expr(cron_expr: &str) -> String {
    let parts: Vec<&str> = cron_expr.split_whitespace().collect();
    if parts.len() == 5 {
        format!("0 {}", cron_expr.trim())
    } else {
        cron_expr.trim().to_string()
    }
}

impl BatchScheduler {
    pub async fn new(cron_expr: &str, service: Arc<AnalysisService>) -> Result<Arc<Self>> {
        let scheduler = JobScheduler::new().await?;
        Ok(Arc::new(Self {
            service,
            scheduler: Mutex::new(scheduler),
            cron_expr: normalize_cron_expr(cron_expr),
        }))
    }

    pub async fn start(&self, run_on_start: bool) -> Result<()> {
        let service = self.service.clone();
        let timezone: Tz = get_timezone()?.parse()?;

        let job = Job::new_async_tz(self.cron_expr.as_str(), timezone, move |_uuid, _l| {
            let service = service.clone();
            Box::pin(async move {
                info!("Running scheduled batch analysis");
                if let Err(e) = service.run_batch().await {
                    error!("Scheduled batch analysis failed: {:#}", e);
                }
            })
        })?;

        let scheduler = self.scheduler.lock().await;
        scheduler.add(job).await?;
        scheduler.start().await?;
        info!(
            "Batch scheduler started ({} in {})",
            self.cron_expr, timezone
        );
        drop(scheduler);

        if run_on_start {
            let service = self.service.clone();
            tokio::spawn(async move {
                if let Err(e) = service.run_batch().await {
                    error!("Startup batch analysis failed: {:#}", e);
                }
            });
        }
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.scheduler.lock().await.shutdown().await?;
        info!("Batch scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cron_expr() {
        assert_eq!(normalize_cron_expr("30 2 * * *"), "0 30 2 * * *");
        assert_eq!(normalize_cron_expr(" 0 0 0 * * * "), "0 0 0 * * *");
    }

    #[tokio::test]
    async fn test_default_schedule_parses() {
        let timezone: Tz = "UTC".parse().unwrap();
        let job = Job::new_async_tz(
            normalize_cron_expr("0 0 * * *").as_str(),
            timezone,
            |_, _| Box::pin(async {}),
        );
        assert!(job.is_ok());
    }
}

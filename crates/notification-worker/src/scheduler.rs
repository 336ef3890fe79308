//! Cron 调度器
//!
//! 每个任务在独立的 tokio 任务中运行：计算下一次触发时间，休眠到期后执行，
//! 收到关闭信号时立即退出等待。

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use cron::Schedule;
use lingo_shared::observability::metrics;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{NotificationError, Result};
use crate::jobs::ScheduledJob;

struct ScheduleEntry {
    schedule: Schedule,
    job: Arc<dyn ScheduledJob>,
}

/// 任务调度器
#[derive(Default)]
pub struct Scheduler {
    entries: Vec<ScheduleEntry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册任务
    ///
    /// `expression` 为六段式 cron 表达式（秒 分 时 日 月 周）
    pub fn add(&mut self, expression: &str, job: Arc<dyn ScheduledJob>) -> Result<()> {
        let schedule = Schedule::from_str(expression).map_err(|e| {
            NotificationError::InvalidSchedule(format!("{} ({}): {}", job.name(), expression, e))
        })?;
        self.entries.push(ScheduleEntry { schedule, job });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 启动所有任务，返回各任务的句柄
    pub fn start(self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        self.entries
            .into_iter()
            .map(|entry| tokio::spawn(run_loop(entry, shutdown.clone())))
            .collect()
    }
}

async fn run_loop(entry: ScheduleEntry, mut shutdown: watch::Receiver<bool>) {
    let name = entry.job.name();
    info!(job = name, "定时任务已启动");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let Some(next) = entry.schedule.upcoming(Utc).next() else {
            warn!(job = name, "No upcoming run for schedule, stopping");
            break;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or_default();

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                run_once(entry.job.as_ref()).await;
            }
            _ = shutdown.changed() => {
                break;
            }
        }
    }

    info!(job = name, "定时任务已停止");
}

/// 执行一次任务并记录指标
pub async fn run_once(job: &dyn ScheduledJob) -> bool {
    let name = job.name();
    let started = Instant::now();

    let ok = match job.execute().await {
        Ok(()) => {
            info!(job = name, elapsed_ms = started.elapsed().as_millis() as u64, "Job finished");
            metrics::record_job_run(name, "success");
            true
        }
        Err(e) => {
            error!(job = name, error = %e, "Job failed");
            metrics::record_job_run(name, "failure");
            false
        }
    };

    // 记录 Worker 健康状态
    metrics::set_worker_last_run(name);
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingJob {
        runs: AtomicUsize,
        fail: bool,
    }

    impl CountingJob {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                runs: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl ScheduledJob for CountingJob {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn execute(&self) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NotificationError::SendFailed {
                    endpoint: "https://push.example.com".to_string(),
                    reason: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_invalid_expression_rejected() {
        let mut scheduler = Scheduler::new();
        let err = scheduler
            .add("every day at noon", CountingJob::new(false))
            .unwrap_err();
        assert!(matches!(err, NotificationError::InvalidSchedule(_)));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_valid_expression_registered() {
        let mut scheduler = Scheduler::new();
        scheduler.add("0 0 18 * * *", CountingJob::new(false)).unwrap();
        scheduler.add("0 10 0 * * *", CountingJob::new(false)).unwrap();
        assert_eq!(scheduler.len(), 2);
    }

    #[tokio::test]
    async fn test_run_once_reports_outcome() {
        let ok_job = CountingJob::new(false);
        assert!(run_once(ok_job.as_ref()).await);
        assert_eq!(ok_job.runs.load(Ordering::SeqCst), 1);

        let failing_job = CountingJob::new(true);
        assert!(!run_once(failing_job.as_ref()).await);
        assert_eq!(failing_job.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_jobs_run_until_shutdown() {
        let job = CountingJob::new(false);
        let mut scheduler = Scheduler::new();
        scheduler.add("* * * * * *", job.clone()).unwrap();

        let (tx, rx) = watch::channel(false);
        let handles = scheduler.start(rx);

        tokio::time::sleep(Duration::from_millis(2200)).await;
        tx.send(true).unwrap();
        for handle in handles {
            tokio::time::timeout(Duration::from_secs(2), handle)
                .await
                .unwrap()
                .unwrap();
        }

        assert!(job.runs.load(Ordering::SeqCst) >= 1);
    }
}

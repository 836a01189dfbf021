//! In-process remote mirror that sleeps to mimic network latency.

use super::{NetworkDataSource, RemoteResult};
use crate::model::task::NetworkTask;
use async_trait::async_trait;
use log::debug;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_SERVICE_LATENCY: Duration = Duration::from_millis(2000);

/// Simulated remote mirror.
///
/// One async lock guards the collection and is held across the latency
/// sleep, so a fetch never observes a half-applied upload.
pub struct SimulatedNetworkDataSource {
    tasks: Mutex<Vec<NetworkTask>>,
    latency: Duration,
}

impl SimulatedNetworkDataSource {
    /// Creates a mirror seeded with the demo tasks.
    pub fn new(latency: Duration) -> Self {
        Self::with_tasks(seed_tasks(), latency)
    }

    pub fn with_tasks(tasks: Vec<NetworkTask>, latency: Duration) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            latency,
        }
    }
}

impl Default for SimulatedNetworkDataSource {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_LATENCY)
    }
}

#[async_trait]
impl NetworkDataSource for SimulatedNetworkDataSource {
    async fn fetch_tasks(&self) -> RemoteResult<Vec<NetworkTask>> {
        let tasks = self.tasks.lock().await;
        tokio::time::sleep(self.latency).await;
        debug!("event=remote_fetch module=network status=ok count={}", tasks.len());
        Ok(tasks.clone())
    }

    async fn upload_tasks(&self, tasks: Vec<NetworkTask>) -> RemoteResult<()> {
        let mut current = self.tasks.lock().await;
        tokio::time::sleep(self.latency).await;
        debug!("event=remote_upload module=network status=ok count={}", tasks.len());
        *current = tasks;
        Ok(())
    }
}

fn seed_tasks() -> Vec<NetworkTask> {
    vec![
        NetworkTask::new(
            "PISA",
            "Build tower in Pisa",
            "Ground looks good, no foundation work required",
        ),
        NetworkTask::new(
            "TACOMA",
            "Finish bridge in Tacoma",
            "Found awesome girders at half the cost!",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::SimulatedNetworkDataSource;
    use crate::model::task::NetworkTask;
    use crate::network::NetworkDataSource;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test]
    async fn starts_with_demo_seed() {
        let remote = SimulatedNetworkDataSource::new(Duration::ZERO);
        let ids: Vec<String> = remote
            .fetch_tasks()
            .await
            .expect("fetch should succeed")
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec!["PISA".to_string(), "TACOMA".to_string()]);
    }

    #[tokio::test]
    async fn upload_replaces_whole_collection() {
        let remote = SimulatedNetworkDataSource::new(Duration::ZERO);
        remote
            .upload_tasks(vec![NetworkTask::new("1", "title1", "description1")])
            .await
            .expect("upload should succeed");

        let tasks = remote.fetch_tasks().await.expect("fetch should succeed");
        assert_eq!(tasks, vec![NetworkTask::new("1", "title1", "description1")]);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_and_upload_are_serialized() {
        let remote = Arc::new(SimulatedNetworkDataSource::new(Duration::from_millis(2000)));
        let started = Instant::now();

        let uploader = {
            let remote = Arc::clone(&remote);
            tokio::spawn(async move { remote.upload_tasks(Vec::new()).await })
        };
        tokio::task::yield_now().await;
        let fetched = remote.fetch_tasks().await.expect("fetch should succeed");
        uploader
            .await
            .expect("upload task should join")
            .expect("upload should succeed");

        assert!(fetched.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(4000));
    }
}

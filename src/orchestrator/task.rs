use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::{RttConfig, StorageConfig};
use crate::error::{GatewayError, Result};
use crate::token::{BuilderToken, BuilderTokenCache, MediaTokenBuilder};
use crate::vendor::{
    AgoraRtcConfig, AudioInput, CloudStorageOutput, DataStreamOutput, OutputConfig,
    RecognizeConfig, SpeechTaskApi, SubscribeConfig, TaskConfig, TaskRequest, CHANNEL_TYPE_LIVE,
    DESTINATION_DATA_STREAM, DESTINATION_STORAGE, FEATURE_RECOGNIZE, RECOGNIZE_MODEL,
    SUBSCRIBE_MODE_CHANNEL, SUBSCRIBE_SOURCE_RTC,
};

/// Identifier and status of a successfully started task. The caller is
/// responsible for retaining the id to query or stop the task later; no
/// task state is kept server-side.
#[derive(Debug, Clone, Serialize)]
pub struct TaskHandle {
    pub task_id: String,
    pub status: String,
}

/// Sequences start/query/stop calls, pairing each with a builder token
/// from the shared cache.
pub struct TaskOrchestrator {
    api: Arc<dyn SpeechTaskApi>,
    tokens: BuilderTokenCache,
    media: MediaTokenBuilder,
    rtt: RttConfig,
    storage: Option<StorageConfig>,
}

impl TaskOrchestrator {
    pub fn new(
        api: Arc<dyn SpeechTaskApi>,
        tokens: BuilderTokenCache,
        media: MediaTokenBuilder,
        rtt: RttConfig,
        storage: Option<StorageConfig>,
    ) -> Self {
        Self {
            api,
            tokens,
            media,
            rtt,
            storage,
        }
    }

    /// Return a builder token, acquiring a fresh one when the cache is
    /// empty or when `force_refresh` is set.
    async fn ensure_builder_token(&self, force_refresh: bool) -> Result<BuilderToken> {
        if !force_refresh {
            if let Some(token) = self.tokens.current().await {
                return Ok(token);
            }
        }

        let token = self.api.acquire_builder_token(&self.rtt.instance_id).await?;
        self.tokens.store(token.clone()).await;
        info!("Acquired builder token for instance {}", self.rtt.instance_id);
        Ok(token)
    }

    fn build_task_request(&self, channel: &str) -> TaskRequest {
        let audio_token = self.media.token_now(channel, self.rtt.audio_uid);
        let text_token = self.media.token_now(channel, self.rtt.text_uid);

        let mut destinations = vec![DESTINATION_DATA_STREAM.to_string()];
        let cloud_storage = self.storage.as_ref().map(|cfg| {
            destinations.push(DESTINATION_STORAGE.to_string());
            CloudStorageOutput::from(cfg)
        });

        TaskRequest {
            audio: AudioInput {
                subscribe_source: SUBSCRIBE_SOURCE_RTC.to_string(),
                agora_rtc_config: AgoraRtcConfig {
                    channel_name: channel.to_string(),
                    uid: self.rtt.audio_uid.to_string(),
                    token: audio_token,
                    channel_type: CHANNEL_TYPE_LIVE.to_string(),
                    subscribe_config: SubscribeConfig {
                        subscribe_mode: SUBSCRIBE_MODE_CHANNEL.to_string(),
                    },
                    max_idle_time: self.rtt.max_idle_time_secs,
                },
            },
            config: TaskConfig {
                features: vec![FEATURE_RECOGNIZE.to_string()],
                recognize_config: RecognizeConfig {
                    language: self.rtt.language.clone(),
                    model: RECOGNIZE_MODEL.to_string(),
                    output: OutputConfig {
                        destinations,
                        agora_rtc_data_stream: DataStreamOutput {
                            channel_name: channel.to_string(),
                            uid: self.rtt.text_uid.to_string(),
                            token: text_token,
                        },
                        cloud_storage,
                    },
                },
            },
        }
    }

    /// Start a transcription task for `channel`.
    pub async fn start_task(&self, channel: &str) -> Result<TaskHandle> {
        let builder_token = self
            .ensure_builder_token(self.rtt.refresh_token_per_call)
            .await?;

        let request = self.build_task_request(channel);
        let response = match self.api.create_task(&builder_token, &request).await {
            Ok(r) => r,
            Err(e) => {
                error!("Failed to start task for channel {}: {}", channel, e);
                return Err(e);
            }
        };

        let status = response.status.unwrap_or_default();
        match status.as_str() {
            "IN_PROGRESS" | "STARTED" => {
                let task_id = response.task_id.ok_or_else(|| {
                    GatewayError::MalformedResponse(
                        "task response missing taskId".to_string(),
                    )
                })?;
                info!(
                    "RTT task started for channel {} id: {}",
                    channel, task_id
                );
                Ok(TaskHandle { task_id, status })
            }
            other => {
                warn!("RTT task not started, vendor status: {}", other);
                Err(GatewayError::TaskRejected {
                    status: other.to_string(),
                })
            }
        }
    }

    /// Query the vendor status of a previously started task.
    pub async fn query_task(&self, task_id: &str) -> Result<String> {
        let builder_token = self.ensure_builder_token(false).await?;

        match self.api.query_task(&builder_token, task_id).await {
            Ok(response) => {
                let status = response.status.ok_or_else(|| {
                    GatewayError::MalformedResponse(
                        "task response missing status".to_string(),
                    )
                })?;
                info!("RTT query task {} status: {}", task_id, status);
                Ok(status)
            }
            Err(e) => {
                error!("Failed to query task {}: {}", task_id, e);
                Err(e)
            }
        }
    }

    /// Stop a previously started task.
    pub async fn stop_task(&self, task_id: &str) -> Result<()> {
        let builder_token = self.ensure_builder_token(false).await?;

        match self.api.delete_task(&builder_token, task_id).await {
            Ok(()) => {
                info!("RTT stopped task {}", task_id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to stop task {}: {}", task_id, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::TaskResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted vendor that counts calls and replays a fixed task status.
    struct ScriptedApi {
        token_calls: AtomicUsize,
        create_calls: AtomicUsize,
        task_status: String,
        task_id: Option<String>,
    }

    impl ScriptedApi {
        fn new(status: &str, task_id: Option<&str>) -> Self {
            Self {
                token_calls: AtomicUsize::new(0),
                create_calls: AtomicUsize::new(0),
                task_status: status.to_string(),
                task_id: task_id.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl SpeechTaskApi for ScriptedApi {
        async fn acquire_builder_token(&self, _instance_id: &str) -> Result<BuilderToken> {
            let n = self.token_calls.fetch_add(1, Ordering::SeqCst);
            Ok(BuilderToken::new(format!("token-{n}")))
        }

        async fn create_task(
            &self,
            _builder_token: &BuilderToken,
            _request: &TaskRequest,
        ) -> Result<TaskResponse> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            Ok(TaskResponse {
                task_id: self.task_id.clone(),
                status: Some(self.task_status.clone()),
            })
        }

        async fn query_task(
            &self,
            _builder_token: &BuilderToken,
            _task_id: &str,
        ) -> Result<TaskResponse> {
            Ok(TaskResponse {
                task_id: self.task_id.clone(),
                status: Some(self.task_status.clone()),
            })
        }

        async fn delete_task(&self, _builder_token: &BuilderToken, _task_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn orchestrator(api: Arc<ScriptedApi>, refresh_per_call: bool) -> TaskOrchestrator {
        let rtt = RttConfig {
            refresh_token_per_call: refresh_per_call,
            ..RttConfig::default()
        };
        TaskOrchestrator::new(
            api,
            BuilderTokenCache::new(),
            MediaTokenBuilder::new("app", "cert", 3600, 3600),
            rtt,
            None,
        )
    }

    #[tokio::test]
    async fn start_returns_task_id_on_started() {
        let api = Arc::new(ScriptedApi::new("STARTED", Some("abc-123")));
        let orch = orchestrator(api.clone(), false);

        let handle = orch.start_task("room42").await.unwrap();
        assert_eq!(handle.task_id, "abc-123");
        assert_eq!(handle.status, "STARTED");
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn start_accepts_in_progress() {
        let api = Arc::new(ScriptedApi::new("IN_PROGRESS", Some("xyz-9")));
        let orch = orchestrator(api, false);

        let handle = orch.start_task("room42").await.unwrap();
        assert_eq!(handle.task_id, "xyz-9");
    }

    #[tokio::test]
    async fn start_rejects_failed_status() {
        let api = Arc::new(ScriptedApi::new("FAILED", None));
        let orch = orchestrator(api, false);

        let err = orch.start_task("room42").await.unwrap_err();
        match err {
            GatewayError::TaskRejected { status } => assert_eq!(status, "FAILED"),
            other => panic!("expected TaskRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn builder_token_reused_across_starts_by_default() {
        let api = Arc::new(ScriptedApi::new("STARTED", Some("abc")));
        let orch = orchestrator(api.clone(), false);

        orch.start_task("room1").await.unwrap();
        orch.start_task("room2").await.unwrap();
        assert_eq!(api.token_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn builder_token_refreshed_per_call_when_configured() {
        let api = Arc::new(ScriptedApi::new("STARTED", Some("abc")));
        let orch = orchestrator(api.clone(), true);

        orch.start_task("room1").await.unwrap();
        orch.start_task("room1").await.unwrap();
        assert_eq!(api.token_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn storage_section_adds_destination() {
        let api = Arc::new(ScriptedApi::new("STARTED", Some("abc")));
        let orch = TaskOrchestrator::new(
            api,
            BuilderTokenCache::new(),
            MediaTokenBuilder::new("app", "cert", 3600, 3600),
            RttConfig::default(),
            Some(StorageConfig {
                access_key: "ak".to_string(),
                secret_key: "sk".to_string(),
                bucket: "bucket".to_string(),
                vendor_id: 1,
                region: 1,
                file_name_prefix: vec!["folder".to_string()],
            }),
        );

        let request = orch.build_task_request("room42");
        let output = &request.config.recognize_config.output;
        assert!(output.destinations.contains(&DESTINATION_STORAGE.to_string()));
        assert!(output.cloud_storage.is_some());
    }
}

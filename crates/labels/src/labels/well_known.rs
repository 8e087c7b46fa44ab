//! Well-known label keys set by the platform on its own resources.

/// Common prefix for platform-managed labels.
pub const LABELS_PREFIX: &str = "urth/";

pub const LABEL_WORKER_CAP_PREFIX: &str = "urth/capability.";
pub const LABEL_WORKER_CAP_PROB_PREFIX: &str = "urth/capability.prob.";

// Workers
pub const LABEL_WORKER_OS: &str = "urth/worker.os";
pub const LABEL_WORKER_ARCH: &str = "urth/worker.arch";
pub const LABEL_WORKER_BUILD_VERSION: &str = "urth/worker.build.version";
pub const LABEL_WORKER_NAME: &str = "urth/worker.name";
pub const LABEL_WORKER_UID: &str = "urth/worker.uid";
pub const LABEL_WORKER_VERSION: &str = "urth/worker.version";

// Runners
pub const LABEL_RUNNER_NAME: &str = "urth/runner.name";
pub const LABEL_RUNNER_UID: &str = "urth/runner.uid";
pub const LABEL_RUNNER_VERSION: &str = "urth/runner.version";

// Scenarios
pub const LABEL_SCENARIO_NAME: &str = "urth/scenario.name";
pub const LABEL_SCENARIO_UID: &str = "urth/scenario.uid";
pub const LABEL_SCENARIO_VERSION: &str = "urth/scenario.version";
pub const LABEL_SCENARIO_KIND: &str = "urth/scenario.kind";

// Run results
pub const LABEL_RESULT_NAME: &str = "urth/result.name";
pub const LABEL_RESULT_UID: &str = "urth/result.uid";
pub const LABEL_RESULT_VERSION: &str = "urth/result.version";
pub const LABEL_RESULT_JOB_STATE: &str = "urth/result.state";
pub const LABEL_RESULT_STATUS: &str = "urth/result.result";
pub const LABEL_RESULT_MESSAGE_ID: &str = "run.messageId";

// Artifacts
pub const LABEL_ARTIFACT_KIND: &str = "urth/artifact.kind";
pub const LABEL_ARTIFACT_MIME: &str = "urth/artifact.mime";

/// Returns true if `key` is a platform-managed label.
pub fn is_managed_key(key: &str) -> bool {
    key.starts_with(LABELS_PREFIX)
}

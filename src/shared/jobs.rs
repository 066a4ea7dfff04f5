/**
 * Job Wire Types
 *
 * Types describing test-run and security-scan jobs as they travel between a
 * client, the gateway, and the external executor. Field names follow the
 * executor's snake_case JSON; gateway-facing responses are camelCase.
 *
 * A job moves through `queued -> running -> {completed | failed}` and is
 * only ever advanced by the executor.
 */
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Kind of job accepted by the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Automated test execution against a repository
    Test,
    /// Security scan of a repository
    SecurityScan,
}

impl JobKind {
    /// Prefix used for client-generated job ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::SecurityScan => "scan",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => f.write_str("test"),
            Self::SecurityScan => f.write_str("security_scan"),
        }
    }
}

/// Lifecycle status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether no further transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a submitted job
///
/// The string part is generated client-side (`test-<millis>` / `scan-<millis>`)
/// and is what the executor keys its status and results by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId {
    pub kind: JobKind,
    pub id: String,
}

/// Longest job id accepted from callers
pub const MAX_JOB_ID_LEN: usize = 128;

impl JobId {
    pub fn new(kind: JobKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    /// Accept a caller-supplied id
    ///
    /// Ids end up as a URL path segment on the executor, so only ASCII
    /// letters, digits, `-` and `_` are allowed.
    pub fn parse(kind: JobKind, id: &str) -> Result<Self, SharedError> {
        let well_formed = !id.is_empty()
            && id.len() <= MAX_JOB_ID_LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !well_formed {
            return Err(SharedError::validation("id", "Invalid job id"));
        }
        Ok(Self::new(kind, id))
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Security scanner selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerType {
    /// Vulnerable dependency audit
    Dependency,
    /// Static analysis
    Sast,
    /// Committed secrets detection
    Secrets,
}

impl FromStr for ScannerType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dependency" => Ok(Self::Dependency),
            "sast" => Ok(Self::Sast),
            "secrets" => Ok(Self::Secrets),
            other => Err(SharedError::validation(
                "scanner_type",
                format!("Unsupported scanner: {}", other),
            )),
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}

/// Parameters of a test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunParams {
    pub repository_url: String,
    /// Test framework (jest, pytest, ...)
    pub framework: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_command: Option<String>,
    #[serde(default)]
    pub environment_vars: HashMap<String, String>,
}

impl TestRunParams {
    pub fn new(repository_url: impl Into<String>, framework: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            framework: framework.into(),
            branch: default_branch(),
            test_command: None,
            environment_vars: HashMap::new(),
        }
    }
}

/// Parameters of a security scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanParams {
    pub repository_url: String,
    pub scanner_type: ScannerType,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl ScanParams {
    pub fn new(repository_url: impl Into<String>, scanner_type: ScannerType) -> Self {
        Self {
            repository_url: repository_url.into(),
            scanner_type,
            branch: default_branch(),
        }
    }
}

/// What to run: a job kind together with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSpec {
    Test(TestRunParams),
    SecurityScan(ScanParams),
}

impl JobSpec {
    pub fn kind(&self) -> JobKind {
        match self {
            Self::Test(_) => JobKind::Test,
            Self::SecurityScan(_) => JobKind::SecurityScan,
        }
    }

    pub fn repository_url(&self) -> &str {
        match self {
            Self::Test(params) => &params.repository_url,
            Self::SecurityScan(params) => &params.repository_url,
        }
    }

    /// Check the parameters before anything is sent to the executor
    pub fn validate(&self) -> Result<(), SharedError> {
        crate::shared::validation::validate_present("repository_url", self.repository_url())?;
        if let Self::Test(params) = self {
            crate::shared::validation::validate_present("framework", &params.framework)?;
        }
        Ok(())
    }

    /// Build the executor request body for this spec
    pub fn into_request(self, job_id: &JobId, project_id: &str) -> JobRequest {
        match self {
            Self::Test(params) => JobRequest::Test(TestExecutionRequest {
                project_id: project_id.to_string(),
                test_run_id: job_id.id.clone(),
                framework: params.framework,
                repository_url: params.repository_url,
                branch: params.branch,
                test_command: params.test_command,
                environment_vars: params.environment_vars,
            }),
            Self::SecurityScan(params) => JobRequest::SecurityScan(SecurityScanRequest {
                project_id: project_id.to_string(),
                scan_id: job_id.id.clone(),
                scanner_type: params.scanner_type,
                repository_url: params.repository_url,
                branch: params.branch,
            }),
        }
    }
}

/// Executor body for `POST /api/v1/tests/execute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestExecutionRequest {
    pub project_id: String,
    pub test_run_id: String,
    pub framework: String,
    pub repository_url: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_command: Option<String>,
    #[serde(default)]
    pub environment_vars: HashMap<String, String>,
}

/// Executor body for `POST /api/v1/security/scan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScanRequest {
    pub project_id: String,
    pub scan_id: String,
    pub scanner_type: ScannerType,
    pub repository_url: String,
    pub branch: String,
}

/// A submission, as sent to the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Test(TestExecutionRequest),
    SecurityScan(SecurityScanRequest),
}

impl JobRequest {
    pub fn job_id(&self) -> JobId {
        match self {
            Self::Test(req) => JobId::new(JobKind::Test, req.test_run_id.clone()),
            Self::SecurityScan(req) => JobId::new(JobKind::SecurityScan, req.scan_id.clone()),
        }
    }
}

/// Executor reply to a submission
///
/// A rejected submission comes back either with a non-`queued` status and a
/// `message`, or as an error body carrying `detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SubmitResponse {
    /// Whether the executor queued the job
    pub fn is_accepted(&self) -> bool {
        self.status.as_deref() == Some(JobStatus::Queued.as_str())
    }

    /// The most specific error message the executor gave, if any
    pub fn error_message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.message.as_deref())
    }
}

/// Status payload: `{status, progress?}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_progress"
    )]
    pub progress: Option<u8>,
}

/// Read progress as any JSON number, rounded and clamped to `0..=100`
///
/// Anything that is not a finite number is treated as unknown.
fn lenient_progress<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .filter(|p| p.is_finite())
        .map(|p| p.round().clamp(0.0, 100.0) as u8))
}

impl StatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self { status, progress: None }
    }
}

/// Result payload: `{status, results, error?}`
///
/// `results` is kind-specific; see [`TestSummary`] and [`ScanSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResults {
    pub status: JobStatus,
    #[serde(default)]
    pub results: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResults {
    /// Interpret `results` as a test-run summary
    pub fn test_summary(&self) -> Option<TestSummary> {
        serde_json::from_value(self.results.clone()).ok()
    }

    /// Interpret `results` as a security scan summary
    pub fn scan_summary(&self) -> Option<ScanSummary> {
        serde_json::from_value(self.results.clone()).ok()
    }
}

/// Test-run metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub total_tests: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    /// Wall time in seconds
    #[serde(default)]
    pub duration: f64,
}

impl TestSummary {
    /// `passed + failed + skipped == total_tests`
    pub fn is_consistent(&self) -> bool {
        self.passed + self.failed + self.skipped == self.total_tests
    }
}

/// Security scan metrics, bucketed by severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scanner: String,
    pub total_vulnerabilities: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Gateway reply to an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAccepted {
    pub job_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_job_id_parse() {
        let id = JobId::parse(JobKind::Test, "test-1792334327063").unwrap();
        assert_eq!(id.id, "test-1792334327063");
        assert!(JobId::parse(JobKind::Test, "scan_A-9").is_ok());

        for bad in ["", "../../internal/secret", "a/b", "x?y=1", "a%2Fb", "a b", "ü"] {
            assert_eq!(
                JobId::parse(JobKind::SecurityScan, bad),
                Err(SharedError::validation("id", "Invalid job id")),
                "accepted {:?}",
                bad
            );
        }
        assert!(JobId::parse(JobKind::Test, &"a".repeat(MAX_JOB_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_status_progress_is_lenient() {
        let parse = |json: &str| serde_json::from_str::<StatusReport>(json).unwrap().progress;
        assert_eq!(parse(r#"{"status":"running","progress":40}"#), Some(40));
        assert_eq!(parse(r#"{"status":"running","progress":42.6}"#), Some(43));
        assert_eq!(parse(r#"{"status":"running","progress":250}"#), Some(100));
        assert_eq!(parse(r#"{"status":"running","progress":-3}"#), Some(0));
        assert_eq!(parse(r#"{"status":"running","progress":"half"}"#), None);
        assert_eq!(parse(r#"{"status":"running","progress":null}"#), None);
        assert_eq!(parse(r#"{"status":"running"}"#), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_report_parses_executor_payload() {
        let report: StatusReport = serde_json::from_str(
            r#"{"test_run_id":"test-1","status":"running","progress":50,"started_at":"2024-01-01T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(report.status, JobStatus::Running);
        assert_eq!(report.progress, Some(50));
    }

    #[test]
    fn test_spec_into_test_request() {
        let job_id = JobId::new(JobKind::Test, "test-42");
        let spec = JobSpec::Test(TestRunParams::new("https://x/y.git", "jest"));
        let request = spec.into_request(&job_id, "demo-project");

        let JobRequest::Test(body) = &request else {
            panic!("expected a test execution request");
        };
        assert_eq!(body.test_run_id, "test-42");
        assert_eq!(body.branch, "main");
        assert_eq!(request.job_id(), job_id);

        let json = serde_json::to_value(body).unwrap();
        assert!(json.get("test_command").is_none());
        assert_eq!(json["project_id"], "demo-project");
    }

    #[test]
    fn test_submit_response_prefers_detail() {
        let response: SubmitResponse =
            serde_json::from_str(r#"{"detail":"Unsupported scanner: zap"}"#).unwrap();
        assert!(!response.is_accepted());
        assert_eq!(response.error_message(), Some("Unsupported scanner: zap"));
    }

    #[test]
    fn test_results_test_summary() {
        let results: JobResults = serde_json::from_value(serde_json::json!({
            "status": "completed",
            "results": {"total_tests": 100, "passed": 95, "failed": 3, "skipped": 2, "duration": 45.2}
        }))
        .unwrap();
        let summary = results.test_summary().unwrap();
        assert!(summary.is_consistent());
        assert!(results.scan_summary().is_none());
    }

    #[test]
    fn test_scanner_type_parse() {
        assert_eq!("SAST".parse::<ScannerType>().unwrap(), ScannerType::Sast);
        assert!("zap".parse::<ScannerType>().is_err());
    }

    #[test]
    fn test_spec_validation() {
        let spec = JobSpec::Test(TestRunParams::new("", "jest"));
        assert!(spec.validate().is_err());
        let spec = JobSpec::SecurityScan(ScanParams::new("https://x/y.git", ScannerType::Dependency));
        assert!(spec.validate().is_ok());
    }
}

//! Textual tripwire against the export loop.
//!
//! The SDK's network instrumentation must not capture the exporter's own
//! requests to the collector. We only look for substrings in the init config:
//! the exclusion marker and both OTLP URLs written out literally. The file is
//! never parsed, so exclusions built from variables are reported as missing.

use std::path::Path;

use crate::types::CheckResult;

pub const GUARD_CHECK_NAME: &str = "SDK config excludes OTLP endpoints from network instrumentation";

/// Which of the three required substrings were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardFindings {
    pub has_marker: bool,
    pub has_traces: bool,
    pub has_logs: bool,
}

impl GuardFindings {
    pub fn scan(content: &str, marker: &str, traces_url: &str, logs_url: &str) -> Self {
        Self {
            has_marker: content.contains(marker),
            has_traces: content.contains(traces_url),
            has_logs: content.contains(logs_url),
        }
    }

    pub fn all_present(&self) -> bool {
        self.has_marker && self.has_traces && self.has_logs
    }

    fn describe(&self, marker: &str) -> String {
        format!(
            "Found {marker}: {}, traces URL present: {}, logs URL present: {}",
            self.has_marker, self.has_traces, self.has_logs
        )
    }
}

pub fn check_config_guard(path: &Path, traces_url: &str, logs_url: &str, marker: &str) -> CheckResult {
    // Raw bytes, decoded lossily: a stray non-UTF-8 byte must not hide the substrings.
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            return CheckResult::fail(
                GUARD_CHECK_NAME,
                format!("Could not read {}: {e}", path.display()),
                "Pass the correct path: --app-config path/to/embrace.ts",
            );
        }
    };

    let content = String::from_utf8_lossy(&bytes);
    let findings = GuardFindings::scan(&content, marker, traces_url, logs_url);
    if findings.all_present() {
        return CheckResult::pass(
            GUARD_CHECK_NAME,
            Some(format!("{marker} and both OTLP URLs found in {}", path.display())),
        );
    }

    CheckResult::fail(
        GUARD_CHECK_NAME,
        findings.describe(marker),
        format!(
            "In {} ensure:\ndefaultInstrumentationConfig: {{ network: {{ {marker}: [\"{traces_url}\", \"{logs_url}\"] }} }}",
            path.display()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRACES: &str = "http://localhost:4318/v1/traces";
    const LOGS: &str = "http://localhost:4318/v1/logs";

    fn artifact(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".ts").tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const GUARDED: &str = r#"
const OTLP_TRACES_URL = "http://localhost:4318/v1/traces";
const OTLP_LOGS_URL = "http://localhost:4318/v1/logs";

initSDK({
  defaultInstrumentationConfig: {
    network: { ignoreUrls: [OTLP_TRACES_URL, OTLP_LOGS_URL] },
  },
});
"#;

    #[test]
    fn test_guarded_config_passes() {
        let f = artifact(GUARDED);
        let r = check_config_guard(f.path(), TRACES, LOGS, "ignoreUrls");
        assert!(r.ok);
        assert!(r.fix.is_none());
        assert_eq!(r.name, GUARD_CHECK_NAME);
        assert_eq!(
            r.details,
            Some(format!("ignoreUrls and both OTLP URLs found in {}", f.path().display()))
        );
    }

    #[test]
    fn test_latin1_byte_still_scanned() {
        let mut f = tempfile::Builder::new().suffix(".ts").tempfile().unwrap();
        f.write_all(b"// caf\xe9 config\n").unwrap();
        f.write_all(GUARDED.as_bytes()).unwrap();
        let r = check_config_guard(f.path(), TRACES, LOGS, "ignoreUrls");
        assert!(r.ok, "{r:?}");
        assert!(r.fix.is_none());
    }

    #[test]
    fn test_latin1_byte_missing_url_reports_content_not_path() {
        let mut f = tempfile::Builder::new().suffix(".ts").tempfile().unwrap();
        f.write_all(b"// caf\xe9\nignoreUrls: [\"http://localhost:4318/v1/traces\"]").unwrap();
        let r = check_config_guard(f.path(), TRACES, LOGS, "ignoreUrls");
        assert!(!r.ok);
        assert!(r.details.unwrap().contains("logs URL present: false"));
        assert!(!r.fix.unwrap().contains("--app-config"));
    }

    #[test]
    fn test_missing_logs_url_named() {
        let f = artifact("ignoreUrls: [\"http://localhost:4318/v1/traces\"]");
        let r = check_config_guard(f.path(), TRACES, LOGS, "ignoreUrls");
        assert!(!r.ok);
        assert_eq!(
            r.details.as_deref(),
            Some("Found ignoreUrls: true, traces URL present: true, logs URL present: false")
        );
        let fix = r.fix.unwrap();
        assert!(fix.contains(LOGS));
        assert!(fix.contains(TRACES));
    }

    #[test]
    fn test_missing_marker_named() {
        let f = artifact("const urls = [\"http://localhost:4318/v1/traces\", \"http://localhost:4318/v1/logs\"];");
        let r = check_config_guard(f.path(), TRACES, LOGS, "ignoreUrls");
        assert!(!r.ok);
        assert!(r.details.unwrap().contains("Found ignoreUrls: false"));
    }

    #[test]
    fn test_variable_only_exclusion_is_false_negative() {
        let f = artifact("network: { ignoreUrls: [TRACES, LOGS] }");
        let r = check_config_guard(f.path(), TRACES, LOGS, "ignoreUrls");
        assert!(!r.ok);
        assert!(r.details.unwrap().contains("traces URL present: false"));
    }

    #[test]
    fn test_custom_marker() {
        let f = artifact("ignoreNetworkUrls http://localhost:4318/v1/traces http://localhost:4318/v1/logs");
        assert!(check_config_guard(f.path(), TRACES, LOGS, "ignoreNetworkUrls").ok);
        assert!(!check_config_guard(f.path(), TRACES, LOGS, "ignoreUrls").ok);
    }

    #[test]
    fn test_unreadable_file_reports_path_and_fix() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("embrace.ts");
        let r = check_config_guard(&missing, TRACES, LOGS, "ignoreUrls");
        assert!(!r.ok);
        assert!(r.details.unwrap().contains(&missing.display().to_string()));
        assert!(r.fix.unwrap().contains("--app-config"));
    }

    #[test]
    fn test_findings_scan() {
        let findings = GuardFindings::scan("ignoreUrls a", "ignoreUrls", "a", "b");
        assert_eq!(
            findings,
            GuardFindings {
                has_marker: true,
                has_traces: true,
                has_logs: false,
            }
        );
        assert!(!findings.all_present());
    }
}

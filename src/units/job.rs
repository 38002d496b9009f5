//! Job modes and service results as systemd names them on the bus

use std::fmt;

/// How the manager resolves a new job against queued jobs for the same unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobMode {
    /// Refuse if it conflicts with a pending job or an existing unit
    Fail,
    #[default]
    Replace,
    ReplaceIrreversibly,
    Isolate,
    Flush,
    IgnoreDependencies,
    IgnoreRequirements,
}

impl JobMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Replace => "replace",
            Self::ReplaceIrreversibly => "replace-irreversibly",
            Self::Isolate => "isolate",
            Self::Flush => "flush",
            Self::IgnoreDependencies => "ignore-dependencies",
            Self::IgnoreRequirements => "ignore-requirements",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fail" => Some(Self::Fail),
            "replace" => Some(Self::Replace),
            "replace-irreversibly" => Some(Self::ReplaceIrreversibly),
            "isolate" => Some(Self::Isolate),
            "flush" => Some(Self::Flush),
            "ignore-dependencies" => Some(Self::IgnoreDependencies),
            "ignore-requirements" => Some(Self::IgnoreRequirements),
            _ => None,
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the Service `Result` property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResult {
    Success,
    Protocol,
    Timeout,
    ExitCode,
    Signal,
    CoreDump,
    Watchdog,
    StartLimitHit,
    Resources,
    OomKill,
    /// Anything this build doesn't know about yet
    Other(String),
}

impl ServiceResult {
    pub fn parse(s: &str) -> Self {
        match s {
            "success" => Self::Success,
            "protocol" => Self::Protocol,
            "timeout" => Self::Timeout,
            "exit-code" => Self::ExitCode,
            "signal" => Self::Signal,
            "core-dump" => Self::CoreDump,
            "watchdog" => Self::Watchdog,
            "start-limit-hit" => Self::StartLimitHit,
            "resources" => Self::Resources,
            "oom-kill" => Self::OomKill,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Protocol => "protocol",
            Self::Timeout => "timeout",
            Self::ExitCode => "exit-code",
            Self::Signal => "signal",
            Self::CoreDump => "core-dump",
            Self::Watchdog => "watchdog",
            Self::StartLimitHit => "start-limit-hit",
            Self::Resources => "resources",
            Self::OomKill => "oom-kill",
            Self::Other(s) => s,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ServiceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_mode_strings() {
        assert_eq!(JobMode::Fail.as_str(), "fail");
        assert_eq!(JobMode::Replace.as_str(), "replace");
        assert_eq!(JobMode::ReplaceIrreversibly.to_string(), "replace-irreversibly");
    }

    #[test]
    fn test_job_mode_parse() {
        assert_eq!(JobMode::parse("fail"), Some(JobMode::Fail));
        assert_eq!(JobMode::parse("REPLACE"), Some(JobMode::Replace));
        assert_eq!(JobMode::parse("ignore-requirements"), Some(JobMode::IgnoreRequirements));
        assert_eq!(JobMode::parse("sometimes"), None);
        assert_eq!(JobMode::parse(""), None);
    }

    #[test]
    fn test_job_mode_default() {
        assert_eq!(JobMode::default(), JobMode::Replace);
    }

    #[test]
    fn test_service_result_parse() {
        assert_eq!(ServiceResult::parse("success"), ServiceResult::Success);
        assert_eq!(ServiceResult::parse("exit-code"), ServiceResult::ExitCode);
        assert_eq!(ServiceResult::parse("oom-kill"), ServiceResult::OomKill);
        assert!(ServiceResult::parse("success").is_success());
        assert!(!ServiceResult::parse("signal").is_success());
    }

    #[test]
    fn test_service_result_unknown_kept_verbatim() {
        let result = ServiceResult::parse("exec-condition");
        assert_eq!(result, ServiceResult::Other("exec-condition".into()));
        assert_eq!(result.to_string(), "exec-condition");
    }
}

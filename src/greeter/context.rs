use std::fmt::{Display, Formatter};
use std::process::Command;

/// Upper bound for the reported processor name, in bytes. This matches the
/// bound MPI implementations place on `MPI_Get_processor_name`.
pub const MAX_PROCESSOR_NAME: usize = 256;

/// Identity of one greeting thread. Built fresh by each thread from group and
/// region queries, formatted once and discarded.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub rank: u32,
    pub world_size: u32,
    pub thread: u32,
    pub num_threads: u32,
    pub processor_name: ProcessorName,
}

/// Host name of the executing machine, truncated to [MAX_PROCESSOR_NAME]
/// bytes. The length before truncation is kept so callers can tell whether
/// truncation happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorName {
    name: String,
    len: usize,
}

impl ProcessorName {
    /// Resolves the host name. Tries the HOSTNAME environment variable first,
    /// then the system `hostname` command. Falls back to "unknown" so that a
    /// greeting line can always be produced.
    pub fn resolve() -> Self {
        let raw = std::env::var("HOSTNAME")
            .ok()
            .filter(|name| !name.is_empty())
            .or_else(Self::from_hostname_command)
            .unwrap_or_else(|| String::from("unknown"));
        Self::from_raw(raw)
    }

    fn from_hostname_command() -> Option<String> {
        Command::new("hostname")
            .output()
            .ok()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .filter(|name| !name.is_empty())
    }

    fn from_raw(mut raw: String) -> Self {
        let len = raw.len();
        if raw.len() > MAX_PROCESSOR_NAME {
            let mut cut = MAX_PROCESSOR_NAME;
            while !raw.is_char_boundary(cut) {
                cut -= 1;
            }
            raw.truncate(cut);
        }
        ProcessorName { name: raw, len }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Byte length of the name as resolved, before truncation.
    pub fn reported_len(&self) -> usize {
        self.len
    }
}

impl Display for ProcessorName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_never_empty() {
        let name = ProcessorName::resolve();
        assert!(!name.as_str().is_empty());
        assert!(name.as_str().len() <= MAX_PROCESSOR_NAME);
    }

    #[test]
    fn short_names_pass_through() {
        let name = ProcessorName::from_raw("compute-0-1".to_string());
        assert_eq!(name.as_str(), "compute-0-1");
        assert_eq!(name.reported_len(), 11);
    }

    #[test]
    fn long_names_are_truncated_but_report_full_length() {
        let raw = "a".repeat(MAX_PROCESSOR_NAME + 42);
        let name = ProcessorName::from_raw(raw);
        assert_eq!(name.as_str().len(), MAX_PROCESSOR_NAME);
        assert_eq!(name.reported_len(), MAX_PROCESSOR_NAME + 42);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'ü' is two bytes; place one across the cut-off point.
        let mut raw = "a".repeat(MAX_PROCESSOR_NAME - 1);
        raw.push('ü');
        let name = ProcessorName::from_raw(raw);
        assert_eq!(name.as_str().len(), MAX_PROCESSOR_NAME - 1);
        assert!(name.as_str().chars().all(|c| c == 'a'));
    }
}

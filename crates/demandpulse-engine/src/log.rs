use std::sync::{Arc, PoisonError, RwLock};

/// Line prefix used when rendering the log for display.
const PROMPT: &str = ">>> ";

/// Append-only progress log shared between the run (writer) and the
/// view-refresh path (reader).
///
/// Cloning yields another handle to the same buffer. Writes happen only from
/// the run in progress; readers take a rendered snapshot.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Arc<RwLock<Vec<String>>>,
}

impl LogBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all lines. Called when a new run starts.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Appends one line.
    pub fn push(&self, line: impl Into<String>) {
        self.write().push(line.into());
    }

    /// Replaces the most recent line, collapsing rapid progress updates into
    /// one. Appends instead if the buffer is empty.
    pub fn replace_last(&self, line: impl Into<String>) {
        let mut lines = self.write();
        match lines.last_mut() {
            Some(last) => *last = line.into(),
            None => lines.push(line.into()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the raw lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.read().clone()
    }

    /// The log rendered for display, one prompt-prefixed line per entry.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.read()
            .iter()
            .map(|line| format!("{PROMPT}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<String>> {
        self.lines.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<String>> {
        self.lines.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let log = LogBuffer::new();
        assert!(log.is_empty());
        assert_eq!(log.snapshot(), "");
    }

    #[test]
    fn push_appends_in_order() {
        let log = LogBuffer::new();
        log.push("Performing Queries");
        log.push("Downloading posts for iPhone ...");
        assert_eq!(
            log.snapshot(),
            ">>> Performing Queries\n>>> Downloading posts for iPhone ..."
        );
    }

    #[test]
    fn replace_last_overwrites_only_the_last_line() {
        let log = LogBuffer::new();
        log.push("Downloading posts for iPhone ...");
        log.push("Downloaded 100");
        log.replace_last("Downloaded 200");
        assert_eq!(
            log.lines(),
            vec![
                "Downloading posts for iPhone ...".to_string(),
                "Downloaded 200".to_string()
            ]
        );
    }

    #[test]
    fn replace_last_on_empty_buffer_appends() {
        let log = LogBuffer::new();
        log.replace_last("Downloaded 100");
        assert_eq!(log.lines(), vec!["Downloaded 100".to_string()]);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let log = LogBuffer::new();
        log.push("old run");
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn clones_share_the_same_buffer() {
        let log = LogBuffer::new();
        let reader = log.clone();
        log.push("shared");
        assert_eq!(reader.lines(), vec!["shared".to_string()]);
    }
}

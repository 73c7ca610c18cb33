use crc32fast::Hasher;

use crate::Document;

/// Derive a short, stable seed from a session key (template id, user id, ...)
pub fn seed_for(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(b"mailcraft:");
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for rows, columns and blocks of one document.
///
/// IDs have the form `<seed>-<n>`. A generator resumed over an existing
/// document never hands out an id that document already uses.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(key: &str) -> Self {
        Self {
            seed: seed_for(key),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Create a generator for `key` whose counter is past every id in `doc`
    /// that was minted with the same seed.
    pub fn resume(key: &str, doc: &Document) -> Self {
        let mut generator = Self::new(key);
        generator.skip_past(doc);
        generator
    }

    /// Advance the counter past ids already present in `doc`.
    pub fn skip_past(&mut self, doc: &Document) {
        let prefix = format!("{}-", self.seed);
        let highest = doc
            .ids()
            .filter_map(|id| id.strip_prefix(&prefix))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        self.count = self.count.max(highest);
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, Row};

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(seed_for("welcome-email"), seed_for("welcome-email"));
        assert_ne!(seed_for("welcome-email"), seed_for("newsletter"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdGenerator::from_seed("abc".to_string());
        assert_eq!(ids.new_id(), "abc-1");
        assert_eq!(ids.new_id(), "abc-2");
        assert_eq!(ids.seed(), "abc");
    }

    #[test]
    fn test_resume_skips_existing_ids() {
        let mut first = IdGenerator::new("draft");
        let mut doc = Document::new();
        let columns = vec![Column::new(first.new_id(), 50.0), Column::new(first.new_id(), 50.0)];
        doc.rows.push(Row::columns(first.new_id(), columns));

        let mut resumed = IdGenerator::resume("draft", &doc);
        let next = resumed.new_id();
        assert!(doc.ids().all(|id| id != next));
        assert_eq!(next, format!("{}-4", seed_for("draft")));
    }

    #[test]
    fn test_resume_ignores_foreign_ids() {
        let mut doc = Document::new();
        doc.rows.push(Row::columns("imported-900".to_string(), vec![]));

        let mut resumed = IdGenerator::resume("draft", &doc);
        assert_eq!(resumed.new_id(), format!("{}-1", seed_for("draft")));
    }
}

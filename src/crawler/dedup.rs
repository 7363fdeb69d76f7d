use std::collections::HashSet;

use crate::models::StreamEntry;

/// Drop repeated stream URLs, keeping the first occurrence of each
pub fn dedupe(streams: Vec<StreamEntry>) -> Vec<StreamEntry> {
    let mut seen: HashSet<String> = HashSet::with_capacity(streams.len());
    streams
        .into_iter()
        .filter(|stream| seen.insert(stream.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let streams = vec![
            StreamEntry::new("A", "http://x.test/1"),
            StreamEntry::new("B", "http://x.test/2"),
            StreamEntry::new("A again", "http://x.test/1"),
            StreamEntry::new("C", "http://x.test/3"),
            StreamEntry::new("B again", "http://x.test/2"),
        ];

        assert_eq!(
            dedupe(streams),
            vec![
                StreamEntry::new("A", "http://x.test/1"),
                StreamEntry::new("B", "http://x.test/2"),
                StreamEntry::new("C", "http://x.test/3"),
            ]
        );
    }

    #[test]
    fn test_same_name_different_url_is_kept() {
        let streams = vec![
            StreamEntry::new("News", "http://x.test/1"),
            StreamEntry::new("News", "http://y.test/1"),
        ];
        assert_eq!(dedupe(streams).len(), 2);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let streams = vec![
            StreamEntry::new("A", "http://x.test/1"),
            StreamEntry::new("A", "http://x.test/1"),
        ];
        let once = dedupe(streams);
        assert_eq!(dedupe(once.clone()), once);
        assert!(dedupe(Vec::new()).is_empty());
    }
}

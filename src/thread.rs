//! Reply threading.
//!
//! Stage 2 of the comment pipeline. Takes the loader's records (already in
//! chronological order) and nests every reply under its parent.
//!
//! ## Linking Rules
//!
//! Records are visited oldest first. A record whose `in_reply_to` names a
//! record visited earlier becomes that record's reply; anything else becomes
//! a top-level comment. Every record is registered after placement, so
//! replies can themselves be replied to at any depth.
//!
//! A reference that cannot be resolved (the parent was skipped by the loader,
//! never existed, is the comment itself, or sorts later) demotes the comment
//! to top level rather than hiding it. Because links only ever point
//! backwards in time, the result cannot contain a cycle.

use crate::types::CommentRecord;
use serde::Serialize;
use serde::ser::SerializeMap;
use std::collections::HashMap;

/// Top-level comments of one post, oldest first, with replies nested.
///
/// Behaves as an ordered map from comment id to comment and serializes as a
/// JSON object whose key order is the chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentTree {
    top_level: Vec<CommentRecord>,
}

impl CommentTree {
    /// Number of top-level comments. See [`crate::aggregate::count_comments`]
    /// for the total including replies.
    pub fn len(&self) -> usize {
        self.top_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommentRecord> {
        self.top_level.iter()
    }

    /// Top-level comment by id.
    pub fn get(&self, id: &str) -> Option<&CommentRecord> {
        self.top_level.iter().find(|c| c.id.as_str() == id)
    }

    /// Comment by id at any depth.
    pub fn find(&self, id: &str) -> Option<&CommentRecord> {
        let mut stack: Vec<&CommentRecord> = self.top_level.iter().collect();
        while let Some(comment) = stack.pop() {
            if comment.id.as_str() == id {
                return Some(comment);
            }
            stack.extend(comment.replies.iter());
        }
        None
    }

    /// Top-level ids in order.
    pub fn ids(&self) -> Vec<&str> {
        self.top_level.iter().map(|c| c.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a CommentTree {
    type Item = &'a CommentRecord;
    type IntoIter = std::slice::Iter<'a, CommentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.top_level.iter()
    }
}

impl Serialize for CommentTree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.top_level.len()))?;
        for comment in &self.top_level {
            map.serialize_entry(comment.id.as_str(), comment)?;
        }
        map.end()
    }
}

/// Nest records into reply threads.
///
/// `records` must be in chronological order, as produced by
/// [`crate::load::load_comments`].
pub fn thread_comments(records: Vec<CommentRecord>) -> CommentTree {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        match record.in_reply_to.as_deref().and_then(|p| index.get(p)) {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
        // First registration wins if an id ever repeats.
        index.entry(record.id.as_str()).or_insert(i);
    }
    drop(index);

    // A child always sits after its parent, so walking backwards finds every
    // child fully assembled by the time its parent is reached.
    let mut slots: Vec<Option<CommentRecord>> = records.into_iter().map(Some).collect();
    for i in (0..slots.len()).rev() {
        if children[i].is_empty() {
            continue;
        }
        let replies: Vec<CommentRecord> = children[i]
            .iter()
            .filter_map(|&c| slots[c].take())
            .collect();
        if let Some(parent) = slots[i].as_mut() {
            parent.replies.extend(replies);
        }
    }

    let top_level = roots.into_iter().filter_map(|i| slots[i].take()).collect();
    CommentTree { top_level }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn empty_input_gives_empty_tree() {
        let tree = thread_comments(vec![]);
        assert!(tree.is_empty());
        assert_eq!(serde_json::to_string(&tree).unwrap(), "{}");
    }

    #[test]
    fn reply_nests_under_parent() {
        let tree = thread_comments(vec![
            record("20230101120000_aaa", "A", None),
            record("20230101130000_bbb", "B", Some("20230101120000_aaa")),
        ]);
        assert_eq!(tree.ids(), vec!["20230101120000_aaa"]);
        let a = tree.get("20230101120000_aaa").unwrap();
        assert_eq!(a.author, "A");
        assert_eq!(reply_authors(a), vec!["B"]);
    }

    #[test]
    fn deep_chain_is_preserved() {
        let tree = thread_comments(vec![
            record("20230101000000_a", "A", None),
            record("20230102000000_b", "B", Some("20230101000000_a")),
            record("20230103000000_c", "C", Some("20230102000000_b")),
            record("20230104000000_d", "D", Some("20230103000000_c")),
        ]);
        assert_eq!(tree.len(), 1);
        let a = tree.iter().next().unwrap();
        let b = &a.replies[0];
        let c = &b.replies[0];
        let d = &c.replies[0];
        assert_eq!(
            [
                a.author.as_str(),
                b.author.as_str(),
                c.author.as_str(),
                d.author.as_str()
            ],
            ["A", "B", "C", "D"]
        );
        assert!(d.replies.is_empty());
        assert_eq!(tree.find("20230104000000_d").unwrap().author, "D");
    }

    #[test]
    fn dangling_reference_goes_top_level() {
        let tree = thread_comments(vec![
            record("20230101000000_a", "A", None),
            record("20230102000000_b", "B", Some("20230101000000_gone")),
        ]);
        assert_eq!(tree.ids(), vec!["20230101000000_a", "20230102000000_b"]);
    }

    #[test]
    fn forward_reference_goes_top_level() {
        let tree = thread_comments(vec![
            record("20230101000000_a", "A", Some("20230102000000_b")),
            record("20230102000000_b", "B", Some("20230101000000_a")),
        ]);
        // A cannot reply to B (later); B replies to A.
        assert_eq!(tree.ids(), vec!["20230101000000_a"]);
        assert_eq!(reply_authors(tree.get("20230101000000_a").unwrap()), vec!["B"]);
    }

    #[test]
    fn self_reference_goes_top_level() {
        let tree = thread_comments(vec![record(
            "20230101000000_a",
            "A",
            Some("20230101000000_a"),
        )]);
        assert_eq!(tree.len(), 1);
        assert!(tree.get("20230101000000_a").unwrap().replies.is_empty());
    }

    #[test]
    fn replies_and_top_level_keep_arrival_order() {
        let tree = thread_comments(vec![
            record("20230101000000_a", "A", None),
            record("20230102000000_b", "B", None),
            record("20230103000000_c", "C", Some("20230101000000_a")),
            record("20230104000000_d", "D", Some("20230102000000_b")),
            record("20230105000000_e", "E", Some("20230101000000_a")),
            record("20230106000000_f", "F", None),
        ]);
        assert_eq!(
            tree.ids(),
            vec!["20230101000000_a", "20230102000000_b", "20230106000000_f"]
        );
        assert_eq!(reply_authors(tree.get("20230101000000_a").unwrap()), vec!["C", "E"]);
        assert_eq!(reply_authors(tree.get("20230102000000_b").unwrap()), vec!["D"]);
    }

    #[test]
    fn sibling_subthreads_stay_separate() {
        let tree = thread_comments(vec![
            record("20230101000000_a", "A", None),
            record("20230102000000_b", "B", Some("20230101000000_a")),
            record("20230103000000_c", "C", Some("20230101000000_a")),
            record("20230104000000_d", "D", Some("20230102000000_b")),
            record("20230105000000_e", "E", Some("20230103000000_c")),
        ]);
        let a = tree.get("20230101000000_a").unwrap();
        assert_eq!(reply_authors(a), vec!["B", "C"]);
        assert_eq!(reply_authors(&a.replies[0]), vec!["D"]);
        assert_eq!(reply_authors(&a.replies[1]), vec!["E"]);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let tree = thread_comments(vec![
            record("20230102000000_b", "B", None),
            record("20230103000000_a", "A", None),
        ]);
        let json = serde_json::to_string(&tree).unwrap();
        let b = json.find("20230102000000_b").unwrap();
        let a = json.find("20230103000000_a").unwrap();
        assert!(b < a);
    }

    #[test]
    fn threading_is_deterministic() {
        let build = || {
            thread_comments(vec![
                record("20230101000000_a", "A", None),
                record("20230102000000_b", "B", Some("20230101000000_a")),
                record("20230103000000_c", "C", Some("20230101000000_x")),
            ])
        };
        assert_eq!(build(), build());
    }
}

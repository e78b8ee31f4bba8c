//! Comment counts over a threaded tree.
//!
//! Stage 3 of the comment pipeline. Pure functions, no I/O.

use crate::thread::CommentTree;
use crate::types::CommentRecord;

/// Total number of comments: top-level plus every reply at every depth.
pub fn count_comments(tree: &CommentTree) -> usize {
    tree.iter().map(count_thread).sum()
}

/// Number of comments in one thread, the root included.
pub fn count_thread(root: &CommentRecord) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(comment) = stack.pop() {
        count += 1;
        stack.extend(comment.replies.iter());
    }
    count
}

/// Deepest nesting level. `0` for no comments, `1` when nobody replied.
pub fn max_depth(tree: &CommentTree) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&CommentRecord, usize)> = tree.iter().map(|c| (c, 1)).collect();
    while let Some((comment, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(comment.replies.iter().map(|r| (r, depth + 1)));
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::thread::thread_comments;

    #[test]
    fn empty_tree() {
        let tree = CommentTree::default();
        assert_eq!(count_comments(&tree), 0);
        assert_eq!(max_depth(&tree), 0);
    }

    #[test]
    fn flat_comments() {
        let tree = thread_comments(vec![
            record("20230101000000_a", "A", None),
            record("20230102000000_b", "B", None),
        ]);
        assert_eq!(count_comments(&tree), 2);
        assert_eq!(max_depth(&tree), 1);
    }

    #[test]
    fn counts_every_level() {
        let tree = thread_comments(vec![
            record("20230101000000_a", "A", None),
            record("20230102000000_b", "B", Some("20230101000000_a")),
            record("20230103000000_c", "C", Some("20230102000000_b")),
            record("20230104000000_d", "D", Some("20230103000000_c")),
            record("20230105000000_e", "E", Some("20230101000000_a")),
            record("20230106000000_f", "F", None),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(count_comments(&tree), 6);
        assert_eq!(max_depth(&tree), 4);
        assert_eq!(count_thread(tree.get("20230101000000_a").unwrap()), 5);
    }

    #[test]
    fn count_matches_input_regardless_of_placement() {
        let records = vec![
            record("20230101000000_a", "A", Some("20230101000000_missing")),
            record("20230102000000_b", "B", Some("20230101000000_a")),
            record("20230103000000_c", "C", Some("20230109000000_later")),
        ];
        let n = records.len();
        let tree = thread_comments(records);
        assert_eq!(count_comments(&tree), n);
    }
}

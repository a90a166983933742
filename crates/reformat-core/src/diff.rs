//! Line-level diff engine.
//!
//! Formatter backends always return the *entire* document text, even when only a sub-range was
//! requested. [`diff`] compares the original and the returned text line by line (Myers
//! shortest-edit-script over lines, with common prefix/suffix trimming) and classifies every
//! non-matching run as an insert, delete, or replace hunk. The patch applier replays those hunks
//! onto the live document so untouched text is never rewritten.
//!
//! Lines are compared *including* their terminators, so a change in line-ending style alone is a
//! real diff; this engine does not special-case it.

/// One classified unit of difference between two text versions.
///
/// Hunks are produced in ascending `target_line` order. Carried text always includes line
/// terminators, so its length is exactly the number of characters to remove or insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffHunk {
    /// Lines exist only in the candidate text.
    Insert {
        /// Candidate line before which the new lines are inserted.
        target_line: usize,
        /// The inserted lines.
        inserted: String,
    },
    /// A contiguous run of lines differs on both sides.
    Replace {
        /// Candidate line at which the replacement starts.
        target_line: usize,
        /// The replaced lines from the original text.
        removed: String,
        /// The replacement lines from the candidate text.
        inserted: String,
    },
    /// Lines exist only in the original text.
    Delete {
        /// Line index of the last retained line preceding the deleted run; the applier anchors
        /// one line further (`target_line + 1`) because the deleted line itself is being
        /// removed, not inserted before.
        target_line: usize,
        /// The deleted lines.
        removed: String,
    },
}

impl DiffHunk {
    /// The line this hunk anchors to.
    pub fn target_line(&self) -> usize {
        match self {
            DiffHunk::Insert { target_line, .. }
            | DiffHunk::Replace { target_line, .. }
            | DiffHunk::Delete { target_line, .. } => *target_line,
        }
    }
}

/// A single alignment step between the two line sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal,
    Delete,
    Insert,
}

/// Compute the ordered hunk list transforming `original` into `candidate`.
///
/// Identical texts yield an empty list; this is the primary idempotence guard, so no patch work
/// happens when nothing changed.
pub fn diff(original: &str, candidate: &str) -> Vec<DiffHunk> {
    if original == candidate {
        return Vec::new();
    }

    let a: Vec<&str> = original.split_inclusive('\n').collect();
    let b: Vec<&str> = candidate.split_inclusive('\n').collect();

    let mut prefix = 0;
    while prefix < a.len() && prefix < b.len() && a[prefix] == b[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < a.len() - prefix
        && suffix < b.len() - prefix
        && a[a.len() - 1 - suffix] == b[b.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let ops = myers_ops(&a[prefix..a.len() - suffix], &b[prefix..b.len() - suffix]);
    build_hunks(&a, &b, prefix, &ops)
}

/// Myers shortest-edit-script walk over two line slices.
///
/// Returns the full alignment as a sequence of [`Op`]s; each `Delete` consumes a line of `a`,
/// each `Insert` a line of `b`, each `Equal` one of both.
fn myers_ops(a: &[&str], b: &[&str]) -> Vec<Op> {
    let n = a.len();
    let m = b.len();
    if n == 0 {
        return vec![Op::Insert; m];
    }
    if m == 0 {
        return vec![Op::Delete; n];
    }

    let max = n + m;
    let offset = max as isize;
    let mut v = vec![0isize; 2 * max + 1];
    let mut trace: Vec<Vec<isize>> = Vec::new();
    let mut d_final = 0isize;

    'outer: for d in 0..=(max as isize) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let ki = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[ki - 1] < v[ki + 1]) {
                v[ki + 1]
            } else {
                v[ki - 1] + 1
            };
            let mut y = x - k;
            while (x as usize) < n && (y as usize) < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[ki] = x;
            if x as usize >= n && y as usize >= m {
                d_final = d;
                break 'outer;
            }
            k += 2;
        }
    }

    // Walk the trace back from (n, m) to (0, 0), emitting ops in reverse.
    let mut ops = Vec::with_capacity(n + m);
    let mut x = n as isize;
    let mut y = m as isize;
    for d in (1..=d_final).rev() {
        let v = &trace[d as usize];
        let k = x - y;
        let ki = (k + offset) as usize;
        let prev_k = if k == -d || (k != d && v[ki - 1] < v[ki + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + offset) as usize];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            ops.push(Op::Equal);
            x -= 1;
            y -= 1;
        }
        if prev_k == k + 1 {
            ops.push(Op::Insert);
            y -= 1;
        } else {
            ops.push(Op::Delete);
            x -= 1;
        }
    }
    while x > 0 && y > 0 {
        ops.push(Op::Equal);
        x -= 1;
        y -= 1;
    }
    debug_assert!(x == 0 && y == 0);

    ops.reverse();
    ops
}

/// Group the alignment into maximal non-matching runs and classify each as a hunk.
fn build_hunks(a: &[&str], b: &[&str], prefix: usize, ops: &[Op]) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    let mut i = prefix;
    let mut j = prefix;
    let mut removed = String::new();
    let mut inserted = String::new();
    let mut run_start = 0usize;

    let mut idx = 0;
    loop {
        let op = ops.get(idx).copied();
        match op {
            Some(Op::Delete) => {
                if removed.is_empty() && inserted.is_empty() {
                    run_start = j;
                }
                removed.push_str(a[i]);
                i += 1;
                idx += 1;
            }
            Some(Op::Insert) => {
                if removed.is_empty() && inserted.is_empty() {
                    run_start = j;
                }
                inserted.push_str(b[j]);
                j += 1;
                idx += 1;
            }
            Some(Op::Equal) | None => {
                if !removed.is_empty() || !inserted.is_empty() {
                    let retained = (i < a.len() && j < b.len()).then(|| a[i]);
                    let consumed_retained = flush_run(
                        &mut hunks,
                        std::mem::take(&mut removed),
                        std::mem::take(&mut inserted),
                        run_start,
                        retained,
                    );
                    if consumed_retained {
                        i += 1;
                        j += 1;
                        if op == Some(Op::Equal) {
                            // The widened replacement already swallowed this retained line.
                            idx += 1;
                            continue;
                        }
                    }
                }
                match op {
                    Some(Op::Equal) => {
                        i += 1;
                        j += 1;
                        idx += 1;
                    }
                    None => break,
                    Some(_) => unreachable!(),
                }
            }
        }
    }

    hunks
}

/// Emit one hunk for a finished run. `retained` is the next retained line (identical on both
/// sides), if any. Returns `true` if the hunk consumed that retained line; only a widened
/// top-of-document deletion does.
fn flush_run(
    hunks: &mut Vec<DiffHunk>,
    removed: String,
    inserted: String,
    run_start: usize,
    retained: Option<&str>,
) -> bool {
    if inserted.is_empty() {
        if run_start == 0 {
            // A deletion at the very top of the document has no preceding retained line to
            // anchor to (the anchor would be line -1). Widen it into a replacement spanning the
            // next retained line; with an empty candidate the replacement inserts nothing.
            if let Some(line) = retained {
                let mut widened = removed;
                widened.push_str(line);
                hunks.push(DiffHunk::Replace {
                    target_line: 0,
                    removed: widened,
                    inserted: line.to_string(),
                });
                return true;
            }
            hunks.push(DiffHunk::Replace {
                target_line: 0,
                removed,
                inserted: String::new(),
            });
        } else {
            hunks.push(DiffHunk::Delete {
                target_line: run_start - 1,
                removed,
            });
        }
    } else if removed.is_empty() {
        hunks.push(DiffHunk::Insert {
            target_line: run_start,
            inserted,
        });
    } else {
        hunks.push(DiffHunk::Replace {
            target_line: run_start,
            removed,
            inserted,
        });
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_yield_no_hunks() {
        assert_eq!(diff("a\nb\nc\n", "a\nb\nc\n"), vec![]);
        assert_eq!(diff("", ""), vec![]);
    }

    #[test]
    fn test_insert_in_middle() {
        let hunks = diff("a\nc\n", "a\nb\nc\n");
        assert_eq!(
            hunks,
            vec![DiffHunk::Insert {
                target_line: 1,
                inserted: "b\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_insert_at_end() {
        let hunks = diff("a\n", "a\nb\n");
        assert_eq!(
            hunks,
            vec![DiffHunk::Insert {
                target_line: 1,
                inserted: "b\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_delete_in_middle_anchors_one_line_back() {
        let hunks = diff("a\nx\nb\n", "a\nb\n");
        assert_eq!(
            hunks,
            vec![DiffHunk::Delete {
                target_line: 0,
                removed: "x\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_delete_at_top_widens_to_replace() {
        let hunks = diff("x\na\nb\n", "a\nb\n");
        assert_eq!(
            hunks,
            vec![DiffHunk::Replace {
                target_line: 0,
                removed: "x\na\n".to_string(),
                inserted: "a\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_delete_everything() {
        let hunks = diff("a\nb\n", "");
        assert_eq!(
            hunks,
            vec![DiffHunk::Replace {
                target_line: 0,
                removed: "a\nb\n".to_string(),
                inserted: String::new(),
            }]
        );
    }

    #[test]
    fn test_replace_run() {
        let hunks = diff("a\nx\ny\nd\n", "a\nb\nc\nd\n");
        assert_eq!(
            hunks,
            vec![DiffHunk::Replace {
                target_line: 1,
                removed: "x\ny\n".to_string(),
                inserted: "b\nc\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_multiple_hunks_ascend_by_target_line() {
        let hunks = diff("a\nx\nb\nc\nz\n", "a\nb\nc\nw\nz\n");
        assert_eq!(
            hunks,
            vec![
                DiffHunk::Delete {
                    target_line: 0,
                    removed: "x\n".to_string(),
                },
                DiffHunk::Insert {
                    target_line: 3,
                    inserted: "w\n".to_string(),
                },
            ]
        );
        for pair in hunks.windows(2) {
            assert!(pair[0].target_line() < pair[1].target_line());
        }
    }

    #[test]
    fn test_missing_trailing_newline_is_a_real_change() {
        let hunks = diff("a\nb", "a\nb\n");
        assert_eq!(
            hunks,
            vec![DiffHunk::Replace {
                target_line: 1,
                removed: "b".to_string(),
                inserted: "b\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_line_ending_style_change_is_a_real_diff() {
        // Carried-over limitation: a CRLF-vs-LF-only change diffs as a replacement.
        let hunks = diff("a\r\nb\n", "a\nb\n");
        assert_eq!(
            hunks,
            vec![DiffHunk::Replace {
                target_line: 0,
                removed: "a\r\n".to_string(),
                inserted: "a\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_whole_document_rewrite() {
        let hunks = diff(
            "package foo;public enum Bar {A,B,C}",
            "package foo;\n\npublic enum Bar {\n  A,\n  B,\n  C\n}\n",
        );
        assert_eq!(
            hunks,
            vec![DiffHunk::Replace {
                target_line: 0,
                removed: "package foo;public enum Bar {A,B,C}".to_string(),
                inserted: "package foo;\n\npublic enum Bar {\n  A,\n  B,\n  C\n}\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_interleaved_edits_reconstruct_candidate() {
        // Replaying hunks onto a live document must reproduce the candidate exactly.
        let original = "fn main() {\nlet x=1;\nlet y=2;\nprintln!(\"{}\", x+y);\n}\n";
        let candidate =
            "fn main() {\n    let x = 1;\n    let y = 2;\n    println!(\"{}\", x + y);\n}\n";
        let hunks = diff(original, candidate);
        assert!(!hunks.is_empty());

        let mut doc = crate::document::Document::from_text(original);
        assert!(crate::patch::apply_hunks(&mut doc, &hunks));
        assert_eq!(doc.text(), candidate);
    }
}

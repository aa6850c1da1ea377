mod scanner;

use scanner::{
    State, close_quote, is_block_comment_end, is_block_comment_start, is_line_comment_start,
    skip_digits,
};

/// Count the positional `?` slots a driver will see in `sql`.
///
/// Quoted literals, quoted identifiers and comments (nested block comments included) are skipped,
/// so `'?'` or `-- ?` do not count. A numbered slot such as
/// `?3` counts once.
///
/// ```rust
/// use sql_chain::count_placeholders;
///
/// assert_eq!(count_placeholders("SELECT * FROM t WHERE a = ? AND b = '?'"), 1);
/// ```
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut count = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::BacktickQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'?' => {
                    count += 1;
                    idx = skip_digits(bytes, idx + 1) - 1;
                }
                _ => {}
            },
            State::SingleQuoted | State::DoubleQuoted | State::BacktickQuoted => {
                let delimiter = match state {
                    State::SingleQuoted => b'\'',
                    State::DoubleQuoted => b'"',
                    _ => b'`',
                };
                let (closed, next) = close_quote(bytes, idx, delimiter);
                if closed {
                    state = State::Normal;
                }
                idx = next;
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    count
}

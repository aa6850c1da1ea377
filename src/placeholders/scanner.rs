#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    BacktickQuoted,
    LineComment,
    BlockComment(u32),
}

pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// Index just past a run of ASCII digits starting at `start` (returns `start` when there are none).
pub(super) fn skip_digits(bytes: &[u8], start: usize) -> usize {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    idx
}

/// Closing delimiter handling shared by the three quoting styles: a doubled delimiter is an
/// escaped literal and keeps the scanner inside the quote.
pub(super) fn close_quote(bytes: &[u8], idx: usize, delimiter: u8) -> (bool, usize) {
    if bytes[idx] != delimiter {
        return (false, idx);
    }
    if bytes.get(idx + 1) == Some(&delimiter) {
        (false, idx + 1)
    } else {
        (true, idx)
    }
}

/// Format field names as a parenthesized list: `["name", "price"]` becomes `(name, price)`.
///
/// An empty list formats as `()`.
#[must_use]
pub fn format_fields<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::with_capacity(2 + fields.len() * 8);
    out.push('(');
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(field.as_ref());
    }
    out.push(')');
    out
}

/// `count` positional slots in the same layout as [`format_fields`]: `(?, ?, ?)`.
#[must_use]
pub fn placeholder_list(count: usize) -> String {
    format_fields(&vec!["?"; count])
}

use alloc::string::String;

/// Turn single-byte text read from disk into a string we can display. Reading stops at the first NUL; bytes
/// outside of ASCII are mapped to the Latin-1 character with the same value, for [`filter_string`] to deal with.
pub fn ascii_to_display(data: &[u8]) -> String {
    data.iter().take_while(|&&byte| byte != 0).map(|&byte| char::from(byte)).collect()
}

/// Make a string safe to show in the picker: anything that isn't printable ASCII is replaced with `_`. If
/// `single_line` is set, the string is cut short at the first line break.
pub fn filter_string(s: &mut String, single_line: bool) {
    let mut filtered = String::with_capacity(s.len());

    for c in s.chars() {
        if single_line && (c == '\r' || c == '\n') {
            break;
        }

        filtered.push(if !c.is_ascii() || c.is_ascii_control() { '_' } else { c });
    }

    *s = filtered;
}

//! Text for counts and sizes in command output and logs.

/// Number with `,` between groups of three digits.
///
/// ```
/// use hostscrub::format::grouped;
/// assert_eq!(grouped(950), "950");
/// assert_eq!(grouped(84_213), "84,213");
/// ```
pub fn grouped(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Count followed by the matching noun: `1 line`, `2,048 lines`
pub fn counted(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", grouped(n), if n == 1 { singular } else { plural })
}

/// Size of a downloaded body, in bytes below 1 KiB and KiB/MiB above.
///
/// Lists are capped well below a GiB, so larger units are not needed.
pub fn body_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = KIB * 1024;
    match bytes {
        b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => counted(b, "byte", "bytes"),
    }
}

/// Clip `text` to `width` characters for a table column, marking the cut with `…`
pub fn clip(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        None => text.to_string(),
        Some(_) if width == 0 => String::new(),
        Some(_) => {
            let kept: String = text.chars().take(width - 1).collect();
            format!("{}…", kept)
        }
    }
}

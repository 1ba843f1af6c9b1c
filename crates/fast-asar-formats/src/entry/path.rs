//! Archive path normalization

/// Split `path` into normalized segments
///
/// Both `/` and `\` separate segments. Empty and `.` segments are dropped and
/// `..` removes the previous segment; `..` at the root stays at the root. An
/// empty result refers to the root directory.
pub fn normalize_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}

/// Join segments with `/`
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i != 0 {
            out.push('/');
        }
        out.push_str(segment.as_ref());
    }
    out
}

/// Whether `name` can be used as a single filesystem path component
pub fn is_safe_segment(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\', '\0'])
}

//! Splitting captured output into list elements

/// Split raw output into lines.
///
/// The trailing line terminator is dropped, `\r\n` is accepted, and empty
/// lines are skipped since an empty path would name the root itself.
pub(crate) fn split_lines(output: &[u8]) -> Vec<Vec<u8>> {
    output
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(<[u8]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"", &[])]
    #[case(b"\n", &[])]
    #[case(b"a", &["a"])]
    #[case(b"a\nb\n", &["a", "b"])]
    #[case(b"a\r\nb\r\n", &["a", "b"])]
    #[case(b"a\n\nb", &["a", "b"])]
    fn test_split_lines(#[case] output: &[u8], #[case] expected: &[&str]) {
        let expected: Vec<Vec<u8>> = expected.iter().map(|s| s.as_bytes().to_vec()).collect();
        assert_eq!(split_lines(output), expected);
    }
}

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Ask a yes/no question. Anything but `y`/`yes` (case-insensitive) is a no, EOF included.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Interpret a user-supplied script path: absolute paths are kept, relative ones are
/// taken relative to the catalog root.
pub fn under_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn confirm_accepts_yes_variants_only() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("", false)] {
            let mut out = Vec::new();
            let got = confirm("Run 3 scripts?", &mut Cursor::new(answer), &mut out).unwrap();
            assert_eq!(got, expected, "answer {answer:?}");
            assert!(String::from_utf8(out).unwrap().starts_with("Run 3 scripts? [y/N] "));
        }
    }

    #[test]
    fn relative_paths_resolve_under_root() {
        let root = Path::new("/srv/scripts/ubuntu");
        assert_eq!(under_root(root, Path::new("a/chk1.sh")), root.join("a/chk1.sh"));
        assert_eq!(under_root(root, Path::new("/tmp/x.sh")), PathBuf::from("/tmp/x.sh"));
    }
}

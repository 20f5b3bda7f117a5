//! Minimal text-VDF scanning for Steam library metadata.
//!
//! `libraryfolders.vdf` and `appmanifest_*.acf` are Valve's text KeyValues
//! format. The values sunray needs all sit on `"key" "value"` lines, so a
//! line scanner is enough; nesting is irrelevant for these files.

/// Parses one `"key"  "value"` line. Returns `None` for anything else
/// (braces, comments, bare keys).
pub fn parse_kv_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim().strip_prefix('"')?;
    let (key, rest) = rest.split_once('"')?;
    let rest = rest.trim_start().strip_prefix('"')?;
    let (value, _) = rest.split_once('"')?;
    Some((key, value))
}

/// Returns every `"path"` value from a `libraryfolders.vdf` document.
pub fn library_paths(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(parse_kv_line)
        .filter(|(key, _)| *key == "path")
        .map(|(_, value)| value.to_string())
        .collect()
}

/// Returns the first value for `field` in an appmanifest document.
pub fn manifest_field(content: &str, field: &str) -> Option<String> {
    content
        .lines()
        .filter_map(parse_kv_line)
        .find(|(key, _)| *key == field)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARYFOLDERS: &str = r#"
"libraryfolders"
{
	"0"
	{
		"path"		"/home/user/.steam/steam"
		"label"		""
		"contentid"		"1234"
	}
	"1"
	{
		"path"		"/mnt/games/SteamLibrary"
	}
}
"#;

    const APPMANIFEST: &str = r#"
"AppState"
{
	"appid"		"504230"
	"universe"		"1"
	"name"		"Celeste"
	"StateFlags"		"4"
	"installdir"		"Celeste"
}
"#;

    #[test]
    fn parse_kv_line_basic() {
        assert_eq!(
            parse_kv_line("\t\"appid\"\t\t\"504230\""),
            Some(("appid", "504230"))
        );
    }

    #[test]
    fn parse_kv_line_rejects_non_pairs() {
        assert_eq!(parse_kv_line("{"), None);
        assert_eq!(parse_kv_line("\"AppState\""), None);
        assert_eq!(parse_kv_line(""), None);
    }

    #[test]
    fn library_paths_extracted() {
        let paths = library_paths(LIBRARYFOLDERS);
        assert_eq!(
            paths,
            vec!["/home/user/.steam/steam", "/mnt/games/SteamLibrary"]
        );
    }

    #[test]
    fn library_paths_empty_document() {
        assert!(library_paths("\"libraryfolders\"\n{\n}\n").is_empty());
    }

    #[test]
    fn manifest_fields_extracted() {
        assert_eq!(
            manifest_field(APPMANIFEST, "appid").as_deref(),
            Some("504230")
        );
        assert_eq!(
            manifest_field(APPMANIFEST, "name").as_deref(),
            Some("Celeste")
        );
        assert_eq!(manifest_field(APPMANIFEST, "missing"), None);
    }
}

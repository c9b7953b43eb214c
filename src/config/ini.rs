//! Line/section-oriented reader for pacman-style INI files.
//!
//! Handles:
//! - `#` and `;` comment lines
//! - `[section]` headers
//! - `key = value` entries and bare `key` flags (e.g. `CheckSpace`)
//! - Duplicate keys (`Include`, `Server`) kept in file order
//!
//! Malformed lines are skipped with a warning; parsing never fails.

/// One `key = value` (or bare `key`) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniEntry {
    pub key: String,
    pub value: String,
}

/// A named section and its entries, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<IniEntry>,
}

impl IniSection {
    /// All values for `key`, compared case-insensitively.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value.as_str())
    }

    /// Last value for `key`, matching pacman's "later line wins" rule for scalars.
    pub fn last_value(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value.as_str())
    }
}

/// Parsed file: sections in the order they first appear.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    /// Entries that appear before any section header
    pub preamble: Vec<IniEntry>,
    pub sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Parse INI content. A repeated section header appends to the earlier section.
pub fn parse_ini(content: &str) -> IniDocument {
    let mut doc = IniDocument::default();
    let mut current: Option<usize> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                log::warn!("[Config] Skipping unterminated section header on line {}: {}", idx + 1, line);
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                log::warn!("[Config] Skipping empty section header on line {}", idx + 1);
                continue;
            }

            current = match doc.sections.iter().position(|s| s.name == name) {
                Some(pos) => Some(pos),
                None => {
                    doc.sections.push(IniSection {
                        name: name.to_string(),
                        entries: Vec::new(),
                    });
                    Some(doc.sections.len() - 1)
                }
            };
            continue;
        }

        let Some(entry) = parse_entry(line) else {
            log::warn!("[Config] Skipping line {} with empty key: {}", idx + 1, line);
            continue;
        };

        match current {
            Some(pos) => doc.sections[pos].entries.push(entry),
            None => doc.preamble.push(entry),
        }
    }

    doc
}

fn parse_entry(line: &str) -> Option<IniEntry> {
    let (key, value) = match line.split_once('=') {
        Some((k, v)) => (k.trim(), v.trim()),
        None => (line, ""),
    };

    if key.is_empty() {
        return None;
    }

    Some(IniEntry {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# global comment
[options]
HoldPkg     = pacman glibc
Architecture = auto
CheckSpace
; another comment style

[core]
Include = /etc/pacman.d/mirrorlist

[extra]
Server = https://example.org/$repo/os/$arch
Include = /etc/pacman.d/mirrorlist
Include = /etc/pacman.d/extra-mirrorlist
"#;

    #[test]
    fn test_sections_in_file_order() {
        let doc = parse_ini(SAMPLE);
        let names: Vec<&str> = doc.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["options", "core", "extra"]);
    }

    #[test]
    fn test_bare_key_has_empty_value() {
        let doc = parse_ini(SAMPLE);
        let options = doc.section("options").unwrap();
        assert_eq!(options.last_value("CheckSpace"), Some(""));
    }

    #[test]
    fn test_keys_match_case_insensitively() {
        let doc = parse_ini(SAMPLE);
        let options = doc.section("options").unwrap();
        assert_eq!(options.last_value("architecture"), Some("auto"));
        assert_eq!(options.last_value("HOLDPKG"), Some("pacman glibc"));
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let doc = parse_ini(SAMPLE);
        let extra = doc.section("extra").unwrap();
        let includes: Vec<&str> = extra.values("include").collect();
        assert_eq!(
            includes,
            vec!["/etc/pacman.d/mirrorlist", "/etc/pacman.d/extra-mirrorlist"]
        );
    }

    #[test]
    fn test_value_keeps_inner_equals_sign() {
        let doc = parse_ini("[repo]\nServer = https://host/?a=b\n");
        assert_eq!(
            doc.section("repo").unwrap().last_value("server"),
            Some("https://host/?a=b")
        );
    }

    #[test]
    fn test_entries_before_first_section_go_to_preamble() {
        let doc = parse_ini("Server = https://a/$repo\n[core]\n");
        assert_eq!(doc.preamble.len(), 1);
        assert!(doc.section("core").unwrap().entries.is_empty());
    }

    #[test]
    fn test_repeated_section_merges() {
        let doc = parse_ini("[core]\nServer = a\n[extra]\n[core]\nServer = b\n");
        assert_eq!(doc.sections.len(), 2);
        let servers: Vec<&str> = doc.section("core").unwrap().values("server").collect();
        assert_eq!(servers, vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let doc = parse_ini("[broken\n= value\n[ok]\nkey = v\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.section("ok").unwrap().last_value("key"), Some("v"));
        assert!(doc.preamble.is_empty());
    }
}

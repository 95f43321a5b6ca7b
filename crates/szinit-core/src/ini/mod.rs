//! Minimal INI document for `G2Module.ini` / `G2Project.ini`.
//!
//! Section and key order are kept; key case is preserved. Comments and blank
//! lines are dropped on parse. Output is `[section]`, `key = value` lines, then a
//! blank line, which is what the engine's own tooling writes.

mod patch;

pub use patch::{patch_module_ini, patch_project_ini, MODULE_INI, PROJECT_INI};

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IniError {
    #[error("line {line}: key/value outside of any section")]
    MissingSectionHeader { line: usize },
    #[error("line {line}: expected 'key = value', got '{text}'")]
    Malformed { line: usize, text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut doc = IniDocument::default();
        let mut current: Option<usize> = None;
        // (section, entry) that an indented continuation line extends.
        let mut last_entry: Option<(usize, usize)> = None;

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            if raw.starts_with(char::is_whitespace) {
                if let Some((s, e)) = last_entry {
                    let value = &mut doc.sections[s].entries[e].1;
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(trimmed);
                    continue;
                }
            }

            if let Some(name) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                current = Some(doc.section_index_or_insert(name.trim()));
                last_entry = None;
                continue;
            }

            let Some(section) = current else {
                return Err(IniError::MissingSectionHeader { line: line_no });
            };
            let Some(split_at) = trimmed.find(['=', ':']) else {
                return Err(IniError::Malformed {
                    line: line_no,
                    text: trimmed.to_string(),
                });
            };
            let key = trimmed[..split_at].trim();
            let value = trimmed[split_at + 1..].trim();
            if key.is_empty() {
                return Err(IniError::Malformed {
                    line: line_no,
                    text: trimmed.to_string(),
                });
            }
            let entry = doc.sections[section].upsert(key, value);
            last_entry = Some((section, entry));
        }
        Ok(doc)
    }

    /// Reads `path`; a missing file is an empty document.
    pub fn read(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
        };
        Self::parse(&text).with_context(|| format!("parse {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string()).with_context(|| format!("write {}", path.display()))
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.section_index(name) {
            Some(i) => i,
            None => {
                self.sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        }
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.section_index(section).is_some()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let s = &self.sections[self.section_index(section)?];
        s.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `section.key`, creating the section if needed. Returns true when the value changed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> bool {
        if self.get(section, key) == Some(value) {
            return false;
        }
        let i = self.section_index_or_insert(section);
        self.sections[i].upsert(key, value);
        true
    }

    /// Removes `section.key`. Returns true when something was removed.
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let Some(i) = self.section_index(section) else {
            return false;
        };
        let before = self.sections[i].entries.len();
        self.sections[i].entries.retain(|(k, _)| k != key);
        self.sections[i].entries.len() != before
    }

    /// Replaces a whole section's entries, keeping its position if it exists.
    pub fn set_section<I>(&mut self, section: &str, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let i = self.section_index_or_insert(section);
        self.sections[i].entries.clear();
        for (k, v) in entries {
            self.sections[i].upsert(&k, &v);
        }
    }
}

impl Section {
    fn upsert(&mut self, key: &str, value: &str) -> usize {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(i) => {
                self.entries[i].1 = value.to_string();
                i
            }
            None => {
                self.entries.push((key.to_string(), value.to_string()));
                self.entries.len() - 1
            }
        }
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{} = {}", key, value.replace('\n', "\n\t"))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
; generated
[PIPELINE]
SUPPORTPATH=/opt/senzing/g2/data
CONFIGPATH = /opt/senzing/g2/data

# sql
[SQL]
CONNECTION: sqlite3://na:na@/opt/senzing/g2/sqldb/G2C.db
G2CONFIGFILE = /opt/senzing/g2/data/g2config.json
";

    #[test]
    fn parse_keeps_order_and_case() {
        let doc = IniDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.get("PIPELINE", "SUPPORTPATH"), Some("/opt/senzing/g2/data"));
        assert_eq!(
            doc.get("SQL", "CONNECTION"),
            Some("sqlite3://na:na@/opt/senzing/g2/sqldb/G2C.db")
        );
        assert_eq!(doc.get("SQL", "connection"), None);
        assert_eq!(
            doc.to_string(),
            "[PIPELINE]\nSUPPORTPATH = /opt/senzing/g2/data\nCONFIGPATH = /opt/senzing/g2/data\n\n\
             [SQL]\nCONNECTION = sqlite3://na:na@/opt/senzing/g2/sqldb/G2C.db\n\
             G2CONFIGFILE = /opt/senzing/g2/data/g2config.json\n\n"
        );
    }

    #[test]
    fn value_keeps_url_colons() {
        let doc = IniDocument::parse("[g2]\nG2Connection = mysql://u:p@h:3306/?schema=G2\n").unwrap();
        assert_eq!(doc.get("g2", "G2Connection"), Some("mysql://u:p@h:3306/?schema=G2"));
    }

    #[test]
    fn set_remove_and_sections() {
        let mut doc = IniDocument::parse(SAMPLE).unwrap();
        assert!(!doc.set("PIPELINE", "CONFIGPATH", "/opt/senzing/g2/data"));
        assert!(doc.set("PIPELINE", "CONFIGPATH", "/etc/opt/senzing"));
        assert!(doc.remove("SQL", "G2CONFIGFILE"));
        assert!(!doc.remove("SQL", "G2CONFIGFILE"));
        assert!(!doc.remove("NOPE", "X"));

        doc.set_section(
            "PIPELINE",
            vec![("RESOURCEPATH".to_string(), "/r".to_string())],
        );
        assert_eq!(doc.get("PIPELINE", "CONFIGPATH"), None);
        assert_eq!(doc.get("PIPELINE", "RESOURCEPATH"), Some("/r"));
        assert!(doc.to_string().starts_with("[PIPELINE]\nRESOURCEPATH = /r\n"));

        assert!(doc.set("NEW", "K", "v"));
        assert!(doc.has_section("NEW"));
    }

    #[test]
    fn continuation_lines_join_values() {
        let doc = IniDocument::parse("[a]\nk = one\n  two\n").unwrap();
        assert_eq!(doc.get("a", "k"), Some("one\ntwo"));
        assert_eq!(doc.to_string(), "[a]\nk = one\n\ttwo\n\n");
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(
            IniDocument::parse("k = v\n"),
            Err(IniError::MissingSectionHeader { line: 1 })
        );
        assert!(matches!(
            IniDocument::parse("[a]\njust text\n"),
            Err(IniError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn read_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = IniDocument::read(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(doc, IniDocument::default());
    }
}

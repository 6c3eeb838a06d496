//! Allow-lists read from CSV data tables.
//!
//! One column of the table names the sprite(s) a record uses, either a single
//! name or a comma-separated list inside a quoted field. Every listed name is
//! unioned into the resulting set.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TileError};

use super::AllowSet;

/// Where a family's allow-list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowListSource {
    pub path: PathBuf,
    pub column: String,
}

/// Read the allow-list at `source`, failing when the file is missing.
pub fn read_allow_list(source: &AllowListSource) -> Result<AllowSet> {
    if !source.path.exists() {
        return Err(TileError::Config {
            message: format!("Allow-list not found: {}", source.path.display()),
            help: Some(
                "Create the data table, or pass --no-allow-list to pack every sprite".to_string(),
            ),
        });
    }

    let content = fs::read_to_string(&source.path).map_err(|e| TileError::Io {
        path: source.path.clone(),
        message: format!("Failed to read allow-list: {}", e),
    })?;

    parse_allow_list(&content, &source.column).map_err(|e| match e {
        TileError::Parse { message, help } => TileError::Parse {
            message: format!("{}: {}", source.path.display(), message),
            help,
        },
        other => other,
    })
}

/// Parse CSV text and collect the names in `column`.
pub fn parse_allow_list(content: &str, column: &str) -> Result<AllowSet> {
    let mut records = parse_records(content).into_iter();

    let header = records.next().ok_or_else(|| TileError::Parse {
        message: "allow-list is empty (expected a header row)".to_string(),
        help: None,
    })?;

    let index = header
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| TileError::Parse {
            message: format!("column '{}' not found in header", column),
            help: Some(format!("Header columns: {}", header.join(", "))),
        })?;

    let mut set = AllowSet::new();
    for record in records {
        let Some(field) = record.get(index) else {
            continue;
        };
        for name in field.split(',') {
            let name = name.trim();
            if !name.is_empty() {
                set.insert(name);
            }
        }
    }

    Ok(set)
}

/// Split CSV text into records of fields.
///
/// Handles quoted fields with embedded commas, newlines and `""` escapes.
/// A quote anywhere but the start of a field is literal.
/// Blank lines are skipped.
fn parse_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(record);
    }
}

impl AllowListSource {
    pub fn new(path: impl AsRef<Path>, column: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            column: column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_single_name_column() {
        let csv = "id,name,sprite\n1,Dagger,shortwep-0\n2,Potion,potion-3\n";
        let set = parse_allow_list(csv, "sprite").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["potion-3", "shortwep-0"]);
    }

    #[test]
    fn test_comma_separated_names_are_unioned() {
        let csv = "name,appearance,hp\n\
                   Rat,\"rodent-3, rodent-4\",2\n\
                   Bat,avian-1,3\n\
                   Rat King,\"rodent-4,rodent-9\",20\n";
        let set = parse_allow_list(csv, "appearance").unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["avian-1", "rodent-3", "rodent-4", "rodent-9"]
        );
    }

    #[test]
    fn test_empty_and_short_records_skipped() {
        let csv = "name,sprite\r\nA,\r\n\r\nB\r\nC,key-1\r\n";
        let set = parse_allow_list(csv, "sprite").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["key-1"]);
    }

    #[test]
    fn test_escaped_quotes_and_multiline_fields() {
        let csv = "note,sprite\n\"say \"\"hi\"\"\nthere\",scroll-2\n";
        let records = parse_records(csv);
        assert_eq!(records[1][0], "say \"hi\"\nthere");
        let set = parse_allow_list(csv, "sprite").unwrap();
        assert!(set.contains("scroll-2"));
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        let csv = "name,sprite\nDagger 5\" long,shortwep-0\nPotion,potion-3\nRing,ring-1\n";
        let records = parse_records(csv);
        assert_eq!(records[1], vec!["Dagger 5\" long", "shortwep-0"]);
        let set = parse_allow_list(csv, "sprite").unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["potion-3", "ring-1", "shortwep-0"]
        );
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let err = parse_allow_list("a,b\n1,2\n", "sprite").unwrap_err();
        assert!(matches!(err, TileError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempdir().unwrap();
        let source = AllowListSource::new(dir.path().join("items.csv"), "sprite");
        let err = read_allow_list(&source).unwrap_err();
        assert!(matches!(err, TileError::Config { .. }));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("monsters.csv");
        fs::write(&path, "name,appearance\nOrc,\"humanoid-1,humanoid-2\"\n").unwrap();
        let set = read_allow_list(&AllowListSource::new(&path, "appearance")).unwrap();
        assert_eq!(set.len(), 2);
    }
}

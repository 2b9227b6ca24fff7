/// CSV dataset parser
///
/// Builds the tag -> entries index the hover panels read from.
/// One row per historical record: tag, year, name, two description
/// fields and an optional comma-separated list of image file names.
use std::collections::HashMap;
use std::path::Path;

#[allow(unused_imports)]
use log::{debug, info, warn, error};

/// A single dataset row, as displayed on a hover panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DataEntry {
    pub tag: String,
    pub year: i32,
    pub name: String,
    pub description1: String,
    pub description2: String,
    pub image_file_names: Vec<String>,
}

/// Tag -> entries index. Built once at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    by_tag: HashMap<String, Vec<DataEntry>>,
}

impl DatasetIndex {
    /// Parse a dataset CSV from a file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read dataset file {:?}: {}", path, e))?;

        Ok(Self::from_str(&content))
    }

    /// Parse a dataset CSV from a string. Malformed rows are logged and
    /// skipped, never fatal.
    pub fn from_str(content: &str) -> Self {
        let mut by_tag: HashMap<String, Vec<DataEntry>> = HashMap::new();

        let mut lines = content.lines();
        let delimiter = match lines.next() {
            Some(header) if header.contains('\t') => '\t',
            _ => ',',
        };

        for (line_no, line) in lines.enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields = split_row(line, delimiter);
            if fields.len() < 5 {
                warn!(
                    "Skipping row {}: expected at least 5 fields, got {}",
                    line_no + 2,
                    fields.len()
                );
                continue;
            }

            let tag = fields[0].trim().to_string();
            if tag.is_empty() {
                warn!("Skipping row {}: empty tag", line_no + 2);
                continue;
            }

            let year = match fields[1].trim().parse::<i32>() {
                Ok(year) => year,
                Err(_) => {
                    warn!(
                        "Row {}: unparseable year '{}', defaulting to 0",
                        line_no + 2,
                        fields[1].trim()
                    );
                    0
                }
            };

            let image_file_names = fields
                .get(5)
                .map(|names| {
                    names
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            by_tag.entry(tag.clone()).or_default().push(DataEntry {
                tag,
                year,
                name: fields[2].trim().to_string(),
                description1: fields[3].trim().to_string(),
                description2: fields[4].trim().to_string(),
                image_file_names,
            });
        }

        for entries in by_tag.values_mut() {
            entries.sort_by_key(|entry| entry.year);
        }

        let index = Self { by_tag };
        info!(
            "Loaded {} entries across {} tags",
            index.entry_count(),
            index.by_tag.len()
        );
        index
    }

    pub fn entries_for_tag(&self, tag: &str) -> Option<&[DataEntry]> {
        self.by_tag.get(tag).map(Vec::as_slice)
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.by_tag.keys().cloned().collect()
    }

    pub fn tag_count(&self) -> usize {
        self.by_tag.len()
    }

    pub fn entry_count(&self) -> usize {
        self.by_tag.values().map(Vec::len).sum()
    }

    /// Deduplicated image names referenced anywhere in the dataset, in a
    /// deterministic order so loading progress is reproducible.
    pub fn unique_image_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_tag
            .values()
            .flatten()
            .flat_map(|entry| entry.image_file_names.iter().cloned())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        alphanumeric_sort::sort_str_slice(&mut names);
        names
    }
}

/// Split a row on `delimiter`, honoring double quotes: delimiters inside
/// quotes do not split and the quote characters are dropped.
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
tag,year,name,desc1,desc2,images
mill,1905,Old Mill,First mill on the river,Rebuilt after the flood,mill_1905.jpg
mill,1870,Original Mill,Wooden construction,Burned down in 1902,\"mill_1870.jpg, mill_1870_b.jpg\"
church,1923,St. Anne,Neo-gothic,Still standing,
";

    #[test]
    fn test_index_is_sorted_by_year() {
        let index = DatasetIndex::from_str(SAMPLE);
        let entries = index.entries_for_tag("mill").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].year, 1870);
        assert_eq!(entries[1].year, 1905);
    }

    #[test]
    fn test_quoted_image_list_is_split() {
        let index = DatasetIndex::from_str(SAMPLE);
        let entries = index.entries_for_tag("mill").unwrap();
        assert_eq!(
            entries[0].image_file_names,
            vec!["mill_1870.jpg", "mill_1870_b.jpg"]
        );
    }

    #[test]
    fn test_entry_without_images() {
        let index = DatasetIndex::from_str(SAMPLE);
        let entries = index.entries_for_tag("church").unwrap();
        assert!(entries[0].image_file_names.is_empty());
        assert_eq!(entries[0].description1, "Neo-gothic");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let csv = "\
tag,year,name,desc1,desc2
mill,1905,Old Mill,a,b
too,short,row
,1906,No Tag,a,b
";
        let index = DatasetIndex::from_str(csv);
        assert_eq!(index.entry_count(), 1);
        assert_eq!(index.tag_count(), 1);
    }

    #[test]
    fn test_unparseable_year_defaults_to_zero() {
        let csv = "\
tag,year,name,desc1,desc2
mill,unknown,Old Mill,a,b
";
        let index = DatasetIndex::from_str(csv);
        let entries = index.entries_for_tag("mill").unwrap();
        assert_eq!(entries[0].year, 0);
    }

    #[test]
    fn test_tab_delimiter_detected_from_header() {
        let csv = "tag\tyear\tname\tdesc1\tdesc2\timages\n\
mill\t1905\tOld Mill\tFirst, with a comma\tSecond\tmill.jpg\n";
        let index = DatasetIndex::from_str(csv);
        let entries = index.entries_for_tag("mill").unwrap();
        assert_eq!(entries[0].description1, "First, with a comma");
        assert_eq!(entries[0].image_file_names, vec!["mill.jpg"]);
    }

    #[test]
    fn test_unique_image_names_deduplicated() {
        let csv = "\
tag,year,name,desc1,desc2,images
a,1900,A,x,y,\"shared.jpg, a10.jpg\"
b,1901,B,x,y,\"shared.jpg, a2.jpg\"
";
        let index = DatasetIndex::from_str(csv);
        assert_eq!(index.unique_image_names(), vec!["a2.jpg", "a10.jpg", "shared.jpg"]);
    }
}

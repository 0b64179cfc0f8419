// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module contains everything that is necessary to read a knapsack
//! instance from file and turn it into a structure usable in Rust. Chances are
//! high that this module will be of little to no interest to you.
//!
//! An instance file is a headerless, comma separated file with two columns:
//! the cost of an item, then its weight. There is one item per line.
//! ```plain
//! 10,5
//! 20,15
//! ```

use std::{fs::{self, File}, io::{BufRead, BufReader}, num::{ParseFloatError, ParseIntError}, path::Path};

use once_cell::sync::Lazy;
use tracing::info;

use crate::{common::saturating_weight, Instance, Item};

/// This enumeration simply groups the kind of errors that might occur when parsing a
/// knapsack instance from file. There can be io errors (file unavailable ?), format
/// errors (e.g. a line does not have exactly two columns), or parse errors (the
/// parser expected a number but got ... something else).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// A cost could not be read as a number
    #[error("parse float {0}")]
    ParseFloat(#[from] ParseFloatError),
    /// A weight could not be read as an integer
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// A line does not consist of exactly two columns
    #[error("line {line}: expected 'cost,weight' but got '{content}'")]
    Format { line: usize, content: String },
}

/// Reads the items listed in the given file. Blank lines are skipped.
pub fn read_items<P: AsRef<Path>>(fname: P) -> Result<Vec<Item>, Error> {
    let f = File::open(fname)?;
    let f = BufReader::new(f);

    let mut items = vec![];
    for (lc, line) in f.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cols = line.split(',').map(str::trim).collect::<Vec<&str>>();
        if cols.len() != 2 {
            return Err(Error::Format { line: lc + 1, content: line.to_string() });
        }
        let cost   = cols[0].parse::<f64>()?;
        let weight = cols[1].parse::<i64>()?;
        items.push(Item { cost, weight });
    }
    Ok(items)
}

/// Reads an instance from file. When no capacity is given, the capacity of
/// the sack is set to 80% of the total weight of the items.
pub fn read_instance<P: AsRef<Path>>(fname: P, capacity: Option<i64>) -> Result<Instance, Error> {
    let items = read_items(fname)?;
    let capacity = match capacity {
        Some(c) => c,
        None    => {
            let c = Instance::default_capacity(&items);
            info!("Setting weight capacity to 80% of total: {}", c);
            c
        }
    };
    Ok(Instance::new(items, capacity))
}

/// The folder holding the sample data files shipped with this crate
pub const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

const HELP_HEADER: &str = "\nName of data file (under the 'data/' folder) to run on.";
const HELP_FOOTER: &str = "\nDefault is to run on data/large.csv.";

/// Formats the help of the filename option: it lists (at most `max_files`)
/// data files along with the total weight of their items. Whenever anything
/// goes wrong, the listing is simply left out.
pub fn datafile_help<P: AsRef<Path>>(dir: P, max_files: usize) -> String {
    match list_datafiles(dir.as_ref(), max_files) {
        Ok(listing) => format!("{HELP_HEADER}\nOne of:\n{listing}{HELP_FOOTER}"),
        Err(_)      => format!("{HELP_HEADER}{HELP_FOOTER}"),
    }
}
fn list_datafiles(dir: &Path, max_files: usize) -> Result<String, Error> {
    let mut names = fs::read_dir(dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<String>, std::io::Error>>()?;
    names.sort();

    let mut listing = String::new();
    for name in names.iter().take(max_files) {
        let weight = saturating_weight(read_items(dir.join(name))?.iter().map(|i| i.weight));
        listing.push_str(&format!("{:20} {}\n", name, weight));
    }
    Ok(listing)
}

/// The help text of the filename option. It is only computed the first time
/// it is needed, and never changes afterwards.
pub static FILENAME_HELP: Lazy<String> = Lazy::new(|| datafile_help(DATA_DIR, 5));


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_io {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn items_are_read_one_per_line() {
        let f = file("10,5\n20, 15\n\n7.5,4\n");
        let items = read_items(f.path()).unwrap();
        assert_eq!(vec![
            Item { cost: 10.0, weight: 5 },
            Item { cost: 20.0, weight: 15 },
            Item { cost: 7.5,  weight: 4 },
        ], items);
    }
    #[test]
    fn a_missing_column_is_a_format_error() {
        let f = file("10,5\n20\n");
        assert!(matches!(read_items(f.path()), Err(Error::Format { line: 2, .. })));
    }
    #[test]
    fn a_fractional_weight_is_a_parse_error() {
        let f = file("10,5.5\n");
        assert!(matches!(read_items(f.path()), Err(Error::ParseInt(_))));
    }
    #[test]
    fn a_garbage_cost_is_a_parse_error() {
        let f = file("ten,5\n");
        assert!(matches!(read_items(f.path()), Err(Error::ParseFloat(_))));
    }
    #[test]
    fn a_missing_file_is_an_io_error() {
        assert!(matches!(read_items("/this/file/does/not/exist.csv"), Err(Error::Io(_))));
    }
    #[test]
    fn explicit_capacity_is_kept() {
        let f = file("10,5\n20,15\n");
        assert_eq!(12, read_instance(f.path(), Some(12)).unwrap().capacity);
    }
    #[test]
    fn default_capacity_is_eighty_percent_of_total_weight() {
        let f = file("10,5\n20,15\n");
        assert_eq!(16, read_instance(f.path(), None).unwrap().capacity);
    }
    #[test]
    fn help_lists_the_data_files_with_their_total_weight() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "1,2\n3,4\n").unwrap();
        fs::write(dir.path().join("b.csv"), "1,10\n").unwrap();
        let help = datafile_help(dir.path(), 5);
        assert!(help.contains("One of:"));
        assert!(help.contains(&format!("{:20} {}", "a.csv", 6)));
        assert!(help.contains(&format!("{:20} {}", "b.csv", 10)));
    }
    #[test]
    fn help_lists_at_most_max_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.csv", "b.csv", "c.csv"] {
            fs::write(dir.path().join(name), "1,1\n").unwrap();
        }
        let help = datafile_help(dir.path(), 2);
        assert!(help.contains("b.csv"));
        assert!(!help.contains("c.csv"));
    }
    #[test]
    fn help_falls_back_to_a_generic_text() {
        let help = datafile_help("/this/folder/does/not/exist", 5);
        assert!(!help.contains("One of:"));
        assert!(help.contains("data/large.csv"));
    }
    #[test]
    fn the_shipped_data_files_are_listed() {
        assert!(FILENAME_HELP.contains("large.csv"));
    }
}

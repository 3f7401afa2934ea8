//! Line-by-line reader for located data files
//!
//! Drives an [`AlternativeData`] decoder over a file or any other reader.
//! Decoders themselves never skip or retry; the [`ReadErrorPolicy`]
//! decides whether a bad line ends the batch or is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use trading_common::error::{ErrorCategory, ErrorClassification};

use super::{WikipediaPageViews, WikipediaUniverse};
use crate::provider::traits::{AlternativeData, ProviderError, ProviderResult, SubscriptionConfig};

/// What to do when a line fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadErrorPolicy {
    /// Yield the first failure and stop
    Abort,
    /// Log and skip failures; stop after `max_consecutive` failures in a row
    Skip { max_consecutive: usize },
}

impl Default for ReadErrorPolicy {
    fn default() -> Self {
        ReadErrorPolicy::Skip {
            max_consecutive: 100,
        }
    }
}

/// Errors while reading a data file
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line_number}: {source}")]
    Line {
        line_number: usize,
        #[source]
        source: ProviderError,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ErrorClassification for ReadError {
    fn category(&self) -> ErrorCategory {
        match self {
            ReadError::NotFound(_) => ErrorCategory::Permanent,
            ReadError::Io(_) => ErrorCategory::Transient,
            ReadError::Line { source, .. } => source.category(),
            ReadError::Provider(e) => e.category(),
        }
    }
}

type LineDecoder<T> = Box<dyn FnMut(&str) -> ProviderResult<T> + Send>;

/// Iterator over decoded records of a line-oriented data file
pub struct DataFileReader<T, R: Read> {
    reader: BufReader<R>,
    decode: LineDecoder<T>,
    policy: ReadErrorPolicy,
    line_number: usize,
    consecutive_errors: usize,
    skipped: usize,
    finished: bool,
}

impl<T: 'static, R: Read> DataFileReader<T, R> {
    /// Create a reader decoding each non-blank line with `decode`
    pub fn new(
        reader: R,
        policy: ReadErrorPolicy,
        decode: impl FnMut(&str) -> ProviderResult<T> + Send + 'static,
    ) -> Self {
        Self {
            reader: BufReader::new(reader),
            decode: Box::new(decode),
            policy,
            line_number: 0,
            consecutive_errors: 0,
            skipped: 0,
            finished: false,
        }
    }

    /// Current line number (1-based, counting blank lines)
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of lines skipped under the `Skip` policy
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    fn budget_exhausted(&self) -> bool {
        match self.policy {
            ReadErrorPolicy::Abort => true,
            ReadErrorPolicy::Skip { max_consecutive } => self.consecutive_errors >= max_consecutive,
        }
    }
}

impl<T: 'static, R: Read> Iterator for DataFileReader<T, R> {
    type Item = Result<T, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match (self.decode)(trimmed) {
                        Ok(record) => {
                            self.consecutive_errors = 0;
                            return Some(Ok(record));
                        }
                        Err(source) => {
                            self.consecutive_errors += 1;
                            if self.budget_exhausted() {
                                self.finished = true;
                                return Some(Err(ReadError::Line {
                                    line_number: self.line_number,
                                    source,
                                }));
                            }
                            warn!(
                                line_number = self.line_number,
                                error = %source,
                                "Skipping line that failed to decode"
                            );
                            self.skipped += 1;
                        }
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ReadError::Io(e)));
                }
            }
        }
    }
}

/// Locate and open the file holding `T` records for `date`
pub fn open<T: AlternativeData + 'static>(
    config: &SubscriptionConfig,
    date: NaiveDate,
    is_live: bool,
    policy: ReadErrorPolicy,
) -> Result<DataFileReader<T, File>, ReadError> {
    let source = T::get_source(config, date, is_live)?;
    if !source.path.is_file() {
        return Err(ReadError::NotFound(source.path));
    }

    let file = File::open(&source.path)?;
    info!("Reading {}", source.path.display());

    let config = config.clone();
    Ok(DataFileReader::new(file, policy, move |line| {
        T::reader(&config, line, date, is_live)
    }))
}

/// Open the universe file for `date`
pub fn open_universe(
    config: &SubscriptionConfig,
    date: NaiveDate,
    policy: ReadErrorPolicy,
) -> Result<DataFileReader<WikipediaUniverse, File>, ReadError> {
    open(config, date, false, policy)
}

/// Open the page-view history of the subscribed symbol
pub fn open_page_views(
    config: &SubscriptionConfig,
    date: NaiveDate,
    policy: ReadErrorPolicy,
) -> Result<DataFileReader<WikipediaPageViews, File>, ReadError> {
    open(config, date, false, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::traits::{Field, ParseError};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn parse_number(line: &str) -> ProviderResult<Decimal> {
        Decimal::from_str(line).map_err(|e| {
            ParseError::NumericParse {
                field: Field::PageViews,
                token: line.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    #[test]
    fn test_reads_all_lines_and_skips_blanks() {
        let data = "1\n\n2\n   \n3\n";
        let reader = DataFileReader::new(data.as_bytes(), ReadErrorPolicy::Abort, parse_number);

        let values: Vec<Decimal> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![Decimal::from(1), Decimal::from(2), Decimal::from(3)]);
    }

    #[test]
    fn test_abort_policy_stops_at_first_error() {
        let data = "1\nbad\n3\n";
        let mut reader = DataFileReader::new(data.as_bytes(), ReadErrorPolicy::Abort, parse_number);

        assert!(reader.next().unwrap().is_ok());
        match reader.next() {
            Some(Err(ReadError::Line { line_number, .. })) => assert_eq!(line_number, 2),
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_skip_policy_skips_bad_lines() {
        let data = "1\nbad\n3\nworse\n5\n";
        let mut reader = DataFileReader::new(
            data.as_bytes(),
            ReadErrorPolicy::Skip { max_consecutive: 2 },
            parse_number,
        );

        let values: Vec<Decimal> = reader.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(values.len(), 3);
        assert_eq!(reader.skipped_count(), 2);
        assert_eq!(reader.line_number(), 5);
    }

    #[test]
    fn test_skip_policy_gives_up_after_consecutive_errors() {
        let data = "1\nx\ny\nz\n5\n";
        let reader = DataFileReader::new(
            data.as_bytes(),
            ReadErrorPolicy::Skip { max_consecutive: 3 },
            parse_number,
        );

        let items: Vec<_> = reader.collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(
            items[1],
            Err(ReadError::Line { line_number: 4, .. })
        ));
    }

    #[test]
    fn test_read_error_classification() {
        let err = ReadError::NotFound(PathBuf::from("/missing.csv"));
        assert!(err.is_permanent());

        let err = ReadError::Io(std::io::Error::new(std::io::ErrorKind::Interrupted, "eintr"));
        assert!(err.is_transient());
    }
}

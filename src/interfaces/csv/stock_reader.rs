use crate::domain::cart::ProductId;
use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct StockLevel {
    pub product: ProductId,
    pub available: i64,
}

/// Reads `product, available` rows from a CSV source.
pub struct StockReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> StockReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn levels(self) -> impl Iterator<Item = Result<StockLevel>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CheckoutError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "product, available\n1, 10\n2, 0";
        let levels: Vec<StockLevel> = StockReader::new(data.as_bytes())
            .levels()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            levels,
            vec![
                StockLevel {
                    product: 1,
                    available: 10
                },
                StockLevel {
                    product: 2,
                    available: 0
                },
            ]
        );
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "product, available\nabc, 10";
        let results: Vec<Result<StockLevel>> = StockReader::new(data.as_bytes()).levels().collect();
        assert!(results[0].is_err());
    }
}

use super::filter;
use crate::sample::{Indicator, SeriesPoint};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Timestamp,
    Value,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Price history of one indicator; rows are kept in provider order (newest first).
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PriceTable {
    pub indicator: Indicator,
    pub rows: Vec<PriceRow>,
}

/// One page of a [`PriceTable`]. Pages are numbered from 0.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Page {
    pub indicator: Indicator,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(points: &[SeriesPoint], indicator: Indicator) -> Self {
        let rows = filter(points, indicator)
            .into_iter()
            .map(|p| PriceRow {
                timestamp: p.timestamp,
                value: p.value,
            })
            .collect();
        Self { indicator, rows }
    }

    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<PriceRow> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            let ord = match key {
                SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
                SortKey::Value => a.value.total_cmp(&b.value),
            };
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        rows
    }

    /// Slice out page `page` of `page_size` rows, optionally re-sorted first.
    ///
    /// A page beyond the end comes back empty rather than failing; a `page_size` of 0 is
    /// treated as 1.
    pub fn page(&self, page: usize, page_size: usize, sort: Option<(SortKey, SortOrder)>) -> Page {
        let page_size = page_size.max(1);
        let rows = match sort {
            Some((key, order)) => self.sorted(key, order),
            None => self.rows.clone(),
        };

        let total_rows = rows.len();
        let page_count = total_rows.div_ceil(page_size);
        let rows = rows
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect();

        Page {
            indicator: self.indicator,
            page,
            page_size,
            page_count,
            total_rows,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape;
    use crate::test_support::{minute, window};

    fn table(prices: &[f64]) -> PriceTable {
        PriceTable::new(&reshape(&window(prices)).unwrap(), Indicator::High)
    }

    #[test]
    fn keeps_provider_order() {
        let t = table(&[1.0, 2.0, 3.0]);
        let values: Vec<f64> = t.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn pages() {
        let prices: Vec<f64> = (0..23).map(f64::from).collect();
        let t = table(&prices);

        let first = t.page(0, 10, None);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.total_rows, 23);
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.rows[0].value, 22.0);

        let last = t.page(2, 10, None);
        assert_eq!(last.rows.len(), 3);

        assert!(t.page(3, 10, None).rows.is_empty());
    }

    #[test]
    fn sorts_by_value() {
        let t = table(&[5.0, 1.0, 3.0]);
        let asc = t.page(0, 10, Some((SortKey::Value, SortOrder::Asc)));
        let values: Vec<f64> = asc.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn sorts_by_timestamp_ascending() {
        let t = table(&[5.0, 1.0, 3.0]);
        let rows = t.sorted(SortKey::Timestamp, SortOrder::Asc);
        assert_eq!(rows[0].timestamp, minute(0));
        assert_eq!(rows[2].timestamp, minute(2));
    }

    #[test]
    fn zero_page_size() {
        let t = table(&[5.0, 1.0]);
        let page = t.page(0, 0, None);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.page_count, 2);
    }
}

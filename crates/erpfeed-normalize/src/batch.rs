//! Runs the row assembler over every extracted product, preserving order.

use erpfeed_core::{CanonicalRow, ProductEntry};
use rayon::{prelude::*, ThreadPoolBuilder};

use crate::error::Diagnostic;
use crate::row::{AssembledRow, RowAssembler};

/// The output table plus per-row diagnostics keyed by row index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub rows: Vec<CanonicalRow>,
    pub diagnostics: Vec<(usize, Diagnostic)>,
}

impl Batch {
    fn from_assembled(assembled: impl IntoIterator<Item = AssembledRow>) -> Self {
        let mut batch = Batch::default();
        for (index, AssembledRow { row, diagnostics }) in assembled.into_iter().enumerate() {
            batch.rows.push(row);
            batch
                .diagnostics
                .extend(diagnostics.into_iter().map(|d| (index, d)));
        }
        batch
    }

    /// Number of rows that needed at least one fallback.
    #[must_use]
    pub fn rows_with_diagnostics(&self) -> usize {
        let mut indices: Vec<usize> = self.diagnostics.iter().map(|(i, _)| *i).collect();
        indices.dedup();
        indices.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder<'a> {
    assembler: RowAssembler<'a>,
}

impl<'a> BatchBuilder<'a> {
    #[must_use]
    pub fn new(assembler: RowAssembler<'a>) -> Self {
        Self { assembler }
    }

    /// Assemble every entry on the calling thread. Row `i` of the result
    /// always comes from `entries[i]`; nothing is dropped or reordered.
    #[must_use]
    pub fn build(&self, entries: &[ProductEntry]) -> Batch {
        let batch = Batch::from_assembled(entries.iter().map(|e| self.assembler.assemble(e)));
        tracing::info!(
            rows = batch.rows.len(),
            flagged = batch.rows_with_diagnostics(),
            "batch built"
        );
        batch
    }

    /// Same result as [`BatchBuilder::build`], spread over a pool of
    /// `workers` threads. Falls back to the calling thread when one worker is
    /// asked for or the pool cannot be started.
    #[must_use]
    pub fn build_parallel(&self, entries: &[ProductEntry], workers: usize) -> Batch {
        if workers <= 1 || entries.len() < 2 {
            return self.build(entries);
        }

        let pool = match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, workers, "thread pool unavailable; building sequentially");
                return self.build(entries);
            }
        };

        let assembler = self.assembler;
        let assembled: Vec<AssembledRow> = pool.install(|| {
            entries
                .par_iter()
                .map(|e| assembler.assemble(e))
                .collect()
        });

        let batch = Batch::from_assembled(assembled);
        tracing::info!(
            rows = batch.rows.len(),
            flagged = batch.rows_with_diagnostics(),
            workers,
            "batch built"
        );
        batch
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use erpfeed_core::{GlobalInfo, RawProduct, ReferenceTables};

    use super::*;
    use crate::error::DiagnosticKind;

    fn entry(name: &str, month: &str, cutoff: &str) -> ProductEntry {
        ProductEntry {
            global_info: GlobalInfo {
                shipper: Some("示例廠商".to_string()),
                source_cutoff: Some(cutoff.to_string()),
                ..GlobalInfo::default()
            },
            product_data: RawProduct {
                name: Some(name.to_string()),
                release_month: Some(month.to_string()),
                cost_price: Some("1".to_string()),
                suggested_price: Some("2".to_string()),
                ..RawProduct::default()
            },
        }
    }

    fn entries(n: usize) -> Vec<ProductEntry> {
        (0..n)
            .map(|i| entry(&format!("商品 {i}"), "2025-11", "2025/12/15"))
            .collect()
    }

    fn shelf_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    #[test]
    fn build_preserves_order_and_count() {
        let tables = ReferenceTables::default();
        let builder = BatchBuilder::new(RowAssembler::new(&tables, shelf_date()));
        let batch = builder.build(&entries(5));
        let names: Vec<&str> = batch.rows.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["商品 0", "商品 1", "商品 2", "商品 3", "商品 4"]);
    }

    #[test]
    fn malformed_product_does_not_abort_the_batch() {
        let tables = ReferenceTables::default();
        let builder = BatchBuilder::new(RowAssembler::new(&tables, shelf_date()));
        let input = vec![
            entry("好", "2025-11", "2025/12/15"),
            entry("壞", "不明", "下個月"),
            entry("好2", "2025-12", "2025/12/17"),
        ];
        let batch = builder.build(&input);

        assert_eq!(batch.rows.len(), 3);
        assert_eq!(batch.rows[1].release_month, "不明");
        assert_eq!(batch.rows[1].source_cutoff_date, "下個月");
        assert_eq!(batch.rows[2].internal_cutoff_date, "2025/12/16");
        assert!(batch.diagnostics.iter().all(|(i, _)| *i == 1));
        assert!(batch
            .diagnostics
            .iter()
            .any(|(_, d)| d.kind == DiagnosticKind::ParseFailure));
        assert_eq!(batch.rows_with_diagnostics(), 1);
    }

    #[test]
    fn parallel_build_matches_sequential_build() {
        let tables = ReferenceTables::default();
        let builder = BatchBuilder::new(RowAssembler::new(&tables, shelf_date()));
        let mut input = entries(23);
        input[7] = entry("壞", "不明", "2025/12/15");
        let sequential = builder.build(&input);
        for workers in [2, 3, 4, 8, 64] {
            assert_eq!(builder.build_parallel(&input, workers), sequential, "workers={workers}");
        }
    }

    #[test]
    fn empty_input_yields_empty_batch() {
        let tables = ReferenceTables::default();
        let builder = BatchBuilder::new(RowAssembler::new(&tables, shelf_date()));
        assert_eq!(builder.build_parallel(&[], 4), Batch::default());
    }
}

//! Batch evaluation of predicted queries
//!
//! A prediction that cannot be decoded or executed counts as an exception
//! and never stops the run. Only a broken gold query aborts it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlgen_decode::{decode_with, DecodeOptions};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

use crate::dataset::DatasetRow;
use crate::engine::ExecutionEngine;
use crate::EvalError;

/// Exception kind recorded when a decoded prediction fails to execute
const EXECUTION_EXCEPTION: &str = "execution";

#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    /// Compare conditions as sequences instead of sets
    pub ordered: bool,
    /// Log running metrics every N rows, 0 disables
    pub progress_every: usize,
    pub decode: DecodeOptions,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            ordered: false,
            progress_every: 100,
            decode: DecodeOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalCounts {
    pub rows: usize,
    /// Rows whose prediction decoded and executed
    pub graded: usize,
    pub exceptions: usize,
    pub correct_execution: usize,
    pub exact_match: usize,
    pub query_match: usize,
    pub wrong_execution: usize,
    pub wrong_match: usize,
    pub exceptions_by_kind: BTreeMap<String, usize>,
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

impl EvalCounts {
    pub fn execution_accuracy(&self) -> f64 {
        ratio(self.correct_execution, self.graded)
    }

    pub fn lf_accuracy(&self) -> f64 {
        ratio(self.exact_match, self.graded)
    }

    pub fn query_match_accuracy(&self) -> f64 {
        ratio(self.query_match, self.graded)
    }

    /// Execution accuracy with exceptions counted as wrong
    pub fn full_execution_accuracy(&self) -> f64 {
        ratio(self.correct_execution, self.graded + self.exceptions)
    }

    pub fn full_lf_accuracy(&self) -> f64 {
        ratio(self.exact_match, self.graded + self.exceptions)
    }

    fn record_exception(&mut self, kind: &str) {
        self.exceptions += 1;
        *self.exceptions_by_kind.entry(kind.to_string()).or_insert(0) += 1;
    }

    fn record_graded(&mut self, outcome: &Graded) {
        self.graded += 1;
        if outcome.correct {
            self.correct_execution += 1;
        } else {
            self.wrong_execution += 1;
        }
        if outcome.lf_match {
            self.exact_match += 1;
        } else {
            self.wrong_match += 1;
        }
        if outcome.query_match {
            self.query_match += 1;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ordered: bool,
    pub counts: EvalCounts,
    pub execution_accuracy: f64,
    pub lf_accuracy: f64,
    pub query_match_accuracy: f64,
    pub full_execution_accuracy: f64,
    pub full_lf_accuracy: f64,
}

impl EvalReport {
    fn new(run_id: Uuid, started_at: DateTime<Utc>, ordered: bool, counts: EvalCounts) -> Self {
        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            ordered,
            execution_accuracy: counts.execution_accuracy(),
            lf_accuracy: counts.lf_accuracy(),
            query_match_accuracy: counts.query_match_accuracy(),
            full_execution_accuracy: counts.full_execution_accuracy(),
            full_lf_accuracy: counts.full_lf_accuracy(),
            counts,
        }
    }

    pub fn to_json(&self) -> Result<String, EvalError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), EvalError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

struct Graded {
    correct: bool,
    lf_match: bool,
    query_match: bool,
}

enum RowOutcome {
    Graded(Graded),
    Exception(&'static str),
}

pub struct Evaluator<E: ExecutionEngine> {
    engine: E,
    options: EvalOptions,
}

impl<E: ExecutionEngine> Evaluator<E> {
    pub fn new(engine: E, options: EvalOptions) -> Self {
        Self { engine, options }
    }

    /// Score `predictions[i]` against `rows[i]` for every row
    pub fn evaluate(&self, rows: &[DatasetRow], predictions: &[String]) -> Result<EvalReport, EvalError> {
        if rows.len() != predictions.len() {
            return Err(EvalError::PredictionCount {
                rows: rows.len(),
                predictions: predictions.len(),
            });
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(%run_id, rows = rows.len(), ordered = self.options.ordered, "Starting evaluation");

        let mut counts = EvalCounts::default();
        for (i, (row, prediction)) in rows.iter().zip(predictions).enumerate() {
            match self.evaluate_row(i, row, prediction)? {
                RowOutcome::Graded(outcome) => counts.record_graded(&outcome),
                RowOutcome::Exception(kind) => counts.record_exception(kind),
            }
            counts.rows += 1;

            if self.options.progress_every > 0 && counts.rows % self.options.progress_every == 0 {
                log_progress(&counts);
            }
        }

        let report = EvalReport::new(run_id, started_at, self.options.ordered, counts);
        tracing::info!(
            %run_id,
            rows = report.counts.rows,
            exceptions = report.counts.exceptions,
            execution_accuracy = report.execution_accuracy,
            lf_accuracy = report.lf_accuracy,
            "Evaluation finished"
        );
        Ok(report)
    }

    fn evaluate_row(&self, index: usize, row: &DatasetRow, prediction: &str) -> Result<RowOutcome, EvalError> {
        let row_no = index + 1;
        let table_id = row.table_id();

        let gold = row
            .gold_query()
            .map_err(|source| EvalError::GoldQuery { row: row_no, source })?;
        let gold_result = self
            .engine
            .execute(&table_id, &gold)
            .map_err(|source| EvalError::GoldExecution { row: row_no, source })?;

        let predicted = match decode_with(prediction, &row.table.header, &self.options.decode) {
            Ok(decoded) => decoded.into_structured(),
            Err(e) => {
                tracing::debug!(row = row_no, error = %e, prediction, "Prediction did not decode");
                return Ok(RowOutcome::Exception(e.kind()));
            }
        };

        let predicted_result = match self.engine.execute(&table_id, &predicted) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(row = row_no, error = %e, prediction, "Prediction did not execute");
                return Ok(RowOutcome::Exception(EXECUTION_EXCEPTION));
            }
        };

        Ok(RowOutcome::Graded(Graded {
            correct: gold_result == predicted_result,
            lf_match: row.sql.human_readable.to_lowercase() == prediction.to_lowercase(),
            query_match: gold.matches(&predicted, self.options.ordered),
        }))
    }
}

fn log_progress(counts: &EvalCounts) {
    tracing::info!(
        rows = counts.rows,
        wrong_execution = counts.wrong_execution,
        wrong_match = counts.wrong_match,
        exceptions = counts.exceptions,
        execution_accuracy = counts.execution_accuracy(),
        lf_accuracy = counts.lf_accuracy(),
        full_execution_accuracy = counts.full_execution_accuracy(),
        full_lf_accuracy = counts.full_lf_accuracy(),
        "Evaluation progress"
    );
}

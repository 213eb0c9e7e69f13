//! AnalysisEngine: parse → mine → generate rules → rank.
//!
//! Every run walks the `EngineState` machine and ends in exactly one of
//! `Done` (with a complete result), `Failed`, or `Cancelled`.

use std::io::Read;
use std::sync::Arc;
use std::time::Instant;

use basket_core::config::{MiningConfig, ParseConfig};
use basket_core::events::{
    AnalysisCompleteEvent, AnalysisStartedEvent, NoOpEventHandler, ParseCompleteEvent,
};
use basket_core::{
    AnalysisError, AnalysisEventHandler, BasketConfig, BasketErrorCode, CancellationToken,
    EngineState, ParseError,
};

use super::state::StateMachine;
use super::types::{AnalysisResult, AnalysisStats};
use crate::miner::FrequentItemsetMiner;
use crate::parser::{TransactionParser, TransactionSet};
use crate::rules::{top_items, RuleGenerator};

/// Runs market-basket analyses with one fixed configuration.
///
/// The engine is reusable; each `analyze*` call is an independent run. The
/// cancellation token is shared by all runs and is never reset by the engine.
#[derive(Clone)]
pub struct AnalysisEngine {
    parse: ParseConfig,
    mining: MiningConfig,
    cancel: CancellationToken,
    events: Arc<dyn AnalysisEventHandler>,
}

impl AnalysisEngine {
    pub fn new(config: &BasketConfig) -> Self {
        Self::with_configs(config.parse.clone(), config.mining.clone())
    }

    pub fn with_configs(parse: ParseConfig, mining: MiningConfig) -> Self {
        Self {
            parse,
            mining,
            cancel: CancellationToken::new(),
            events: Arc::new(NoOpEventHandler),
        }
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn AnalysisEventHandler>) -> Self {
        self.events = handler;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that cancels in-flight and future runs of this engine.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn mining_config(&self) -> &MiningConfig {
        &self.mining
    }

    pub fn parse_config(&self) -> &ParseConfig {
        &self.parse
    }

    /// Analyze CSV text.
    pub fn analyze(&self, csv: &str) -> Result<AnalysisResult, AnalysisError> {
        self.execute(Some(csv.len()), |parser| parser.parse_str(csv))
    }

    /// Analyze CSV read from `reader` (a file, stdin, an upload body).
    pub fn analyze_reader<R: Read>(&self, reader: R) -> Result<AnalysisResult, AnalysisError> {
        self.execute(None, |parser| parser.parse_reader(reader))
    }

    /// Analyze already-parsed transactions; skips the `Parsing` state.
    pub fn analyze_transactions(
        &self,
        set: &TransactionSet,
    ) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        let mut machine = StateMachine::new(self.events.as_ref());
        self.emit_started(None);

        let outcome = self
            .mining
            .validate()
            .and_then(|()| self.mine_and_rank(set, &mut machine));
        self.conclude(outcome, &mut machine, started)
    }

    fn execute<F>(&self, input_bytes: Option<usize>, parse: F) -> Result<AnalysisResult, AnalysisError>
    where
        F: FnOnce(&TransactionParser) -> Result<TransactionSet, ParseError>,
    {
        let started = Instant::now();
        let mut machine = StateMachine::new(self.events.as_ref());
        self.emit_started(input_bytes);

        let outcome = self.parse_and_mine(&mut machine, parse);
        self.conclude(outcome, &mut machine, started)
    }

    fn parse_and_mine<F>(
        &self,
        machine: &mut StateMachine<'_>,
        parse: F,
    ) -> Result<AnalysisResult, AnalysisError>
    where
        F: FnOnce(&TransactionParser) -> Result<TransactionSet, ParseError>,
    {
        // Parameters are checked in Idle so bad input never gets parsed.
        self.mining.validate()?;
        self.check_cancelled("parsing")?;

        machine.advance(EngineState::Parsing);
        let parser = TransactionParser::new(self.parse.clone());
        let set = parse(&parser)?;

        let stats = set.stats();
        tracing::info!(
            transactions = set.len(),
            distinct_items = set.catalog().len(),
            rows_skipped = stats.rows_skipped,
            empty_rows = stats.empty_rows,
            "transactions parsed"
        );
        self.events.on_parse_complete(&ParseCompleteEvent {
            transactions: set.len(),
            distinct_items: set.catalog().len(),
            rows_skipped: stats.rows_skipped,
        });

        self.mine_and_rank(&set, machine)
    }

    fn mine_and_rank(
        &self,
        set: &TransactionSet,
        machine: &mut StateMachine<'_>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let table = FrequentItemsetMiner::new(self.mining.clone()).mine_tracked(
            set,
            &self.cancel,
            machine,
        )?;

        self.check_cancelled("rule_generation")?;
        machine.advance(EngineState::RuleGeneration);
        let top_n = self.mining.effective_top_n();
        let ranked = RuleGenerator::from_config(&self.mining).generate_top(
            &table,
            set.catalog(),
            top_n,
            &self.cancel,
        )?;
        let rules_generated = ranked.generated;
        let stats = set.stats();

        Ok(AnalysisResult {
            rules: ranked.rules,
            top_items: top_items(table.item_counts(), set.catalog(), top_n),
            stats: AnalysisStats {
                transactions: set.len(),
                distinct_items: set.catalog().len(),
                rows_skipped: stats.rows_skipped,
                empty_rows: stats.empty_rows,
                frequent_itemsets: table.len(),
                rules_generated,
                levels_mined: table.max_level(),
                duration_ms: 0,
            },
        })
    }

    /// Settle the run into its terminal state. A cancellation that lands
    /// after the last check still discards the result.
    fn conclude(
        &self,
        outcome: Result<AnalysisResult, AnalysisError>,
        machine: &mut StateMachine<'_>,
        started: Instant,
    ) -> Result<AnalysisResult, AnalysisError> {
        let outcome = outcome.and_then(|result| {
            self.check_cancelled("rule_generation")?;
            Ok(result)
        });

        match outcome {
            Ok(mut result) => {
                result.stats.duration_ms = started.elapsed().as_millis() as u64;
                machine.advance(EngineState::Done);
                tracing::info!(
                    rules = result.rules.len(),
                    rules_generated = result.stats.rules_generated,
                    frequent_itemsets = result.stats.frequent_itemsets,
                    duration_ms = result.stats.duration_ms,
                    "analysis complete"
                );
                self.events.on_analysis_complete(&AnalysisCompleteEvent {
                    frequent_itemsets: result.stats.frequent_itemsets,
                    rules: result.rules.len(),
                    duration_ms: result.stats.duration_ms,
                });
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), error = %err, state = %machine.current(), "analysis failed");
                machine.fail(&err);
                Err(err)
            }
        }
    }

    fn check_cancelled(&self, stage: &str) -> Result<(), AnalysisError> {
        if self.cancel.is_cancelled() {
            return Err(AnalysisError::cancelled(stage));
        }
        Ok(())
    }

    fn emit_started(&self, input_bytes: Option<usize>) {
        let event = AnalysisStartedEvent {
            min_support: self.mining.effective_min_support(),
            min_confidence: self.mining.effective_min_confidence(),
            top_n: self.mining.effective_top_n(),
            input_bytes,
        };
        tracing::debug!(
            min_support = event.min_support,
            min_confidence = event.min_confidence,
            top_n = event.top_n,
            "analysis started"
        );
        self.events.on_analysis_started(&event);
    }
}

/// One-shot analysis of CSV text with default settings apart from the two
/// thresholds.
pub fn run_analysis(
    csv: &str,
    min_support: f64,
    min_confidence: f64,
) -> Result<AnalysisResult, AnalysisError> {
    let mining = MiningConfig::default()
        .with_min_support(min_support)
        .with_min_confidence(min_confidence);
    AnalysisEngine::with_configs(ParseConfig::default(), mining).analyze(csv)
}

/*!
 * The batch translation pipeline.
 *
 * This module contains the resumable, bounded-time enrichment job:
 * - `selector`: picks the next batch of incomplete cards from the corpus
 * - `orchestrator`: fans out per-language translation calls in parallel
 *   chunks under a wall-clock budget
 * - `service`: wires selector and orchestrator into one invocation and
 *   drives multi-invocation runs through the resumption cursor
 */

pub mod orchestrator;
pub mod selector;
pub mod service;

pub use orchestrator::{BatchOrchestrator, BatchOutcome, OrchestratorSettings};
pub use selector::WorkSelector;
pub use service::{PipelineService, RunOutcome, RunRequest, RunStats, RunTotals};

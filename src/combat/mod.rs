pub mod diff;
pub mod engine;
pub mod export_csv;
pub mod rates;
pub mod stacking;

pub use diff::{diff, ChannelDelta, Delta, DiffReport};
pub use engine::{
    evaluate, CardResult, Charm, Costume, ElementBoost, EvaluateOptions, EvaluateRequest,
    EvaluationError, EvaluationReport, Expected, OpponentDefense, PartyStats, RosterEntry,
    StackOptions,
};
pub use stacking::{CategoryTotals, RosterKey, StackCategory, StackContribution, StatStacking};

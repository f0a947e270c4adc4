//! Request layer for serving DMN rulesets as decision endpoints.
//!
//! A [`DecisionService`] decodes request input variables with
//! [`feel_literal`], hands them to a [`DecisionEngine`], and packs the
//! engine's outcome into a [`DecisionResponse`] envelope. HTTP transport and
//! rule evaluation are left to the embedding application.

pub mod engine;
pub mod error;
pub mod response;
pub mod service;

pub use engine::{
    Decision, DecisionEngine, DecisionOutcome, EngineError, ExecutedRule, ExecutedRules,
};
pub use error::ServiceError;
pub use response::{DecisionResponse, ExecutedRuleField, Status};
pub use service::{DecisionService, ServiceOptions};

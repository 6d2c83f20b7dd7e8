//! Promotions
//!
//! Promotion rules decide whether a promotion subject qualifies for a promotion. Each rule is a
//! [`RuleChecker`] with its own configuration type; [`eligibility::RuleCheckerRegistry`]
//! dispatches a promotion's rules to the registered checkers.

use rusty_money::MoneyError;
use serde::Deserialize;
use thiserror::Error;

use crate::orders::Order;

pub mod configuration;
pub mod eligibility;
pub mod rules;

pub use eligibility::PromotionRule;

/// Errors raised by rule checkers.
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    /// The checker was given a subject it cannot evaluate.
    #[error("unsupported promotion subject type {0}, expected order")]
    UnsupportedSubject(&'static str),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Something a promotion can apply to.
pub trait PromotionSubject {
    /// Name of the subject type, used in error reporting.
    fn subject_type(&self) -> &'static str;

    /// The subject as an order, if it is one.
    fn as_order(&self) -> Option<&Order<'_>> {
        None
    }
}

/// Shape of the configuration a rule checker expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// One configuration for every channel.
    Global,

    /// One configuration per channel code; the checker picks the subject's channel.
    Channel,
}

/// A promotion rule predicate.
pub trait RuleChecker {
    /// Configuration the rule is evaluated against.
    type Configuration;

    /// Whether the checker takes a global or a per-channel configuration.
    fn scope(&self) -> RuleScope {
        RuleScope::Global
    }

    /// Check whether the subject satisfies the rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnsupportedSubject`] if the checker cannot evaluate this kind of
    /// subject. Missing or malformed configuration is not an error.
    fn is_eligible(
        &self,
        subject: &dyn PromotionSubject,
        configuration: &Self::Configuration,
    ) -> Result<bool, RuleError>;
}

/// A promotion and the rules a subject has to satisfy for it.
#[derive(Debug, Clone, Deserialize)]
pub struct Promotion {
    /// Unique promotion code
    pub code: String,

    /// Promotion name
    pub name: String,

    /// Rules, all of which must be satisfied
    #[serde(default)]
    pub rules: Vec<PromotionRule>,
}

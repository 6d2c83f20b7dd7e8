//! Promotion Eligibility
//!
//! Dispatches the rules of a promotion to registered rule checkers. Rule configuration arrives
//! as raw YAML and is deserialized into each checker's configuration type at check time.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, de::DeserializeOwned};
use serde_norway::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::promotions::{Promotion, PromotionSubject, RuleChecker, RuleError, RuleScope};

/// Errors raised while checking promotion eligibility.
#[derive(Debug, Error, PartialEq)]
pub enum EligibilityError {
    /// No checker is registered for the rule type.
    #[error("no rule checker registered for rule type {0}")]
    UnknownRuleType(String),

    /// A rule checker failed.
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// A configured rule of a promotion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromotionRule {
    /// Rule type, matching a registered checker
    #[serde(rename = "type")]
    pub rule_type: String,

    /// Raw rule configuration
    #[serde(default = "null_configuration")]
    pub configuration: Value,
}

impl PromotionRule {
    /// Create a rule of the given type.
    pub fn new(rule_type: impl Into<String>, configuration: Value) -> Self {
        Self {
            rule_type: rule_type.into(),
            configuration,
        }
    }
}

fn null_configuration() -> Value {
    Value::Null
}

trait ErasedRuleChecker {
    fn scope(&self) -> RuleScope;

    fn check(
        &self,
        subject: &dyn PromotionSubject,
        configuration: &Value,
    ) -> Result<bool, RuleError>;
}

impl<C> ErasedRuleChecker for C
where
    C: RuleChecker,
    C::Configuration: DeserializeOwned,
{
    fn scope(&self) -> RuleScope {
        RuleChecker::scope(self)
    }

    fn check(
        &self,
        subject: &dyn PromotionSubject,
        configuration: &Value,
    ) -> Result<bool, RuleError> {
        match serde_norway::from_value::<C::Configuration>(configuration.clone()) {
            Ok(configuration) => self.is_eligible(subject, &configuration),
            Err(error) => {
                warn!(%error, "malformed rule configuration, rule does not apply");

                Ok(false)
            }
        }
    }
}

/// Rule checkers by rule type.
#[derive(Default)]
pub struct RuleCheckerRegistry<'r> {
    checkers: FxHashMap<String, Box<dyn ErasedRuleChecker + 'r>>,
}

impl<'r> RuleCheckerRegistry<'r> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checker for a rule type, replacing any checker already registered for it.
    pub fn register<C>(&mut self, rule_type: impl Into<String>, checker: C)
    where
        C: RuleChecker + 'r,
        C::Configuration: DeserializeOwned,
    {
        self.checkers.insert(rule_type.into(), Box::new(checker));
    }

    /// Whether a checker is registered for the rule type.
    pub fn has(&self, rule_type: &str) -> bool {
        self.checkers.contains_key(rule_type)
    }

    /// Configuration scope of the checker registered for the rule type.
    pub fn scope(&self, rule_type: &str) -> Option<RuleScope> {
        self.checkers.get(rule_type).map(|checker| checker.scope())
    }

    /// Check the subject against every rule. A subject with no rules to satisfy is eligible.
    ///
    /// # Errors
    ///
    /// Returns [`EligibilityError::UnknownRuleType`] for a rule without a registered checker, or
    /// [`EligibilityError::Rule`] if a checker fails.
    pub fn is_eligible(
        &self,
        subject: &dyn PromotionSubject,
        rules: &[PromotionRule],
    ) -> Result<bool, EligibilityError> {
        for rule in rules {
            let checker = self
                .checkers
                .get(&rule.rule_type)
                .ok_or_else(|| EligibilityError::UnknownRuleType(rule.rule_type.clone()))?;

            if !checker.check(subject, &rule.configuration)? {
                debug!(
                    rule_type = rule.rule_type.as_str(),
                    scope = ?checker.scope(),
                    "subject does not satisfy rule"
                );

                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Check the subject against every rule of the promotion.
    ///
    /// # Errors
    ///
    /// See [`RuleCheckerRegistry::is_eligible`].
    pub fn is_promotion_eligible(
        &self,
        subject: &dyn PromotionSubject,
        promotion: &Promotion,
    ) -> Result<bool, EligibilityError> {
        let eligible = self.is_eligible(subject, &promotion.rules)?;

        debug!(promotion = promotion.code.as_str(), eligible, "checked promotion");

        Ok(eligible)
    }
}

impl fmt::Debug for RuleCheckerRegistry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rule_types: Vec<&str> = self.checkers.keys().map(String::as_str).collect();

        rule_types.sort_unstable();

        f.debug_struct("RuleCheckerRegistry")
            .field("rule_types", &rule_types)
            .finish()
    }
}

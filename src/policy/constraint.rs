/// Space membership policy constraint
///
/// The single atomic predicate this connector contributes to usage policy
/// evaluation: a rule naming a data space DID as its right operand is
/// satisfied iff that DID is among the caller's verified memberships.
use crate::policy::attributes::{MEMBERSHIP_DELIMITER, SPACE_MEMBERSHIPS_ATTRIBUTE};
use std::collections::HashMap;

/// Left-operand key policies use to bind this constraint
pub const SPACE_MEMBERSHIP_CONSTRAINT_KEY: &str = "dataspace:spaceMembership";

/// Operators a policy rule may carry; the membership predicate is pure
/// containment and treats them alike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    In,
}

/// The caller's agent as seen by policy evaluation
#[derive(Debug, Clone, Default)]
pub struct ParticipantAgent {
    pub attributes: HashMap<String, String>,
}

/// Context a policy rule is evaluated against
#[derive(Debug, Clone, Default)]
pub struct PolicyContext {
    pub participant_agent: Option<ParticipantAgent>,
}

/// Evaluator for the space membership constraint. No side effects; every
/// absence (no agent, no attribute, no match) evaluates to false.
pub struct SpaceMembershipConstraint;

impl SpaceMembershipConstraint {
    pub fn evaluate(&self, _operator: Operator, right_value: &str, context: &PolicyContext) -> bool {
        let Some(agent) = &context.participant_agent else {
            tracing::debug!("no participant agent in policy context");
            return false;
        };

        let Some(memberships) = agent.attributes.get(SPACE_MEMBERSHIPS_ATTRIBUTE) else {
            tracing::debug!("no space membership attribute on participant agent");
            return false;
        };

        let result = memberships
            .split(MEMBERSHIP_DELIMITER)
            .any(|membership| membership == right_value);

        tracing::debug!(right_value, result, "space membership constraint evaluated");
        result
    }
}

/// Policy subsystem: per-request membership attributes and the space
/// membership constraint evaluator
pub mod attributes;
pub mod constraint;

pub use attributes::{MembershipAttributeProvider, SPACE_MEMBERSHIPS_ATTRIBUTE};
pub use constraint::{
    Operator, ParticipantAgent, PolicyContext, SpaceMembershipConstraint,
    SPACE_MEMBERSHIP_CONSTRAINT_KEY,
};

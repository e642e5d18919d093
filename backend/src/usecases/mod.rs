pub mod invitations;
pub mod plan_resolver;
pub mod templates;

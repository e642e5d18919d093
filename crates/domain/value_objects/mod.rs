pub mod entitlements;
pub mod enums;
pub mod invitations;
pub mod plans;
pub mod templates;

pub mod app_users;
pub mod invitations;
pub mod plans;
pub mod subscriptions;
pub mod templates;

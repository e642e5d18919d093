pub mod invitations;
pub mod templates;

#[cfg(test)]
pub(crate) mod test_support;

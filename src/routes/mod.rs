pub(crate) mod analyze;
pub(crate) mod comments;
pub(crate) mod data;
pub(crate) mod health;

pub(crate) mod access;
pub(crate) mod category;
pub(crate) mod error;
pub(crate) mod post;
pub(crate) mod slug;
pub(crate) mod user;

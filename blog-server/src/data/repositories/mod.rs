#[cfg(test)]
pub(crate) mod in_memory;
pub(crate) mod postgres;

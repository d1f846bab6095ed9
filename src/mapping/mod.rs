pub(crate) mod loop_ext;
pub(crate) mod read;
pub(crate) mod write;

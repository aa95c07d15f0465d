//! Token used to seal traits and restrict access to methods that must only be called by pyrs.

#[derive(Clone, Copy, Debug)]
pub struct Private;

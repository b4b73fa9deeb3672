pub(crate) mod edit;
pub(crate) mod normalize;
pub(crate) mod rows;

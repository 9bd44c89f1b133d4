//! CLI command implementations.

pub(crate) mod fields;
pub(crate) mod generate;

pub(crate) use fields::FieldsArgs;
pub(crate) use generate::GenerateArgs;

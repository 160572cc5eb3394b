//! Subcommands of the `ipd2vcf` tool.

pub(crate) mod export;
pub(crate) mod inspect;
pub(crate) mod validate;

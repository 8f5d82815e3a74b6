//! One module per subcommand. Each command is a thin sequence over the ops
//! layer: resolve the endpoint, shell out, reformat the output.

pub mod assign;
pub mod changes;
pub mod checkout;
pub mod clone;
pub mod push;
pub mod review;
pub mod setup;

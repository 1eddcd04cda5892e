//! One module per subcommand.

pub mod add;
pub mod decrypt;
pub mod delete;
pub mod encrypt;
pub mod get;
pub mod list;
pub mod rotate;
pub mod verify;

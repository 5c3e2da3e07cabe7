pub mod authorizor;
mod console;
mod user;

pub use console::Console;
pub use user::User;

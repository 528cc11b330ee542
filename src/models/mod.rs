mod account;
mod group;
mod model_entry;
mod permission;

pub use account::Account;
pub use group::Group;
pub use model_entry::ModelEntry;
pub use permission::{Permission, ResourceType};

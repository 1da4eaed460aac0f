//! Query surfaces of a [`Backtrack`](crate::Backtrack) instance.
//!
//! Each is a public field of the context object:
//!
//! 1. **Blacklist** - `bt.blacklist.add("Mallory", &embedding)`
//! 2. **Objects** - `bt.objects.find_history("laptop")`
//! 3. **Requests** - `bt.requests.approve(&id)`

mod blacklist;
mod objects;
mod requests;

pub use blacklist::Blacklist;
pub use objects::{LostObject, Objects};
pub use requests::Requests;

// Schema-less JSON path addressing: discovery (`explore`) and lookup
// (`resolve`). Both are pure functions over `serde_json::Value`.

mod explore;
mod resolve;

pub use explore::explore;
pub use resolve::resolve;

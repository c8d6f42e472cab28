pub mod context_provider;

pub use context_provider::{IContextProvider, StaticContextProvider};

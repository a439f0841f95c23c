pub mod keyboard;

pub use keyboard::{InputDispatcher, KeyBinding, KeyBindings, KeyOutcome};

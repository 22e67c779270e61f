//! Plugin trait: the unit of composition for an [`App`].

use std::any::type_name;

use crate::{App, BoxError};

/// A self-contained unit that registers resources and systems into an
/// [`App`].
///
/// [`App::add_plugin`] calls `build` immediately, so a plugin that depends
/// on a resource provided by another plugin must be added after it.
pub trait Plugin: 'static {
    /// Register resources and systems.
    fn build(&mut self, app: &mut App) -> Result<(), BoxError>;

    /// Diagnostic label. Has no behavioral effect.
    fn name(&self) -> &str {
        type_name::<Self>()
    }
}

//! Caller callbacks invoked during a parse.

use crate::config::ArgSpec;
use crate::matches::ArgResult;
use std::collections::HashMap;

/// Check run on an argument after its value has been converted.
///
/// Returning `Err(message)` aborts the parse with `message` as the error detail.
pub type ResolveHook<'a> = Box<dyn FnMut(&ArgSpec, &ArgResult) -> Result<(), String> + 'a>;

/// Receiver for tokens that arrive after every positional slot is filled.
pub type ExtraValueHook<'a> = Box<dyn FnMut(&str) + 'a>;

/// Callbacks attached to a parse.
#[derive(Default)]
pub struct Hooks<'a> {
    pub(crate) extra_value: Option<ExtraValueHook<'a>>,
    pub(crate) options: HashMap<String, ResolveHook<'a>>,
    pub(crate) positionals: HashMap<String, ResolveHook<'a>>,
}

impl<'a> Hooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route surplus positional tokens to `hook` instead of failing.
    pub fn on_extra_value(mut self, hook: impl FnMut(&str) + 'a) -> Self {
        self.extra_value = Some(Box::new(hook));
        self
    }

    /// Silently drop surplus positional tokens.
    pub fn discard_extra_values(self) -> Self {
        self.on_extra_value(|_| {})
    }

    /// Run `hook` after the option `name` is resolved.
    ///
    /// `name` must match a declared option name; otherwise the hook never runs.
    pub fn on_option(
        mut self,
        name: impl Into<String>,
        hook: impl FnMut(&ArgSpec, &ArgResult) -> Result<(), String> + 'a,
    ) -> Self {
        self.options.insert(name.into(), Box::new(hook));
        self
    }

    /// Run `hook` after the positional argument `name` is resolved.
    ///
    /// As with [`Hooks::on_option`], an undeclared `name` is never called.
    pub fn on_positional(
        mut self,
        name: impl Into<String>,
        hook: impl FnMut(&ArgSpec, &ArgResult) -> Result<(), String> + 'a,
    ) -> Self {
        self.positionals.insert(name.into(), Box::new(hook));
        self
    }
}

impl std::fmt::Debug for Hooks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("extra_value", &self.extra_value.is_some())
            .field("options", &self.options.keys().collect::<Vec<_>>())
            .field("positionals", &self.positionals.keys().collect::<Vec<_>>())
            .finish()
    }
}

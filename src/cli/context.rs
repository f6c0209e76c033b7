//! CLI context for storing global options during command execution

use std::cell::RefCell;

thread_local! {
    static CLI_CONTEXT: RefCell<Option<CliContext>> = const { RefCell::new(None) };
}

/// Context containing global CLI options
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    pub verbose: bool,
    pub quiet: bool,
    pub dry_run: bool,
}

impl CliContext {
    /// Set the global CLI context for the current thread
    pub fn set(context: CliContext) {
        CLI_CONTEXT.with(|c| {
            *c.borrow_mut() = Some(context);
        });
    }

    /// Get the current CLI context
    pub fn get() -> Option<CliContext> {
        CLI_CONTEXT.with(|c| c.borrow().clone())
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose() -> bool {
        Self::get().map(|ctx| ctx.verbose).unwrap_or(false)
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet() -> bool {
        Self::get().map(|ctx| ctx.quiet).unwrap_or(false)
    }

    /// Check if this is a dry run
    pub fn is_dry_run() -> bool {
        Self::get().map(|ctx| ctx.dry_run).unwrap_or(false)
    }
}

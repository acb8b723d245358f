//! Caller-supplied decisions. The pipelines ask before replacing or deleting
//! anything; how the question reaches the user is up to the front end.

/// A question a pipeline needs answered before it continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    /// A record with this name already exists; replace its contents?
    Overwrite(&'a str),
    /// Delete this record and its archived file?
    Delete(&'a str),
}

impl Prompt<'_> {
    pub fn message(&self) -> String {
        match self {
            Prompt::Overwrite(name) => format!(
                "A document named '{}' already exists. Replace its contents?",
                name
            ),
            Prompt::Delete(name) => format!("Really delete '{}'?", name),
        }
    }
}

pub trait Confirm {
    fn confirm(&self, prompt: Prompt<'_>) -> bool;

    fn confirm_overwrite(&self, name: &str) -> bool {
        self.confirm(Prompt::Overwrite(name))
    }

    fn confirm_delete(&self, name: &str) -> bool {
        self.confirm(Prompt::Delete(name))
    }
}

/// Answers yes to everything.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: Prompt<'_>) -> bool {
        true
    }
}

/// Answers no to everything.
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _prompt: Prompt<'_>) -> bool {
        false
    }
}

/// Adapts a closure into a [`Confirm`].
pub struct FnConfirm<F>(pub F);

impl<F> Confirm for FnConfirm<F>
where
    F: Fn(Prompt<'_>) -> bool,
{
    fn confirm(&self, prompt: Prompt<'_>) -> bool {
        (self.0)(prompt)
    }
}

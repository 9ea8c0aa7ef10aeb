/// Names the records synthesized from the mapping elements of a sequence,
/// given the name of the sequence (usually a plural key like `users`).
pub trait Naming {
    fn singularize(&self, name: &str) -> String;
}

/// Keeps the sequence's name as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Naming for Identity {
    fn singularize(&self, name: &str) -> String {
        name.to_owned()
    }
}

impl<F> Naming for F
where
    F: Fn(&str) -> String,
{
    fn singularize(&self, name: &str) -> String {
        self(name)
    }
}
